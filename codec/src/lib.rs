// Copyright 2015-2020 Capital One Services, LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//
// Booking Function Codec
//

pub use crate::booking::{
    Booking, BookingKind, Confirmation, Error, FlightBooking, HotelBooking, ParseKindError,
    RentalBooking,
};
pub use crate::http::{ProxyRequest, ProxyResponse};
pub use crate::lambda::{ErrorResponse, Response};

mod booking;
mod http;
mod lambda;
