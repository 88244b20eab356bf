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

use serde::Serialize;
use serde_json::{Map, Value};

use std::fmt;
use std::str::FromStr;

/// Errors raised while turning a request body into a booking.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The body is not valid JSON.
    #[error("Malformed request body: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The body is valid JSON but not an object.
    #[error("Malformed request body: expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// A required key is absent.
    #[error("Missing field `{field}` in {kind} booking request")]
    MissingField {
        kind: BookingKind,
        field: &'static str,
    },
}

/// The kinds of booking a function can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingKind {
    Flight,
    Hotel,
    Rental,
}

impl BookingKind {
    /// All booking kinds.
    pub const ALL: [BookingKind; 3] = [BookingKind::Flight, BookingKind::Hotel, BookingKind::Rental];

    /// Returns the short lowercase name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            BookingKind::Flight => "flight",
            BookingKind::Hotel => "hotel",
            BookingKind::Rental => "rental",
        }
    }

    /// Returns the name of the collection that records of this kind are inserted into.
    pub fn collection(self) -> &'static str {
        match self {
            BookingKind::Flight => "flight_bookings",
            BookingKind::Hotel => "hotel_bookings",
            BookingKind::Rental => "rental_bookings",
        }
    }

    /// Returns the required request keys, in the order they are stored.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            BookingKind::Flight => &["trip_id", "depart", "depart_at", "arrive", "arrive_at"],
            BookingKind::Hotel => &["trip_id", "hotel", "check_in", "check_out"],
            BookingKind::Rental => &["trip_id", "rental", "rental_from", "rental_to"],
        }
    }

    /// Parses a request body and projects the fields required by this kind.
    /// Keys other than the required ones are ignored.
    pub fn parse_request(self, body: &[u8]) -> Result<Booking, Error> {
        let value: Value = serde_json::from_slice(body)?;
        let map = match value {
            Value::Object(map) => map,
            other => return Err(Error::NotAnObject(json_type(&other))),
        };
        if let Some(field) = self
            .fields()
            .iter()
            .copied()
            .find(|field| !map.contains_key(*field))
        {
            return Err(Error::MissingField { kind: self, field });
        }
        let mut fields = Fields { kind: self, map };

        Ok(match self {
            BookingKind::Flight => Booking::Flight(FlightBooking {
                trip_id: fields.take("trip_id")?,
                depart: fields.take("depart")?,
                depart_at: fields.take("depart_at")?,
                arrive: fields.take("arrive")?,
                arrive_at: fields.take("arrive_at")?,
            }),
            BookingKind::Hotel => Booking::Hotel(HotelBooking {
                trip_id: fields.take("trip_id")?,
                hotel: fields.take("hotel")?,
                check_in: fields.take("check_in")?,
                check_out: fields.take("check_out")?,
            }),
            BookingKind::Rental => Booking::Rental(RentalBooking {
                trip_id: fields.take("trip_id")?,
                rental: fields.take("rental")?,
                rental_from: fields.take("rental_from")?,
                rental_to: fields.take("rental_to")?,
            }),
        })
    }
}

impl fmt::Display for BookingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no booking kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown booking kind: {0}")]
pub struct ParseKindError(String);

impl FromStr for BookingKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        BookingKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseKindError(s.into()))
    }
}

// Moves required values out of a request object.
struct Fields {
    kind: BookingKind,
    map: Map<String, Value>,
}

impl Fields {
    fn take(&mut self, field: &'static str) -> Result<Value, Error> {
        self.map.remove(field).ok_or(Error::MissingField {
            kind: self.kind,
            field,
        })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A flight booking record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightBooking {
    pub trip_id: Value,
    pub depart: Value,
    pub depart_at: Value,
    pub arrive: Value,
    pub arrive_at: Value,
}

/// A hotel booking record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelBooking {
    pub trip_id: Value,
    pub hotel: Value,
    pub check_in: Value,
    pub check_out: Value,
}

/// A rental booking record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalBooking {
    pub trip_id: Value,
    pub rental: Value,
    pub rental_from: Value,
    pub rental_to: Value,
}

/// A booking of any kind.
/// Serializes as the flat record alone, with no kind tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Booking {
    Flight(FlightBooking),
    Hotel(HotelBooking),
    Rental(RentalBooking),
}

impl Booking {
    /// Returns the kind of this booking.
    pub fn kind(&self) -> BookingKind {
        match self {
            Booking::Flight(_) => BookingKind::Flight,
            Booking::Hotel(_) => BookingKind::Hotel,
            Booking::Rental(_) => BookingKind::Rental,
        }
    }

    /// Returns the name of the collection this booking belongs in.
    pub fn collection(&self) -> &'static str {
        self.kind().collection()
    }

    /// Returns the trip correlation key.
    pub fn trip_id(&self) -> &Value {
        match self {
            Booking::Flight(b) => &b.trip_id,
            Booking::Hotel(b) => &b.trip_id,
            Booking::Rental(b) => &b.trip_id,
        }
    }
}

/// Describes a successful insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub collection: String,
    pub id: String,
}

impl Confirmation {
    /// Creates a new `Confirmation` for a record inserted in the specified collection.
    pub fn new(collection: &str, id: &str) -> Self {
        Confirmation {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record inserted in {}: {}", self.collection, self.id)
    }
}
