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

use serde::{Deserialize, Serialize};

/// Describes a response body returned to the function host.
#[derive(Debug, PartialEq)]
pub struct Response {
    /// The raw bytes of the response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Returns a response that contains the JSON serialization of an object.
    pub fn json<T>(t: &T) -> Result<Response, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        Ok(Response {
            body: serde_json::to_vec(t)?,
        })
    }
}

/// Describes a failed invocation, as reported to AWS Lambda.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_message: String,
    pub error_type: String,
}

impl ErrorResponse {
    /// Creates a new `ErrorResponse`.
    pub fn new(error_message: &str, error_type: &str) -> Self {
        ErrorResponse {
            error_message: error_message.into(),
            error_type: error_type.into(),
        }
    }
}
