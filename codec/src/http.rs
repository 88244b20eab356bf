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
use serde_json::Value;

use std::collections::HashMap;

/// The parts of an API Gateway or ALB proxy request that a booking function reads.
/// An event is taken as a proxy request exactly when it is an object with a `requestContext` key,
/// so a direct-invoke payload carrying that key is answered as a proxy request too.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    pub request_context: Value,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,
}

/// A proxy integration response.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ProxyResponse {
    /// Returns a plain text response with the specified status code.
    pub fn text(status_code: u16, body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".into(), "text/plain; charset=utf-8".into());
        ProxyResponse {
            status_code,
            headers,
            body: body.into(),
            is_base64_encoded: false,
        }
    }
}
