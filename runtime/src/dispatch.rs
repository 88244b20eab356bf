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
// Booking Function Runtime
//

use base64::{engine::general_purpose::STANDARD, Engine};
use booking_codec::{ProxyRequest, ProxyResponse, Response};
use booking_provider::Handler;

use std::sync::Arc;

/// The invocation event is not an API Gateway or ALB proxy request.
#[derive(Debug, thiserror::Error)]
#[error("Not an HTTP request: {0}")]
pub struct NotHttpRequestError(String);

/// Represents dispatching an invocation event to a handler and returning its response.
pub trait Dispatcher {
    /// Attempts to dispatch a Lambda invocation event, returning an invocation response body.
    fn dispatch_invocation_event(&self, body: &[u8]) -> anyhow::Result<Vec<u8>>;
}

/// Dispatches proxy requests.
/// Handler failures become HTTP error responses rather than invocation errors.
pub struct HttpDispatcher<H> {
    handler: Arc<H>,
}

impl<H> HttpDispatcher<H> {
    pub fn new(handler: Arc<H>) -> Self {
        HttpDispatcher { handler }
    }
}

impl<H: Handler> Dispatcher for HttpDispatcher<H> {
    fn dispatch_invocation_event(&self, body: &[u8]) -> anyhow::Result<Vec<u8>> {
        let request: ProxyRequest =
            serde_json::from_slice(body).map_err(|e| NotHttpRequestError(e.to_string()))?;

        let response = match request_body(request) {
            Err(e) => {
                warn!("{}", e);
                ProxyResponse::text(400, &format!("Malformed request body: {}", e))
            }
            Ok(payload) => match self.handler.handle(&payload) {
                Ok(confirmation) => ProxyResponse::text(200, &confirmation.to_string()),
                Err(e) => {
                    error!("{}", e);
                    let status = if e.kind().is_client_error() { 400 } else { 500 };
                    ProxyResponse::text(status, &e.to_string())
                }
            },
        };

        Ok(Response::json(&response)?.body)
    }
}

// Returns the payload carried by a proxy request.
fn request_body(request: ProxyRequest) -> Result<Vec<u8>, base64::DecodeError> {
    match request.body {
        Some(s) if request.is_base64_encoded.unwrap_or(false) => STANDARD.decode(s),
        Some(s) => Ok(s.into_bytes()),
        None => Ok(vec![]),
    }
}

/// Dispatches Lambda raw events.
/// The event itself is the booking request.
pub struct EventDispatcher<H> {
    handler: Arc<H>,
}

impl<H> EventDispatcher<H> {
    pub fn new(handler: Arc<H>) -> Self {
        EventDispatcher { handler }
    }
}

impl<H: Handler> Dispatcher for EventDispatcher<H> {
    fn dispatch_invocation_event(&self, body: &[u8]) -> anyhow::Result<Vec<u8>> {
        let confirmation = self.handler.handle(body)?;

        Ok(Response::json(&confirmation.to_string())?.body)
    }
}
