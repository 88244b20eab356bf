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

use booking_provider::{Handler, HandlerError};

use std::env;
use std::sync::Arc;

use crate::dispatch::{Dispatcher, EventDispatcher, HttpDispatcher, NotHttpRequestError};
use crate::lambda::{Client, InvocationError, InvocationResponse};

/// Reported as the error type of failures that did not come from the handler.
const RUNTIME_ERROR_TYPE: &str = "RuntimeError";

/// Polls the Lambda event machinery using the specified client.
/// Events are handled one at a time.
pub struct Poller<C, H> {
    client: C,
    http_dispatcher: HttpDispatcher<H>,
    event_dispatcher: EventDispatcher<H>,
}

impl<C: Client, H: Handler> Poller<C, H> {
    /// Creates a new `Poller`.
    pub fn new(client: C, handler: H) -> Self {
        let handler = Arc::new(handler);

        Poller {
            client,
            http_dispatcher: HttpDispatcher::new(Arc::clone(&handler)),
            event_dispatcher: EventDispatcher::new(handler),
        }
    }

    /// Runs the poller. Never returns.
    pub fn run(&self) {
        loop {
            self.poll();
        }
    }

    /// Waits for the next invocation event and handles it.
    pub fn poll(&self) {
        debug!("Poller get next event");
        let event = match self.client.next_invocation_event() {
            Err(e) => {
                error!("{}", e);
                return;
            }
            Ok(None) => {
                warn!("No event");
                return;
            }
            Ok(Some(event)) => event,
        };
        let request_id = match event.request_id() {
            None => {
                warn!("No request ID");
                return;
            }
            Some(request_id) => request_id,
        };

        // Set for the X-Ray SDK.
        if let Some(trace_id) = event.trace_id() {
            env::set_var("_X_AMZN_TRACE_ID", trace_id);
        }

        // Try first to dispatch as an HTTP request.
        match self
            .http_dispatcher
            .dispatch_invocation_event(event.body())
        {
            Ok(body) => {
                self.send_invocation_response(body, request_id);
                return;
            }
            // Not a proxy request. Dispatch as a Lambda raw event.
            Err(e) if e.is::<NotHttpRequestError>() => debug!("{}", e),
            Err(e) => {
                error!("{}", e);
                self.send_invocation_error(e, request_id);
                return;
            }
        };

        match self
            .event_dispatcher
            .dispatch_invocation_event(event.body())
        {
            Ok(body) => self.send_invocation_response(body, request_id),
            Err(e) => {
                error!("{}", e);
                self.send_invocation_error(e, request_id)
            }
        }
    }

    /// Sends an invocation error.
    fn send_invocation_error(&self, e: anyhow::Error, request_id: &str) {
        let error_type = e
            .downcast_ref::<HandlerError>()
            .map_or(RUNTIME_ERROR_TYPE, |e| e.kind().as_str());
        let err = InvocationError::new(&e.to_string(), error_type, request_id);
        debug!("Poller send error");
        if let Err(e) = self.client.send_invocation_error(err) {
            error!("Unable to send invocation error: {}", e);
        }
    }

    /// Sends an invocation response.
    fn send_invocation_response(&self, body: Vec<u8>, request_id: &str) {
        let resp = InvocationResponse::new(body, request_id);
        debug!("Poller send response");
        if let Err(e) = self.client.send_invocation_response(resp) {
            error!("Unable to send invocation response: {}", e);
        }
    }
}
