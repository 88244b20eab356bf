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

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use anyhow::Context;
use booking_provider::{BookingHandler, HandlerConfig};

use std::env;
use std::io;

pub use booking_codec::BookingKind;

pub use crate::lambda::{
    Client, InvocationError, InvocationEvent, InvocationResponse, RuntimeClient,
};
pub use crate::poller::Poller;
pub use crate::settings::FunctionSettings;

mod dispatch;
mod lambda;
mod poller;
mod settings;
mod watchdog;

/// Selects the booking kind of the `bootstrap` binary.
pub const KIND_VAR: &str = "BOOKING_KIND";

/// Runs a booking function of the specified kind.
/// Polls the Lambda runtime API when one is configured, otherwise handles one request from stdin.
pub fn run(kind: BookingKind) -> anyhow::Result<()> {
    if env_logger::try_init().is_err() {
        info!("Logger already initialized");
    }

    let settings = FunctionSettings::from_env();
    settings.log();
    let config = HandlerConfig::from_env();
    info!(
        "book-{} starting: database {}, collection {}",
        kind,
        config.database,
        kind.collection()
    );
    let handler = BookingHandler::mongo(kind, config);

    match settings.runtime_api() {
        Some(endpoint) => {
            info!("Polling the Lambda runtime API at {}", endpoint);
            Poller::new(RuntimeClient::new(endpoint)?, handler).run();
            Ok(())
        }
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            watchdog::serve(&handler, stdin.lock(), stdout.lock())
        }
    }
}

/// Returns the booking kind named by `BOOKING_KIND`, or else by a Lambda function name of the form `book-<kind>`.
pub fn kind_from_env() -> anyhow::Result<BookingKind> {
    kind_from_lookup(|name| env::var(name).ok())
}

fn kind_from_lookup<F>(lookup: F) -> anyhow::Result<BookingKind>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(kind) = lookup(KIND_VAR) {
        return Ok(kind.parse()?);
    }

    let function_name = lookup(settings::FUNCTION_NAME_VAR)
        .ok_or_else(|| anyhow!("Missing configuration value: {}", KIND_VAR))?;
    function_name
        .strip_prefix("book-")
        .unwrap_or(&function_name)
        .parse()
        .with_context(|| format!("Unable to select a booking kind for function {}", function_name))
}

/// This module contains code to be used by many unit tests.
#[cfg(test)]
mod tests_common {
    use booking_codec::{BookingKind, Confirmation};
    use booking_provider::{ErrorKind, Handler, HandlerError, Result};
    use serde_json::json;

    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::RwLock;

    use crate::lambda::{Client, InvocationError, InvocationEvent, InvocationResponse};

    pub(crate) const BOOKING_BODY: &[u8] =
        br#"{"trip_id":"T1","hotel":"Hilton","check_in":"2024-01-01","check_out":"2024-01-03"}"#;
    pub(crate) const RECORD_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";
    pub(crate) const REQUEST_ID: &str = "REQUEST_ID";
    pub(crate) const TRACE_ID: &str = "TRACE_ID";

    /// Returns an API Gateway proxy event carrying the specified body.
    pub(crate) fn proxy_event(body: &str, is_base64_encoded: bool) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "resource": "/bookings",
            "path": "/bookings",
            "httpMethod": "POST",
            "headers": {"content-type": "application/json"},
            "requestContext": {"stage": "prod", "requestId": "c6af9ac6"},
            "body": body,
            "isBase64Encoded": is_base64_encoded,
        }))
        .unwrap()
    }

    /// Returns a `HandlerError` of the specified kind.
    pub(crate) fn handler_error(kind: ErrorKind) -> HandlerError {
        match kind {
            ErrorKind::Configuration => HandlerError::Secret {
                path: PathBuf::from("/var/openfaas/secrets/mongo-db-password"),
                source: std::io::ErrorKind::NotFound.into(),
            },
            ErrorKind::Connectivity => HandlerError::Connect("server selection timeout".into()),
            ErrorKind::MalformedInput => BookingKind::Rental
                .parse_request(b"not json")
                .unwrap_err()
                .into(),
            ErrorKind::MissingField => BookingKind::Rental
                .parse_request(br#"{"trip_id":"T1","rental":"Hertz","rental_from":"2024-01-01"}"#)
                .unwrap_err()
                .into(),
            ErrorKind::Write => HandlerError::Write {
                collection: "rental_bookings",
                source: "insert rejected".into(),
            },
        }
    }

    /// Represents a mock `Handler`.
    pub(crate) struct MockHandler {
        failure: Option<ErrorKind>,
        bodies: RwLock<Vec<Vec<u8>>>,
    }

    impl MockHandler {
        /// Returns a `MockHandler` that confirms a hotel booking.
        pub fn succeeding() -> Self {
            Self {
                failure: None,
                bodies: RwLock::new(vec![]),
            }
        }

        /// Returns a `MockHandler` that fails with the specified kind of error.
        pub fn failing(kind: ErrorKind) -> Self {
            Self {
                failure: Some(kind),
                bodies: RwLock::new(vec![]),
            }
        }

        /// Returns every request body handled.
        pub fn bodies(&self) -> Vec<Vec<u8>> {
            self.bodies.read().unwrap().clone()
        }
    }

    impl Handler for MockHandler {
        fn handle(&self, body: &[u8]) -> Result<Confirmation> {
            self.bodies.write().unwrap().push(body.to_vec());
            match self.failure {
                Some(kind) => Err(handler_error(kind)),
                None => Ok(Confirmation::new("hotel_bookings", RECORD_ID)),
            }
        }
    }

    /// Represents a mock `Client` that replays queued events.
    pub(crate) struct MockClient {
        events: RwLock<VecDeque<anyhow::Result<Option<InvocationEvent>>>>,
        responses: RwLock<Vec<InvocationResponse>>,
        errors: RwLock<Vec<InvocationError>>,
    }

    impl MockClient {
        /// Returns a new `MockClient`.
        pub fn new(events: Vec<anyhow::Result<Option<InvocationEvent>>>) -> Self {
            Self {
                events: RwLock::new(events.into()),
                responses: RwLock::new(vec![]),
                errors: RwLock::new(vec![]),
            }
        }

        /// Returns every response sent.
        pub fn responses(&self) -> Vec<InvocationResponse> {
            self.responses.read().unwrap().clone()
        }

        /// Returns every error sent.
        pub fn errors(&self) -> Vec<InvocationError> {
            self.errors.read().unwrap().clone()
        }
    }

    impl Client for MockClient {
        fn next_invocation_event(&self) -> anyhow::Result<Option<InvocationEvent>> {
            self.events
                .write()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("No more events")))
        }

        fn send_invocation_error(&self, error: InvocationError) -> anyhow::Result<()> {
            self.errors.write().unwrap().push(error);
            Ok(())
        }

        fn send_invocation_response(&self, resp: InvocationResponse) -> anyhow::Result<()> {
            self.responses.write().unwrap().push(resp);
            Ok(())
        }
    }
}
