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
// Booking Insert Provider
//

use booking_codec::{BookingKind, Confirmation};

use crate::config::HandlerConfig;
use crate::connection::ConnectionString;
use crate::credential::Credential;
use crate::error::Result;
use crate::store::{BookingStore, Connector, MongoConnector};

/// Handles one function invocation.
pub trait Handler {
    /// Handles a request body, returning the confirmation of what was recorded.
    fn handle(&self, body: &[u8]) -> Result<Confirmation>;
}

/// Inserts one booking of a fixed kind per invocation.
pub struct BookingHandler<C> {
    kind: BookingKind,
    config: HandlerConfig,
    connector: C,
}

impl BookingHandler<MongoConnector> {
    /// Creates a new `BookingHandler` backed by MongoDB.
    pub fn mongo(kind: BookingKind, config: HandlerConfig) -> Self {
        Self::new(kind, config, MongoConnector)
    }
}

impl<C: Connector> BookingHandler<C> {
    /// Creates a new `BookingHandler` using the specified connector.
    pub fn new(kind: BookingKind, config: HandlerConfig, connector: C) -> Self {
        BookingHandler {
            kind,
            config,
            connector,
        }
    }

    /// Returns the kind of booking this handler records.
    pub fn kind(&self) -> BookingKind {
        self.kind
    }

    /// Returns the handler's configuration.
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }
}

impl<C: Connector> Handler for BookingHandler<C> {
    fn handle(&self, body: &[u8]) -> Result<Confirmation> {
        // Reject bad requests before touching the secret or the database.
        let booking = self.kind.parse_request(body)?;
        debug!("Parsed {} booking for trip {}", self.kind, booking.trip_id());

        let credential = Credential::read_from(&self.config.secret_path)?;
        let target = ConnectionString::new(&self.config, &credential)?;
        let store = self.connector.connect(&target, &self.config.database)?;
        let id = store.insert_booking(&booking)?;

        info!("Inserted {} booking {} in {}", self.kind, id, booking.collection());

        Ok(Confirmation::new(booking.collection(), &id))
    }
}
