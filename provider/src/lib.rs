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

#[macro_use]
extern crate log;

pub use crate::config::HandlerConfig;
pub use crate::connection::ConnectionString;
pub use crate::credential::Credential;
pub use crate::error::{BoxError, ErrorKind, HandlerError, Result};
pub use crate::handler::{BookingHandler, Handler};
pub use crate::store::{BookingStore, Connector, MongoConnector, MongoStore};

pub mod config;
pub mod connection;
mod credential;
mod error;
mod handler;
mod store;

/// This module contains code to be used by many unit tests.
#[cfg(test)]
mod tests_common {
    use booking_codec::Booking;
    use serde_json::Value;
    use tempfile::NamedTempFile;

    use std::io::Write;
    use std::sync::{Arc, RwLock};

    use super::{BookingStore, ConnectionString, Connector, HandlerConfig, HandlerError, Result};

    pub(crate) const HOST: &str = "mongo.test:27017";

    /// Returns a secret file holding the specified password.
    pub(crate) fn secret_file(password: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(password.as_bytes()).unwrap();
        file
    }

    /// Returns a configuration that reads the specified secret file.
    pub(crate) fn config_for(secret: &NamedTempFile) -> HandlerConfig {
        HandlerConfig::default().host(HOST).secret_path(secret.path())
    }

    /// Returns the identifier the in-memory store assigns to its nth record.
    pub(crate) fn record_id(n: usize) -> String {
        format!("{:024x}", n + 1)
    }

    /// Inserted records, as (collection, record).
    type Records = Arc<RwLock<Vec<(String, Value)>>>;

    /// Represents a `Connector` whose stores keep records in memory.
    pub(crate) struct MemoryConnector {
        connections: RwLock<Vec<(String, String)>>,
        records: Records,
        fail_connect: bool,
        fail_write: bool,
    }

    impl MemoryConnector {
        /// Returns a new `MemoryConnector`.
        pub fn new() -> Self {
            Self {
                connections: RwLock::new(vec![]),
                records: Arc::new(RwLock::new(vec![])),
                fail_connect: false,
                fail_write: false,
            }
        }

        /// Returns a `MemoryConnector` that cannot connect.
        pub fn failing_connect() -> Self {
            Self {
                fail_connect: true,
                ..Self::new()
            }
        }

        /// Returns a `MemoryConnector` whose stores reject every insert.
        pub fn failing_write() -> Self {
            Self {
                fail_write: true,
                ..Self::new()
            }
        }

        /// Returns every (connection string, database) connected to.
        pub fn connections(&self) -> Vec<(String, String)> {
            self.connections.read().unwrap().clone()
        }

        /// Returns every inserted record.
        pub fn inserted(&self) -> Vec<(String, Value)> {
            self.records.read().unwrap().clone()
        }
    }

    impl Connector for MemoryConnector {
        type Store = MemoryStore;

        fn connect(&self, target: &ConnectionString, database: &str) -> Result<MemoryStore> {
            self.connections
                .write()
                .unwrap()
                .push((target.as_str().into(), database.into()));
            if self.fail_connect {
                return Err(HandlerError::Connect("connection refused".into()));
            }

            Ok(MemoryStore {
                records: Arc::clone(&self.records),
                fail_write: self.fail_write,
            })
        }
    }

    /// Represents a `BookingStore` that keeps records in memory.
    pub(crate) struct MemoryStore {
        records: Records,
        fail_write: bool,
    }

    impl BookingStore for MemoryStore {
        fn insert_booking(&self, booking: &Booking) -> Result<String> {
            if self.fail_write {
                return Err(HandlerError::Write {
                    collection: booking.collection(),
                    source: "insert rejected".into(),
                });
            }

            let mut records = self.records.write().unwrap();
            let id = record_id(records.len());
            records.push((
                booking.collection().into(),
                serde_json::to_value(booking).unwrap(),
            ));

            Ok(id)
        }
    }
}
