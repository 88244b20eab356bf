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

use booking_codec::Booking;
use mongodb::bson::{self, Bson, Document};
use mongodb::error::ErrorKind as MongoErrorKind;
use mongodb::sync::{Client, Database};

use crate::connection::ConnectionString;
use crate::error::{HandlerError, Result};

/// Opens a store for the duration of one invocation.
pub trait Connector {
    /// The store type.
    type Store: BookingStore;

    /// Connects to the specified database.
    fn connect(&self, target: &ConnectionString, database: &str) -> Result<Self::Store>;
}

/// A store that booking records are written to.
pub trait BookingStore {
    /// Inserts a booking as a new record in its collection.
    /// Returns the identifier the store assigned to it.
    fn insert_booking(&self, booking: &Booking) -> Result<String>;
}

impl<C: Connector + ?Sized> Connector for &C {
    type Store = C::Store;

    fn connect(&self, target: &ConnectionString, database: &str) -> Result<Self::Store> {
        (**self).connect(target, database)
    }
}

/// Connects to MongoDB with the driver's blocking API.
#[derive(Debug, Default, Clone, Copy)]
pub struct MongoConnector;

impl Connector for MongoConnector {
    type Store = MongoStore;

    fn connect(&self, target: &ConnectionString, database: &str) -> Result<MongoStore> {
        debug!("Connecting to {:?}", target);

        let client =
            Client::with_uri_str(target.as_str()).map_err(|e| HandlerError::Connect(e.into()))?;

        Ok(MongoStore {
            database: client.database(database),
        })
    }
}

/// A MongoDB database holding the booking collections.
/// The client is dropped with the store.
pub struct MongoStore {
    database: Database,
}

impl BookingStore for MongoStore {
    fn insert_booking(&self, booking: &Booking) -> Result<String> {
        let collection = booking.collection();
        let document = booking_document(booking)?;

        let result = self
            .database
            .collection::<Document>(collection)
            .insert_one(document)
            .run()
            .map_err(|e| {
                if is_connectivity_error(&e) {
                    HandlerError::Connect(e.into())
                } else {
                    HandlerError::Write {
                        collection,
                        source: e.into(),
                    }
                }
            })?;

        Ok(id_string(&result.inserted_id))
    }
}

/// Converts a booking to the document stored for it.
/// Integers outside the signed 64-bit range cannot be stored and count as bad input.
pub fn booking_document(booking: &Booking) -> Result<Document> {
    bson::to_document(booking).map_err(|e| HandlerError::Unstorable {
        collection: booking.collection(),
        source: e.into(),
    })
}

// The driver connects lazily, so an unreachable server first shows up on the insert.
fn is_connectivity_error(e: &mongodb::error::Error) -> bool {
    matches!(
        *e.kind,
        MongoErrorKind::ServerSelection { .. }
            | MongoErrorKind::DnsResolve { .. }
            | MongoErrorKind::Io(_)
            | MongoErrorKind::Authentication { .. }
    )
}

/// Returns the display form of an inserted identifier.
pub fn id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use booking_codec::BookingKind;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn object_id_is_hex() {
        let oid = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(id_string(&Bson::ObjectId(oid)), "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(id_string(&Bson::String("abc".into())), "abc");
        assert_eq!(id_string(&Bson::Int32(7)), "7");
    }

    #[test]
    fn booking_document_has_exactly_the_record_fields() {
        let booking = BookingKind::Hotel
            .parse_request(
                br#"{"trip_id":"T1","hotel":"Hilton","check_in":"2024-01-01","check_out":"2024-01-03","x":1}"#,
            )
            .unwrap();
        let document = booking_document(&booking).unwrap();
        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["trip_id", "hotel", "check_in", "check_out"]);
        assert_eq!(document.get_str("hotel").unwrap(), "Hilton");
    }

    #[test]
    fn oversized_integer_is_bad_input() {
        let booking = BookingKind::Rental
            .parse_request(
                br#"{"trip_id":18446744073709551615,"rental":"Hertz","rental_from":"2024-01-01","rental_to":"2024-01-03"}"#,
            )
            .unwrap();

        let err = booking_document(&booking).unwrap_err();

        assert!(matches!(err, HandlerError::Unstorable { .. }));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("rental_bookings"));
    }

    #[test]
    fn small_integers_are_stored_as_int64() {
        let booking = BookingKind::Rental
            .parse_request(
                br#"{"trip_id":42,"rental":"Hertz","rental_from":"2024-01-01","rental_to":"2024-01-03"}"#,
            )
            .unwrap();

        let document = booking_document(&booking).unwrap();

        assert_eq!(document.get("trip_id"), Some(&Bson::Int64(42)));
    }
}
