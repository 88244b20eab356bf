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

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Boxed error from a store backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`HandlerError`].
pub type Result<T> = std::result::Result<T, HandlerError>;

/// Every way a booking invocation can fail.
/// All of them are terminal for the invocation.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The database secret file could not be read.
    #[error("Unable to read database secret {}: {source}", .path.display())]
    Secret {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A required configuration value is absent.
    #[error("Missing configuration value: {0}")]
    MissingConfig(&'static str),

    /// The database could not be reached.
    #[error("Unable to connect to database: {0}")]
    Connect(#[source] BoxError),

    /// The request body could not be turned into a booking.
    #[error(transparent)]
    Request(#[from] booking_codec::Error),

    /// A request value has no representation in the store.
    #[error("Request value cannot be stored in {collection}: {source}")]
    Unstorable {
        collection: &'static str,
        #[source]
        source: BoxError,
    },

    /// The store rejected the insert.
    #[error("Unable to insert record in {collection}: {source}")]
    Write {
        collection: &'static str,
        #[source]
        source: BoxError,
    },
}

impl HandlerError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandlerError::Secret { .. } | HandlerError::MissingConfig(_) => {
                ErrorKind::Configuration
            }
            HandlerError::Connect(_) => ErrorKind::Connectivity,
            HandlerError::Request(booking_codec::Error::MissingField { .. }) => {
                ErrorKind::MissingField
            }
            HandlerError::Request(_) | HandlerError::Unstorable { .. } => {
                ErrorKind::MalformedInput
            }
            HandlerError::Write { .. } => ErrorKind::Write,
        }
    }
}

/// Coarse classification of a [`HandlerError`], for hosts that report failures by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Connectivity,
    MalformedInput,
    MissingField,
    Write,
}

impl ErrorKind {
    /// Returns the name reported as a Lambda `errorType`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Connectivity => "ConnectivityError",
            ErrorKind::MalformedInput => "MalformedInput",
            ErrorKind::MissingField => "MissingField",
            ErrorKind::Write => "WriteError",
        }
    }

    /// Returns whether the caller sent a bad request.
    pub fn is_client_error(self) -> bool {
        matches!(self, ErrorKind::MalformedInput | ErrorKind::MissingField)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
