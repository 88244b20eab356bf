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
use std::fs;
use std::path::Path;

use crate::error::{HandlerError, Result};

/// A database password. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Creates a new `Credential`.
    pub fn new(password: &str) -> Self {
        Credential(password.into())
    }

    /// Reads a credential from a secret file.
    /// The whole file is the password, line terminators included.
    pub fn read_from(path: &Path) -> Result<Self> {
        debug!("Reading database secret from {}", path.display());

        let password = fs::read_to_string(path).map_err(|source| HandlerError::Secret {
            path: path.into(),
            source,
        })?;

        Ok(Credential(password))
    }

    /// Returns the password.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
