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

use std::env;
use std::path::PathBuf;

use crate::error::{HandlerError, Result};

/// Where OpenFaaS mounts the database password.
pub const DEFAULT_SECRET_PATH: &str = "/var/openfaas/secrets/mongo-db-password";
pub const DEFAULT_DATABASE: &str = "openfaas";
pub const DEFAULT_PRINCIPAL: &str = "root";

pub const HOST_VAR: &str = "mongo_host";
pub const SECRET_PATH_VAR: &str = "mongo_secret_path";
pub const DATABASE_VAR: &str = "mongo_database";
pub const PRINCIPAL_VAR: &str = "mongo_user";

/// Database settings for a booking handler.
/// Loaded once at process start and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub secret_path: PathBuf,
    pub host: Option<String>,
    pub principal: String,
    pub database: String,
}

impl Default for HandlerConfig {
    /// Returns the default value for `HandlerConfig`.
    /// The default has no host.
    fn default() -> Self {
        HandlerConfig {
            secret_path: DEFAULT_SECRET_PATH.into(),
            host: None,
            principal: DEFAULT_PRINCIPAL.into(),
            database: DEFAULT_DATABASE.into(),
        }
    }
}

impl HandlerConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the configuration using the specified variable lookup.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        HandlerConfig {
            secret_path: get(SECRET_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.secret_path),
            host: get(HOST_VAR),
            principal: get(PRINCIPAL_VAR).unwrap_or(defaults.principal),
            database: get(DATABASE_VAR).unwrap_or(defaults.database),
        }
    }

    /// Returns a copy of the configuration with the specified host.
    pub fn host(self, host: &str) -> Self {
        HandlerConfig {
            host: Some(host.into()),
            ..self
        }
    }

    /// Returns a copy of the configuration with the specified secret path.
    pub fn secret_path<P: Into<PathBuf>>(self, path: P) -> Self {
        HandlerConfig {
            secret_path: path.into(),
            ..self
        }
    }

    /// Returns the database host, failing if none is configured.
    pub fn require_host(&self) -> Result<&str> {
        self.host
            .as_deref()
            .ok_or(HandlerError::MissingConfig(HOST_VAR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = HandlerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, HandlerConfig::default());
        assert_eq!(
            config.secret_path,
            PathBuf::from("/var/openfaas/secrets/mongo-db-password")
        );
        assert_eq!(config.principal, "root");
        assert_eq!(config.database, "openfaas");
    }

    #[test]
    fn environment_overrides() {
        let config = HandlerConfig::from_lookup(lookup(&[
            ("mongo_host", "mongo.openfaas:27017"),
            ("mongo_secret_path", "/run/secrets/pw"),
            ("mongo_database", "trips"),
            ("mongo_user", "booker"),
        ]));
        assert_eq!(config.host.as_deref(), Some("mongo.openfaas:27017"));
        assert_eq!(config.secret_path, PathBuf::from("/run/secrets/pw"));
        assert_eq!(config.database, "trips");
        assert_eq!(config.principal, "booker");
    }

    #[test]
    fn missing_host_is_a_configuration_error() {
        let config = HandlerConfig::from_lookup(lookup(&[("mongo_host", "  ")]));
        assert!(config.host.is_none());
        match config.require_host() {
            Err(HandlerError::MissingConfig(name)) => assert_eq!(name, "mongo_host"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn builder_methods() {
        let config = HandlerConfig::default()
            .host("db:27017")
            .secret_path("/tmp/pw");
        assert_eq!(config.require_host().unwrap(), "db:27017");
        assert_eq!(config.secret_path, PathBuf::from("/tmp/pw"));
    }
}
