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

use std::collections::HashMap;
use std::env;

pub const RUNTIME_API_VAR: &str = "AWS_LAMBDA_RUNTIME_API";
pub const FUNCTION_NAME_VAR: &str = "AWS_LAMBDA_FUNCTION_NAME";

// https://docs.aws.amazon.com/lambda/latest/dg/configuration-envvars.html#configuration-envvars-runtime
const FUNCTION_SETTINGS: [&str; 7] = [
    FUNCTION_NAME_VAR,
    "AWS_LAMBDA_FUNCTION_VERSION",
    "AWS_LAMBDA_LOG_GROUP_NAME",
    "AWS_LAMBDA_LOG_STREAM_NAME",
    RUNTIME_API_VAR,
    "LAMBDA_RUNTIME_DIR",
    "LAMBDA_TASK_ROOT",
];

/// The Lambda function settings present in the environment.
/// Outside Lambda there are none.
#[derive(Debug, Default)]
pub struct FunctionSettings {
    values: HashMap<String, String>,
}

impl FunctionSettings {
    /// Loads the function settings from the Lambda environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the function settings using the specified variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = FUNCTION_SETTINGS
            .iter()
            .filter_map(|name| lookup(name).map(|value| ((*name).to_string(), value)))
            .collect();

        FunctionSettings { values }
    }

    /// Returns the value of the specified setting.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns the runtime API endpoint, if running in Lambda.
    pub fn runtime_api(&self) -> Option<&str> {
        self.get(RUNTIME_API_VAR).filter(|v| !v.is_empty())
    }

    /// Logs every setting found.
    pub fn log(&self) {
        for name in FUNCTION_SETTINGS.iter() {
            if let Some(value) = self.get(name) {
                debug!("{}={}", name, value);
            }
        }
    }
}
