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

use booking_codec::ErrorResponse;

const REQUEST_ID_HEADER: &str = "Lambda-Runtime-Aws-Request-Id";
const TRACE_ID_HEADER: &str = "Lambda-Runtime-Trace-Id";
const ERROR_TYPE_HEADER: &str = "Lambda-Runtime-Function-Error-Type";

/// Represents an invocation event.
#[derive(Debug)]
pub struct InvocationEvent {
    body: Vec<u8>,
    request_id: Option<String>,
    trace_id: Option<String>,
}

/// Represents an invocation response.
#[derive(Debug, Clone)]
pub struct InvocationResponse {
    body: Vec<u8>,
    request_id: String,
}

/// Represents an invocation error.
#[derive(Debug, Clone)]
pub struct InvocationError {
    error: ErrorResponse,
    request_id: String,
}

/// Talks to the AWS Lambda runtime API.
pub trait Client {
    /// Returns the next invocation event.
    fn next_invocation_event(&self) -> anyhow::Result<Option<InvocationEvent>>;

    /// Sends an invocation error.
    fn send_invocation_error(&self, error: InvocationError) -> anyhow::Result<()>;

    /// Sends an invocation response.
    fn send_invocation_response(&self, resp: InvocationResponse) -> anyhow::Result<()>;
}

/// Represents an AWS Lambda runtime HTTP client.
pub struct RuntimeClient {
    endpoint: String,
    http_client: reqwest::blocking::Client,
}

impl RuntimeClient {
    /// Creates a new `RuntimeClient` with the specified AWS Lambda runtime API endpoint (`host:port`).
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        // The next-invocation request blocks until an event arrives.
        let http_client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()?;

        Ok(RuntimeClient {
            endpoint: format!("http://{}", endpoint),
            http_client,
        })
    }
}

impl Client for RuntimeClient {
    fn next_invocation_event(&self) -> anyhow::Result<Option<InvocationEvent>> {
        // https://docs.aws.amazon.com/lambda/latest/dg/runtimes-api.html#runtimes-api-next
        let url = format!("{}/2018-06-01/runtime/invocation/next", self.endpoint);
        let resp = self.http_client.get(&url).send()?;
        let status = resp.status();
        info!("GET {} {}", url, status);
        if !status.is_success() {
            return Ok(None);
        }

        let request_id = header(&resp, REQUEST_ID_HEADER)?;
        let trace_id = header(&resp, TRACE_ID_HEADER)?;
        let body = resp.bytes()?.to_vec();

        Ok(Some(InvocationEvent {
            body,
            request_id,
            trace_id,
        }))
    }

    fn send_invocation_error(&self, error: InvocationError) -> anyhow::Result<()> {
        // https://docs.aws.amazon.com/lambda/latest/dg/runtimes-api.html#runtimes-api-invokeerror
        let url = format!(
            "{}/2018-06-01/runtime/invocation/{}/error",
            self.endpoint, error.request_id
        );
        let resp = self
            .http_client
            .post(&url)
            .header(ERROR_TYPE_HEADER, error.error.error_type.as_str())
            .json(&error.error)
            .send()?;
        let status = resp.status();
        info!("POST {} {}", url, status);
        if !status.is_success() {
            return Err(anyhow!("Runtime API rejected invocation error: {}", status));
        }

        Ok(())
    }

    fn send_invocation_response(&self, resp: InvocationResponse) -> anyhow::Result<()> {
        // https://docs.aws.amazon.com/lambda/latest/dg/runtimes-api.html#runtimes-api-response
        let url = format!(
            "{}/2018-06-01/runtime/invocation/{}/response",
            self.endpoint, resp.request_id
        );
        let resp = self.http_client.post(&url).body(resp.body).send()?;
        let status = resp.status();
        info!("POST {} {}", url, status);
        if !status.is_success() {
            return Err(anyhow!("Runtime API rejected invocation response: {}", status));
        }

        Ok(())
    }
}

// Returns any value of the specified response header.
fn header(resp: &reqwest::blocking::Response, name: &str) -> anyhow::Result<Option<String>> {
    match resp.headers().get(name) {
        Some(value) => Ok(Some(value.to_str()?.into())),
        None => Ok(None),
    }
}

impl InvocationEvent {
    /// Creates a new `InvocationEvent` with the specified body.
    pub fn new(body: Vec<u8>) -> Self {
        InvocationEvent {
            body,
            request_id: None,
            trace_id: None,
        }
    }

    /// Returns the event with the specified request ID.
    pub fn with_request_id(self, request_id: &str) -> Self {
        InvocationEvent {
            request_id: Some(request_id.into()),
            ..self
        }
    }

    /// Returns the event with the specified trace ID.
    pub fn with_trace_id(self, trace_id: &str) -> Self {
        InvocationEvent {
            trace_id: Some(trace_id.into()),
            ..self
        }
    }

    /// Returns the event body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns any request ID.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns any trace ID.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

impl InvocationResponse {
    /// Creates a new `InvocationResponse` with the specified body and request ID.
    pub fn new(body: Vec<u8>, request_id: &str) -> Self {
        InvocationResponse {
            body,
            request_id: request_id.into(),
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

impl InvocationError {
    /// Creates a new `InvocationError` with the specified message, error type and request ID.
    pub fn new(message: &str, error_type: &str, request_id: &str) -> Self {
        InvocationError {
            error: ErrorResponse::new(message, error_type),
            request_id: request_id.into(),
        }
    }

    pub fn error(&self) -> &ErrorResponse {
        &self.error
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}
