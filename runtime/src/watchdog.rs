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

use anyhow::Context;
use booking_provider::Handler;

use std::io::{Read, Write};

/// Handles a single request the way the OpenFaaS classic watchdog runs a function:
/// the request body is the whole of `input` and the reply is written to `output`.
/// A failure is returned to the caller, which exits non-zero.
pub fn serve<H, R, W>(handler: &H, mut input: R, mut output: W) -> anyhow::Result<()>
where
    H: Handler,
    R: Read,
    W: Write,
{
    let mut body = Vec::new();
    input
        .read_to_end(&mut body)
        .context("Unable to read request body")?;
    debug!("Read {} byte request body", body.len());

    let confirmation = handler.handle(&body)?;

    writeln!(output, "{}", confirmation).context("Unable to write response")?;
    output.flush()?;

    Ok(())
}
