// Geoaudit - transcript query verification
//
// Copyright (c) 2025 Geoaudit contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Single-run commands: verification and extraction debugging.

use crate::commands::{self, ReportFormat, RunOptions, VerifySettings};
use crate::error::CliError;
use clap::Subcommand;

/// Commands that operate on one transcript.
#[derive(Subcommand)]
pub enum CoreCommands {
    /// Verify a transcript against an expected-spec table
    ///
    /// Recovers the request each expected case issued and prints one
    /// verdict per case: MATCH, MISMATCH, NO_CALLS or NOT_FOUND.
    Verify {
        /// Expected-spec CSV table
        #[arg(value_name = "SPECS")]
        specs: String,

        /// Run transcript
        #[arg(value_name = "TRANSCRIPT")]
        transcript: String,

        /// Output format (text, json, csv)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        run: RunOptions,

        /// Verify cases on the rayon thread pool
        #[arg(short, long)]
        parallel: bool,

        /// Exit non-zero when any case is not MATCH
        #[arg(long)]
        fail_on_mismatch: bool,
    },

    /// Show what the extractor sees in a transcript
    ///
    /// Lists every case window with its actions, response URLs, skipped
    /// payloads and the request each action rebuilds to.
    Inspect {
        /// Run transcript
        #[arg(value_name = "TRANSCRIPT")]
        transcript: String,

        /// Only show this case id
        #[arg(short, long, value_name = "ID")]
        case: Option<String>,

        #[command(flatten)]
        run: RunOptions,
    },
}

impl CoreCommands {
    /// Execute the command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            CoreCommands::Verify {
                specs,
                transcript,
                format,
                output,
                run,
                parallel,
                fail_on_mismatch,
            } => {
                let settings = VerifySettings {
                    format: format.parse::<ReportFormat>()?,
                    output,
                    options: run.to_verify_options(),
                    parallel,
                    fail_on_mismatch,
                };
                commands::verify(&specs, &transcript, &settings)
            }
            CoreCommands::Inspect {
                transcript,
                case,
                run,
            } => commands::inspect(&transcript, case.as_deref(), &run.to_verify_options()),
        }
    }
}
