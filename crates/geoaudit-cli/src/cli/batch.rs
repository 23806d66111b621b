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

//! Batch commands for checking many runs against one spec table.

use crate::commands::{self, BatchSettings, RunOptions};
use crate::error::CliError;
use clap::Subcommand;

/// Batch processing commands.
///
/// Transcripts are processed in parallel when `--parallel` is given; every
/// transcript is verified even if an earlier one fails to load.
#[derive(Subcommand)]
pub enum BatchCommands {
    /// Verify many transcripts against one expected-spec table
    ///
    /// Prints a one-line summary per transcript and a batch summary. Fails
    /// if any transcript cannot be read.
    BatchVerify {
        /// Expected-spec CSV table
        #[arg(value_name = "SPECS")]
        specs: String,

        /// Run transcripts
        #[arg(value_name = "TRANSCRIPTS", num_args = 1..)]
        transcripts: Vec<String>,

        #[command(flatten)]
        run: RunOptions,

        /// Force parallel processing
        #[arg(short, long)]
        parallel: bool,

        /// Show verbose progress
        #[arg(short, long)]
        verbose: bool,

        /// Number of worker threads (defaults to one per core)
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,

        /// Exit non-zero when any case in any transcript is not MATCH
        #[arg(long)]
        fail_on_mismatch: bool,
    },
}

impl BatchCommands {
    /// Execute the command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            BatchCommands::BatchVerify {
                specs,
                transcripts,
                run,
                parallel,
                verbose,
                jobs,
                fail_on_mismatch,
            } => commands::batch_verify(
                &specs,
                transcripts,
                &run.to_verify_options(),
                BatchSettings {
                    parallel,
                    verbose,
                    jobs,
                    fail_on_mismatch,
                },
            ),
        }
    }
}
