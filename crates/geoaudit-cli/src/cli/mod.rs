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

//! CLI command definitions and argument parsing.
//!
//! Commands are split by category:
//!
//! - [`core`]: single-run commands (verify, inspect)
//! - [`batch`]: many transcripts against one spec table (batch-verify)

mod batch;
mod core;

use crate::error::CliError;
use clap::Subcommand;

pub use batch::BatchCommands;
pub use core::CoreCommands;

/// Top-level CLI commands.
///
/// Each category is flattened so its commands appear at the top level:
///
/// ```text
/// Commands
/// ├── Core (verify, inspect)
/// └── Batch (batch-verify)
/// ```
#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Batch(BatchCommands),
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns `Err` if an input cannot be read or loaded, output cannot be
    /// written, or `--fail-on-mismatch` is set and a case did not match.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Core(cmd) => cmd.execute(),
            Commands::Batch(cmd) => cmd.execute(),
        }
    }
}
