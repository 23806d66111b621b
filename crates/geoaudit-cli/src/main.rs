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

//! geoaudit command line interface

use clap::Parser;
use geoaudit_cli::cli::Commands;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// geoaudit - verify the queries an assistant issued during a test run
///
/// Reads a table of expected requests and one or more run transcripts,
/// recovers the request each test case actually issued and reports a
/// verdict per case.
///
/// # Examples
///
/// ```bash
/// # Verify one run and print a colored report
/// geoaudit verify expected.csv run.log
///
/// # Machine-readable verdicts
/// geoaudit verify expected.csv run.log --format csv --output verdicts.csv
///
/// # Look at what the extractor sees for one case
/// geoaudit inspect run.log --case 12
///
/// # Many runs against one table
/// geoaudit batch-verify expected.csv runs/*.log --parallel
/// ```
#[derive(Parser)]
#[command(name = "geoaudit")]
#[command(author, version, about = "geoaudit - transcript query verification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("geoaudit=info".parse().expect("valid log directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
