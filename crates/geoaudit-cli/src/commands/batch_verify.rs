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

//! Batch verify command - one spec table against many transcripts

use super::read_file;
use crate::batch::{BatchConfig, BatchReport, BatchVerifier};
use crate::error::CliError;
use colored::Colorize;
use geoaudit_core::{Summary, VerifyOptions};
use geoaudit_csv::load_specs;
use std::path::PathBuf;
use tracing::info;

/// Flags of the batch-verify command.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchSettings {
    /// Process transcripts in parallel regardless of batch size
    pub parallel: bool,
    pub verbose: bool,
    /// Worker thread count; rayon's default when `None`
    pub jobs: Option<usize>,
    pub fail_on_mismatch: bool,
}

/// Verify many transcripts against one expected-spec table.
///
/// The spec table is loaded once and shared by every transcript. Prints
/// one line per transcript followed by the batch summary.
///
/// # Errors
///
/// Returns `Err` if:
/// - The spec table cannot be read or is malformed
/// - Any transcript cannot be read (`BatchFailed`)
/// - `fail_on_mismatch` is set and any case in any transcript is not MATCH
///
/// # Examples
///
/// ```no_run
/// use geoaudit_cli::commands::{batch_verify, BatchSettings};
/// use geoaudit_core::VerifyOptions;
///
/// # fn main() -> Result<(), geoaudit_cli::error::CliError> {
/// let runs = vec!["run1.log".to_string(), "run2.log".to_string()];
/// let settings = BatchSettings {
///     parallel: true,
///     ..Default::default()
/// };
/// batch_verify("expected.csv", runs, &VerifyOptions::default(), settings)?;
/// # Ok(())
/// # }
/// ```
pub fn batch_verify(
    specs: &str,
    transcripts: Vec<String>,
    options: &VerifyOptions,
    settings: BatchSettings,
) -> Result<(), CliError> {
    let spec_set = load_specs(&read_file(specs)?)?;
    let paths: Vec<PathBuf> = transcripts.iter().map(PathBuf::from).collect();
    info!(
        "Verifying {} transcripts against {} cases",
        paths.len(),
        spec_set.len()
    );

    let config = BatchConfig {
        parallel_threshold: if settings.parallel { 1 } else { usize::MAX },
        max_threads: settings.jobs,
        verbose: settings.verbose,
    };
    let verifier = BatchVerifier::new(spec_set, options.clone(), config);
    let report = verifier.run(&paths)?;

    println!();
    for (path, summary) in report.summaries() {
        println!("{}", run_line(&path.display().to_string(), summary));
    }
    for (path, error) in report.unreadable() {
        println!("{} {}", "✗".red().bold(), path.display());
        println!("    {}", error.to_string().dimmed());
    }
    print_batch_summary(&report);

    if report.has_failures() {
        return Err(CliError::BatchFailed {
            failed: report.failure_count(),
            total: report.total_files(),
        });
    }
    let (failed_cases, total_cases) = report.case_totals();
    if settings.fail_on_mismatch && failed_cases > 0 {
        return Err(CliError::CasesFailed {
            failed: failed_cases,
            total: total_cases,
        });
    }
    Ok(())
}

fn print_batch_summary(report: &BatchReport) {
    let (failed_cases, total_cases) = report.case_totals();
    println!();
    println!("{}", "═".repeat(60).bright_blue());
    println!("{}", "Batch Summary".bright_blue().bold());
    println!("{}", "═".repeat(60).bright_blue());
    println!("  {} {}", "Transcripts:".bright_cyan(), report.total_files());
    println!("  {} {}", "Unreadable:".red().bold(), report.failure_count());
    println!(
        "  {} {}/{}",
        "Cases matched:".green().bold(),
        total_cases - failed_cases,
        total_cases
    );
    println!(
        "  {} {:.2}s ({:.1} transcripts/s)",
        "Elapsed:".bright_cyan(),
        report.elapsed_ms as f64 / 1000.0,
        report.throughput()
    );
    println!("{}", "═".repeat(60).bright_blue());
}

fn run_line(path: &str, summary: &Summary) -> String {
    let totals = &summary.totals;
    let status = if summary.all_matched() {
        "✓".green().bold()
    } else {
        "✗".yellow().bold()
    };
    format!(
        "{} {}  {}/{} match, {} mismatch, {} no calls, {} not found",
        status,
        path,
        totals.matches,
        totals.cases,
        totals.mismatches,
        totals.no_calls,
        totals.not_found
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoaudit_core::verify;
    use geoaudit_test::fixtures;

    #[test]
    fn test_run_line() {
        colored::control::set_override(false);
        let fixture = fixtures::retried_actions();
        let summary = verify(&fixture.spec_set(), &fixture.transcript, &fixture.options());
        assert_eq!(
            run_line("runs/a.log", &summary),
            "✗ runs/a.log  1/2 match, 1 mismatch, 0 no calls, 0 not found"
        );
    }
}
