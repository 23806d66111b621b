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

//! Verify command - one transcript against an expected-spec table

use super::{read_file, write_output};
use crate::error::CliError;
use colored::{ColoredString, Colorize};
use geoaudit_core::{verify as verify_run, verify_parallel, Summary, Verdict, VerifyOptions};
use geoaudit_csv::{load_specs, write_verdicts};
use std::fmt::Write as _;
use std::str::FromStr;
use tracing::info;

/// Report rendering for the verify command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Colored human-readable report
    #[default]
    Text,
    /// Pretty-printed JSON summary
    Json,
    /// One row per case
    Csv,
}

impl FromStr for ReportFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(CliError::invalid_input(format!(
                "unknown format '{}' (expected text, json or csv)",
                other
            ))),
        }
    }
}

/// Everything the verify command needs besides its two input paths.
#[derive(Debug, Clone, Default)]
pub struct VerifySettings {
    pub format: ReportFormat,
    /// Output file; stdout when `None`.
    pub output: Option<String>,
    pub options: VerifyOptions,
    pub parallel: bool,
    pub fail_on_mismatch: bool,
}

/// Verify one transcript against an expected-spec table.
///
/// # Arguments
///
/// * `specs` - Path to the expected-spec CSV table
/// * `transcript` - Path to the run transcript
/// * `settings` - Output format, destination and pipeline options
///
/// # Errors
///
/// Returns `Err` if:
/// - Either file cannot be read
/// - The spec table is malformed
/// - The report cannot be rendered or written
/// - `fail_on_mismatch` is set and any case is not MATCH
///
/// # Examples
///
/// ```no_run
/// use geoaudit_cli::commands::{verify, ReportFormat, VerifySettings};
///
/// # fn main() -> Result<(), geoaudit_cli::error::CliError> {
/// let settings = VerifySettings {
///     format: ReportFormat::Json,
///     ..Default::default()
/// };
/// verify("expected.csv", "run.log", &settings)?;
/// # Ok(())
/// # }
/// ```
pub fn verify(specs: &str, transcript: &str, settings: &VerifySettings) -> Result<(), CliError> {
    let spec_set = load_specs(&read_file(specs)?)?;
    let text = read_file(transcript)?;

    info!(
        "Verifying {} cases against '{}' ({} bytes)",
        spec_set.len(),
        transcript,
        text.len()
    );

    let summary = if settings.parallel {
        verify_parallel(&spec_set, &text, &settings.options)
    } else {
        verify_run(&spec_set, &text, &settings.options)
    };

    let rendered = match settings.format {
        ReportFormat::Text => {
            if settings.output.is_some() {
                colored::control::set_override(false);
            }
            render_text(&summary, transcript)
        }
        ReportFormat::Json => {
            let mut json = serde_json::to_string_pretty(&summary)?;
            json.push('\n');
            json
        }
        ReportFormat::Csv => {
            write_verdicts(&summary).map_err(|e| CliError::csv_output(e.to_string()))?
        }
    };
    write_output(&rendered, settings.output.as_deref())?;

    if settings.fail_on_mismatch && !summary.all_matched() {
        return Err(CliError::CasesFailed {
            failed: summary.failures().count(),
            total: summary.totals.cases,
        });
    }
    Ok(())
}

fn colored_verdict(verdict: Verdict) -> ColoredString {
    let label = format!("{} {}", verdict.glyph(), verdict);
    match verdict {
        Verdict::Match => label.green().bold(),
        Verdict::Mismatch => label.red().bold(),
        Verdict::NoCalls => label.yellow().bold(),
        Verdict::NotFound => label.magenta().bold(),
    }
}

/// Render a summary as the human-readable report.
///
/// The header carries the scan counts, then one line per case in id order.
/// Mismatches also show the expected and actual requests.
pub fn render_text(summary: &Summary, source: &str) -> String {
    let mut out = String::new();
    let stats = &summary.stats;
    let totals = &summary.totals;

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{} {}", "Transcript:".bright_blue().bold(), source);
    let _ = writeln!(
        out,
        "  {} {} of {}",
        "Questions found:".bright_cyan(),
        stats.questions_found,
        totals.cases
    );
    let _ = writeln!(out, "  {} {}", "Actions found:".bright_cyan(), stats.actions_found);
    let _ = writeln!(out, "  {} {}", "Response URLs found:".bright_cyan(), stats.urls_found);
    if stats.skipped_payloads > 0 {
        let _ = writeln!(
            out,
            "  {} {}",
            "Skipped payloads:".yellow(),
            stats.skipped_payloads
        );
    }
    out.push('\n');

    for case in &summary.cases {
        let _ = writeln!(
            out,
            "{} Q{}  {}",
            colored_verdict(case.verdict),
            case.id,
            case.question.dimmed()
        );
        if case.verdict == Verdict::Mismatch {
            let _ = writeln!(out, "    {} {}", "expected:".dimmed(), case.expected);
            if let Some(actual) = &case.actual {
                let _ = writeln!(
                    out,
                    "    {} {} ({})",
                    "actual:  ".dimmed(),
                    actual.request,
                    actual.provenance
                );
            }
        }
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "{} {} cases, {} match, {} mismatch, {} no calls, {} not found ({:.1}% match)",
        "Totals:".bright_blue().bold(),
        totals.cases,
        totals.matches,
        totals.mismatches,
        totals.no_calls,
        totals.not_found,
        summary.match_rate()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoaudit_test::fixtures;

    #[test]
    fn test_report_format_parse() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("csv".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert!(matches!(
            "xml".parse::<ReportFormat>(),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_render_text_full_run() {
        colored::control::set_override(false);
        let fixture = fixtures::full_run();
        let summary = verify_run(&fixture.spec_set(), &fixture.transcript, &fixture.options());
        let text = render_text(&summary, "run.log");

        assert!(text.starts_with("Transcript: run.log\n"));
        assert!(text.contains("Questions found: 4 of 5"));
        assert!(text.contains("Actions found: 2"));
        assert!(text.contains("Response URLs found: 1"));
        assert!(text.contains("✓ MATCH Q1  Population of New York"));
        assert!(text.contains("✗ MISMATCH Q9  Households in Maine"));
        assert!(text.contains("    expected: https://api.example.org/data/2020/acs/acs5"));
        assert!(text.contains("(action)"));
        assert!(text.contains("∅ NO_CALLS Q10"));
        assert!(text.contains("? NOT_FOUND Q12"));
        assert!(text.contains(
            "Totals: 5 cases, 2 match, 1 mismatch, 1 no calls, 1 not found (40.0% match)"
        ));
    }
}
