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

//! Machine-readable verdict export.

use crate::error::Result;
use geoaudit_core::{CaseOutcome, Summary};
use std::io::Write;

/// Column names of the verdict table, in output order.
pub const VERDICT_COLUMNS: [&str; 9] = [
    "id",
    "question",
    "verdict",
    "expected",
    "actual",
    "provenance",
    "actions_found",
    "urls_found",
    "skipped_payloads",
];

/// Configuration for verdict output.
#[derive(Debug, Clone)]
pub struct WriteConfig {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Include header row (default: true)
    pub include_headers: bool,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_headers: true,
        }
    }
}

/// Render a summary as a CSV verdict table, one row per case.
///
/// # Examples
///
/// ```
/// use geoaudit_core::{verify, ExpectedSpec, SpecSet, VerifyOptions};
/// use geoaudit_csv::write_verdicts;
///
/// let specs = SpecSet::from_specs(vec![ExpectedSpec::new(7, "Never asked", "https://h/x")]).unwrap();
/// let summary = verify(&specs, "", &VerifyOptions::default());
///
/// let csv = write_verdicts(&summary).unwrap();
/// assert_eq!(csv.lines().nth(1), Some("7,Never asked,NOT_FOUND,https://h/x,,,0,0,0"));
/// ```
pub fn write_verdicts(summary: &Summary) -> Result<String> {
    write_verdicts_with_config(summary, &WriteConfig::default())
}

/// Render a summary as CSV with a custom configuration.
pub fn write_verdicts_with_config(summary: &Summary, config: &WriteConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_verdicts_writer(summary, &mut buffer, config)?;
    // Every field comes from a `String`, so the output is valid UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the verdict table to any writer.
pub fn write_verdicts_writer<W: Write>(summary: &Summary, writer: W, config: &WriteConfig) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_writer(writer);

    if config.include_headers {
        wtr.write_record(VERDICT_COLUMNS)?;
    }
    for case in &summary.cases {
        wtr.write_record(verdict_row(case))?;
    }
    wtr.flush()?;
    Ok(())
}

fn verdict_row(case: &CaseOutcome) -> [String; 9] {
    let (actual, provenance) = match &case.actual {
        Some(candidate) => (candidate.request.clone(), candidate.provenance.to_string()),
        None => (String::new(), String::new()),
    };
    [
        case.id.clone(),
        case.question.clone(),
        case.verdict.to_string(),
        case.expected.clone(),
        actual,
        provenance,
        case.actions_found.to_string(),
        case.urls_found.to_string(),
        case.skipped_payloads.to_string(),
    ]
}
