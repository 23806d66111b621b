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

//! Inspect command - what the extractor sees in a transcript

use super::{read_file, write_output};
use crate::error::CliError;
use colored::Colorize;
use geoaudit_core::{
    build_request, extract, normalize_id, segment_indexed, MarkerIndex, VerifyOptions,
};
use std::fmt::Write as _;

/// Show case windows and everything extracted from them.
///
/// Windows are computed over every id that appears in the transcript, so a
/// window here ends where the next greater id begins, exactly as it would
/// if every id were expected. Useful for working out why a case came back
/// NO_CALLS or MISMATCH.
///
/// # Arguments
///
/// * `transcript` - Path to the run transcript
/// * `case` - Only show this case id (`"12"` and `"12.0"` are the same)
/// * `options` - Extraction and build options
///
/// # Errors
///
/// Returns `Err` if the file cannot be read, `case` is not a valid id, or
/// the requested case never appears in the transcript.
///
/// # Examples
///
/// ```no_run
/// use geoaudit_cli::commands::inspect;
/// use geoaudit_core::VerifyOptions;
///
/// # fn main() -> Result<(), geoaudit_cli::error::CliError> {
/// inspect("run.log", Some("12"), &VerifyOptions::default())?;
/// # Ok(())
/// # }
/// ```
pub fn inspect(transcript: &str, case: Option<&str>, options: &VerifyOptions) -> Result<(), CliError> {
    let filter = case
        .map(|raw| {
            normalize_id(raw)
                .map(|(number, _)| number)
                .ok_or_else(|| CliError::invalid_input(format!("invalid case id '{}'", raw)))
        })
        .transpose()?;

    let text = read_file(transcript)?;
    let rendered = render_inspection(&text, transcript, filter, options)?;
    write_output(&rendered, None)
}

fn render_inspection(
    text: &str,
    source: &str,
    filter: Option<u64>,
    options: &VerifyOptions,
) -> Result<String, CliError> {
    let index = MarkerIndex::scan(text);
    let segmentation = segment_indexed(&index, index.ids());

    if let Some(number) = filter {
        if segmentation.get(number).is_none() {
            return Err(CliError::invalid_input(format!(
                "case {} does not appear in '{}'",
                number, source
            )));
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "Transcript:".bright_blue().bold(), source);
    let _ = writeln!(out, "  {} {}", "Bytes:".bright_cyan(), index.transcript_len());
    let _ = writeln!(out, "  {} {}", "Markers:".bright_cyan(), index.marker_count());
    let ids: Vec<String> = index.ids().map(|n| n.to_string()).collect();
    let _ = writeln!(out, "  {} {}", "Case ids:".bright_cyan(), ids.join(", "));

    for window in segmentation.iter() {
        if filter.is_some_and(|n| n != window.number) {
            continue;
        }

        out.push('\n');
        let _ = writeln!(
            out,
            "{} bytes {}..{} ({} bytes, {} markers)",
            format!("Q{}", window.number).bold(),
            window.start,
            window.end,
            window.len(),
            index.offsets(window.number).len()
        );

        let extraction = extract(text, window, &options.extract);
        for action in &extraction.actions {
            let _ = writeln!(
                out,
                "  {} @{} {}",
                "action".green(),
                action.offset,
                build_request(&action.payload, &options.build)
            );
        }
        for url in &extraction.urls {
            let _ = writeln!(out, "  {} @{} {}", "url".cyan(), url.offset, url.url);
        }
        for skipped in &extraction.skipped {
            let _ = writeln!(
                out,
                "  {} @{} {}",
                "skipped".yellow(),
                skipped.offset,
                skipped.error
            );
        }

        match extraction.final_candidate(&options.build) {
            Some(candidate) => {
                let _ = writeln!(
                    out,
                    "  {} {} ({})",
                    "final:".bold(),
                    candidate.request,
                    candidate.provenance
                );
            }
            None => {
                let _ = writeln!(out, "  {} {}", "final:".bold(), "no usable request".dimmed());
            }
        }
    }

    Ok(out)
}
