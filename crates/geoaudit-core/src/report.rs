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

//! Aggregation of case outcomes into a run summary.

use crate::types::Verdict;
use crate::verify::CaseOutcome;
use serde::Serialize;

/// Verdict counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub cases: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub no_calls: usize,
    pub not_found: usize,
    /// Cases with zero extracted signal, whether or not the marker appeared.
    pub not_found_or_no_calls: usize,
}

impl Totals {
    fn record(&mut self, verdict: Verdict) {
        self.cases += 1;
        match verdict {
            Verdict::Match => self.matches += 1,
            Verdict::Mismatch => self.mismatches += 1,
            Verdict::NoCalls => self.no_calls += 1,
            Verdict::NotFound => self.not_found += 1,
        }
        self.not_found_or_no_calls = self.no_calls + self.not_found;
    }
}

/// What the extraction stage saw across all windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Expected cases whose marker appears in the transcript.
    pub questions_found: usize,
    pub actions_found: usize,
    pub urls_found: usize,
    pub skipped_payloads: usize,
}

/// Outcome of a verification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// One entry per expected case, ascending numeric id.
    pub cases: Vec<CaseOutcome>,
    pub totals: Totals,
    pub stats: ScanStats,
}

impl Summary {
    /// Whether every case matched. An empty run counts as passing.
    pub fn all_matched(&self) -> bool {
        self.totals.matches == self.totals.cases
    }

    /// Cases that did not match, in report order.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.cases.iter().filter(|c| !c.verdict.is_match())
    }

    /// Match rate in percent, `0.0` for an empty run.
    pub fn match_rate(&self) -> f64 {
        if self.totals.cases == 0 {
            return 0.0;
        }
        self.totals.matches as f64 * 100.0 / self.totals.cases as f64
    }
}

/// Aggregate per-case outcomes into a [`Summary`].
///
/// Orders cases by numeric id and tallies verdicts and extraction counts.
/// Never fails.
///
/// # Examples
///
/// ```
/// use geoaudit_core::{report, verify_case, ExpectedSpec, VerifyOptions};
///
/// let options = VerifyOptions::default();
/// let outcomes = vec![
///     verify_case(&ExpectedSpec::new(9, "q", "u"), "", None, &options),
///     verify_case(&ExpectedSpec::new(3, "q", "u"), "", None, &options),
/// ];
///
/// let summary = report(outcomes);
/// assert_eq!(summary.cases[0].id, "3");
/// assert_eq!(summary.totals.not_found, 2);
/// assert_eq!(summary.totals.not_found_or_no_calls, 2);
/// ```
pub fn report(mut outcomes: Vec<CaseOutcome>) -> Summary {
    outcomes.sort_by_key(|o| o.number);

    let mut totals = Totals::default();
    let mut stats = ScanStats::default();
    for outcome in &outcomes {
        totals.record(outcome.verdict);
        if outcome.window.is_some() {
            stats.questions_found += 1;
        }
        stats.actions_found += outcome.actions_found;
        stats.urls_found += outcome.urls_found;
        stats.skipped_payloads += outcome.skipped_payloads;
    }

    Summary {
        cases: outcomes,
        totals,
        stats,
    }
}
