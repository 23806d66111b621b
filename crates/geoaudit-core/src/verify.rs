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

//! The per-case verification pipeline.
//!
//! Segmentation runs once per transcript. Each expected case then goes
//! through extract, build and compare independently of every other case,
//! which is what lets [`verify_parallel`] fan the cases out to a worker pool
//! and still produce the same [`Summary`] as [`verify`].

use crate::build::BuildOptions;
use crate::extract::{extract, ExtractOptions};
use crate::normalize::{compare, NormalizeOptions};
use crate::report::{report, Summary};
use crate::segment::{segment, Segmentation};
use crate::types::{CandidateRequest, ExpectedSpec, SpecSet, TranscriptWindow, Verdict};
use serde::Serialize;
use tracing::debug;

/// Options for a full verification run.
///
/// # Examples
///
/// ```
/// use geoaudit_core::{NormalizeOptions, VerifyOptions};
///
/// let options = VerifyOptions {
///     normalize: NormalizeOptions {
///         sort_params: true,
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// assert_eq!(options.extract.action_tag, "census_api_call");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    pub extract: ExtractOptions,
    pub build: BuildOptions,
    pub normalize: NormalizeOptions,
}

/// Result of verifying one expected case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOutcome {
    pub id: String,
    #[serde(skip)]
    pub number: u64,
    pub question: String,
    pub expected: String,
    /// The authoritative request recovered from the case window, if any.
    pub actual: Option<CandidateRequest>,
    pub verdict: Verdict,
    /// `None` when the case marker never appears.
    pub window: Option<TranscriptWindow>,
    pub actions_found: usize,
    pub urls_found: usize,
    pub skipped_payloads: usize,
}

impl CaseOutcome {
    /// The actual request string, if one was recovered.
    pub fn actual_request(&self) -> Option<&str> {
        self.actual.as_ref().map(|c| c.request.as_str())
    }
}

/// Verify one case against its window.
///
/// A missing window yields [`Verdict::NotFound`]; a window without any
/// usable signal yields [`Verdict::NoCalls`].
pub fn verify_case(
    spec: &ExpectedSpec,
    transcript: &str,
    window: Option<&TranscriptWindow>,
    options: &VerifyOptions,
) -> CaseOutcome {
    let mut outcome = CaseOutcome {
        id: spec.id.clone(),
        number: spec.number,
        question: spec.question.clone(),
        expected: spec.expected_request.clone(),
        actual: None,
        verdict: Verdict::NotFound,
        window: window.copied(),
        actions_found: 0,
        urls_found: 0,
        skipped_payloads: 0,
    };

    let Some(window) = window else {
        debug!("Case {}: marker not found", spec.id);
        return outcome;
    };

    let extraction = extract(transcript, window, &options.extract);
    outcome.actions_found = extraction.actions.len();
    outcome.urls_found = extraction.urls.len();
    outcome.skipped_payloads = extraction.skipped.len();
    outcome.actual = extraction.final_candidate(&options.build);
    outcome.verdict = compare(
        &spec.expected_request,
        outcome.actual_request(),
        &options.normalize,
    );

    debug!("Case {}: {}", spec.id, outcome.verdict);
    outcome
}

fn segment_specs(specs: &SpecSet, transcript: &str) -> Segmentation {
    segment(transcript, specs.numbers())
}

/// Verify every expected case against one transcript.
///
/// Every spec appears in the summary exactly once, ordered by numeric id.
///
/// # Examples
///
/// ```
/// use geoaudit_core::{verify, ExpectedSpec, SpecSet, Verdict, VerifyOptions};
///
/// let specs = SpecSet::from_specs(vec![
///     ExpectedSpec::new(
///         1,
///         "Population of New York",
///         "https://api.census.gov/data/2022/acs/acs1?get=B01003_001E&for=state:36&key=K",
///     ),
///     ExpectedSpec::new(2, "Never asked", "https://api.census.gov/data/2020/dec/pl?get=P1_001N&for=us:1"),
/// ])
/// .unwrap();
///
/// let transcript = r#"Q1: Population of New York
/// Action: census_api_call
/// Action Input: {"dataset": "acs/acs1", "year": "2022", "variables": ["B01003_001E"], "geo_for": {"state": "36"}}
/// "#;
///
/// let summary = verify(&specs, transcript, &VerifyOptions::default());
/// assert_eq!(summary.cases[0].verdict, Verdict::Match);
/// assert_eq!(summary.cases[1].verdict, Verdict::NotFound);
/// assert_eq!(summary.totals.matches, 1);
/// ```
pub fn verify(specs: &SpecSet, transcript: &str, options: &VerifyOptions) -> Summary {
    let segmentation = segment_specs(specs, transcript);
    let outcomes = specs
        .iter()
        .map(|spec| verify_case(spec, transcript, segmentation.get(spec.number), options))
        .collect();
    report(outcomes)
}

/// Parallel variant of [`verify`]; the per-case stage runs on the rayon
/// pool. Produces a summary identical to [`verify`].
#[cfg(feature = "parallel")]
pub fn verify_parallel(specs: &SpecSet, transcript: &str, options: &VerifyOptions) -> Summary {
    use rayon::prelude::*;

    let segmentation = segment_specs(specs, transcript);
    let outcomes = specs
        .as_slice()
        .par_iter()
        .map(|spec| verify_case(spec, transcript, segmentation.get(spec.number), options))
        .collect();
    report(outcomes)
}
