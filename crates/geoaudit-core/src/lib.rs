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

//! Offline verification of the queries an assistant issued during a test run.
//!
//! A run produces one long transcript in which every test case is announced
//! by a `Q<id>:` marker, followed by free-form reasoning, structured actions
//! and tool responses. Given a table of expected requests, this crate works
//! out which request each case actually issued and classifies it.
//!
//! # Pipeline
//!
//! 1. **Segment** ([`segment`]): split the transcript into one window per
//!    expected id.
//! 2. **Extract** ([`extract`]): find action payloads (via the balanced
//!    brace scanner [`find_block_end`]) and `"url"` response fields in a
//!    window.
//! 3. **Build** ([`build_request`]): rebuild a request URL from a payload.
//! 4. **Compare** ([`normalize`], [`compare`]): normalize both sides and
//!    decide a [`Verdict`].
//! 5. **Report** ([`report`]): aggregate outcomes into a [`Summary`].
//!
//! [`verify`] runs all five stages. Every function is pure over the buffers
//! it is given; nothing here performs I/O.
//!
//! # Examples
//!
//! ```
//! use geoaudit_core::{verify, ExpectedSpec, SpecSet, Verdict, VerifyOptions};
//!
//! let specs = SpecSet::from_specs(vec![ExpectedSpec::new(
//!     3,
//!     "Median income by tract in Manhattan",
//!     "https://api.census.gov/data/2020/acs/acs5?get=B19013_001E&for=tract:*&in=state:36 county:061",
//! )])
//! .unwrap();
//!
//! let transcript = r#"Q3: Median income by tract in Manhattan
//! Action: census_api_call
//! Action Input: {"dataset": "acs/acs5", "year": "2020", "variables": ["B19013_001E"],
//!                "geo_for": {"tract": "*"}, "geo_in": {"state": "36", "county": "061"}}
//! "#;
//!
//! let summary = verify(&specs, transcript, &VerifyOptions::default());
//! assert_eq!(summary.cases[0].verdict, Verdict::Match);
//! ```
//!
//! # Verdicts
//!
//! | Verdict | Meaning |
//! |---------|---------|
//! | `MATCH` | The normalized expected request is contained in the normalized actual one |
//! | `MISMATCH` | A request was recovered but differs |
//! | `NO_CALLS` | The marker appears but no usable request was recovered |
//! | `NOT_FOUND` | The marker never appears |

mod build;
mod error;
mod extract;
mod normalize;
mod payload;
mod report;
mod scan;
mod segment;
mod types;
mod verify;

pub use build::{build_request, BuildOptions, DEFAULT_API_ROOT};
pub use error::{DuplicateSpecId, PayloadError, Result};
pub use extract::{
    extract, ActionRecord, ExtractOptions, Extraction, ResponseUrl, SkippedPayload,
    DEFAULT_ACTION_TAG, DEFAULT_MAX_DEPTH, DEFAULT_MAX_GAP,
};
pub use normalize::{compare, normalize, NormalizeOptions, DEFAULT_KEY_PARAM};
pub use payload::ActionPayload;
pub use report::{report, ScanStats, Summary, Totals};
pub use scan::find_block_end;
pub use segment::{segment, segment_indexed, MarkerIndex, Segmentation};
pub use types::{
    normalize_id, CandidateRequest, ExpectedSpec, Provenance, SpecSet, TranscriptWindow, Verdict,
};
#[cfg(feature = "parallel")]
pub use verify::verify_parallel;
pub use verify::{verify, verify_case, CaseOutcome, VerifyOptions};
