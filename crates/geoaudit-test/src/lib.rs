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

//! Shared test fixtures for the geoaudit crates.
//!
//! Provides scenario transcripts with known verdicts, malformed inputs for
//! error-path tests, and builders for custom transcripts and spec tables.
//!
//! # Quick Start
//!
//! ```rust
//! use geoaudit_core::verify;
//! use geoaudit_test::fixtures;
//!
//! let fixture = fixtures::full_run();
//! let summary = verify(&fixture.spec_set(), &fixture.transcript, &fixture.options());
//!
//! for case in &summary.cases {
//!     assert_eq!(Some(case.verdict), fixture.verdict(case.number));
//! }
//! ```

/// Type alias for a list of fixture functions (name, generator).
pub type FixtureList = Vec<(&'static str, fn() -> fixtures::Fixture)>;

/// Canonical transcripts, spec tables and builders.
pub mod fixtures;

pub use fixtures::{Fixture, EXAMPLE_API_ROOT};

/// A synthetic transcript with `cases` questions, each followed by a noisy
/// reasoning line and one action. Sized for benchmarks and scaling tests.
pub fn synthetic_transcript(cases: u64) -> String {
    use fixtures::builders::{PayloadBuilder, TranscriptBuilder};

    let mut builder = TranscriptBuilder::new();
    for n in 1..=cases {
        let state = format!("{:02}", n % 56);
        builder = builder
            .question(n, "How many people live here?")
            .thought("Considering {\"braces\": \"in prose\"} and the word census_api_call in passing.")
            .action(
                &PayloadBuilder::new("acs/acs5", "2021")
                    .variable("NAME")
                    .variable("B01003_001E")
                    .geo_for("county", "*")
                    .geo_in("state", state)
                    .to_json(),
            );
    }
    builder.build()
}
