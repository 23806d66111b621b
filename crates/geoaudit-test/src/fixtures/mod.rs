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

//! Canonical transcripts and spec tables.
//!
//! - **scenarios**: transcripts paired with the verdicts they must produce
//! - **errors**: malformed spec tables and payload snippets
//! - **builders**: fluent builders for custom transcripts and tables

pub mod builders;
pub mod errors;
mod scenarios;

pub use scenarios::*;

use crate::FixtureList;
use builders::SpecTableBuilder;
use geoaudit_core::{BuildOptions, ExpectedSpec, SpecSet, Verdict, VerifyOptions};

/// API root used by every fixture.
pub const EXAMPLE_API_ROOT: &str = "https://api.example.org/data";

/// A transcript with its expected specs and the verdicts a correct audit
/// assigns.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub name: &'static str,
    pub transcript: String,
    pub specs: Vec<ExpectedSpec>,
    /// Expected verdict per numeric id, ascending.
    pub verdicts: Vec<(u64, Verdict)>,
}

impl Fixture {
    pub fn spec_set(&self) -> SpecSet {
        SpecSet::from_specs(self.specs.iter().cloned()).expect("fixture ids are distinct")
    }

    /// The specs as a CSV table with the standard header.
    pub fn specs_csv(&self) -> String {
        self.specs
            .iter()
            .fold(SpecTableBuilder::new(), |table, spec| {
                table.row(&spec.id, &spec.question, &spec.expected_request)
            })
            .build()
    }

    /// Verification options pointing at [`EXAMPLE_API_ROOT`].
    pub fn options(&self) -> VerifyOptions {
        VerifyOptions {
            build: BuildOptions {
                api_root: EXAMPLE_API_ROOT.to_string(),
            },
            ..Default::default()
        }
    }

    pub fn verdict(&self, number: u64) -> Option<Verdict> {
        self.verdicts
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, v)| *v)
    }
}

/// Returns all scenario fixtures for iteration.
pub fn all() -> FixtureList {
    vec![
        ("state_population", state_population),
        ("tract_income", tract_income),
        ("missing_case", missing_case),
        ("truncated_payload", truncated_payload),
        ("retried_actions", retried_actions),
        ("full_run", full_run),
    ]
}
