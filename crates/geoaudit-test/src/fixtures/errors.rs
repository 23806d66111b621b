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

//! Error fixtures: malformed spec tables and payloads the extractor must
//! skip.

use super::builders::SpecTableBuilder;

/// Spec tables the loader must reject, as (name, csv_text).
pub fn invalid_spec_tables() -> Vec<(&'static str, String)> {
    vec![
        (
            "missing_request_column",
            SpecTableBuilder::new()
                .header(&["No", "Question friendly human"])
                .raw_row(&["1", "Population"])
                .build(),
        ),
        (
            "empty_request",
            SpecTableBuilder::new().row("1", "Population", "  ").build(),
        ),
        (
            "empty_id",
            SpecTableBuilder::new()
                .row("", "Population", "https://h/data/2022/acs/acs1?get=A&for=us:1")
                .build(),
        ),
        (
            "non_numeric_id",
            SpecTableBuilder::new()
                .row("Q1", "Population", "https://h/data/2022/acs/acs1?get=A&for=us:1")
                .build(),
        ),
        (
            "duplicate_id",
            SpecTableBuilder::new()
                .row("4", "Population", "https://h/data/2022/acs/acs1?get=A&for=us:1")
                .row("4.0", "Population again", "https://h/data/2022/acs/acs1?get=B&for=us:1")
                .build(),
        ),
    ]
}

/// Payload snippets that never decode into an action, as (name, text).
///
/// Each is meant to follow an action tag inside a window.
pub fn invalid_payloads() -> Vec<(&'static str, &'static str)> {
    vec![
        ("truncated", r#"{"dataset": "acs/acs1", "geo_for": {"state": "36""#),
        ("trailing_comma", r#"{"dataset": "acs/acs1",}"#),
        ("single_quotes", r#"{'dataset': 'acs/acs1'}"#),
        ("wrong_geo_shape", r#"{"dataset": "acs/acs1", "geo_for": ["state", "36"]}"#),
        ("float_year", r#"{"dataset": "acs/acs1", "year": 2022.5}"#),
        ("boolean_variables", r#"{"variables": true}"#),
    ]
}
