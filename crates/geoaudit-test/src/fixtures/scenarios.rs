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

//! Scenario fixtures: a transcript, its spec table and the verdicts a
//! correct audit produces.

use super::builders::{PayloadBuilder, TranscriptBuilder};
use super::{Fixture, EXAMPLE_API_ROOT};
use geoaudit_core::{ExpectedSpec, Verdict};

fn url(path_and_query: &str) -> String {
    format!("{}/{}", EXAMPLE_API_ROOT, path_and_query)
}

/// Single case whose action payload matches the expected request.
///
/// The expected request carries a key parameter the action never has.
pub fn state_population() -> Fixture {
    let transcript = TranscriptBuilder::new()
        .question(1, "What is the total population of New York state?")
        .thought("Total population is B01003_001E in the ACS 1-year.")
        .action(
            &PayloadBuilder::new("acs/acs1", "2022")
                .variable("B01003_001E")
                .geo_for("state", "36")
                .to_json(),
        )
        .response_url(&url("2022/acs/acs1?get=B01003_001E&for=state:36"))
        .build();

    Fixture {
        name: "state_population",
        transcript,
        specs: vec![ExpectedSpec::new(
            1,
            "What is the total population of New York state?",
            url("2022/acs/acs1?get=B01003_001E&for=state:36&key=XYZ"),
        )],
        verdicts: vec![(1, Verdict::Match)],
    }
}

/// Tract-level query with two containing filters.
pub fn tract_income() -> Fixture {
    let transcript = TranscriptBuilder::new()
        .question(2, "Median household income for every tract in Manhattan")
        .action(
            &PayloadBuilder::new("acs/acs5", "2020")
                .variable("NAME")
                .variable("B19013_001E")
                .geo_for("tract", "*")
                .geo_in("state", "36")
                .geo_in("county", "061")
                .to_json(),
        )
        .build();

    Fixture {
        name: "tract_income",
        transcript,
        specs: vec![ExpectedSpec::new(
            2,
            "Median household income for every tract in Manhattan",
            url("2020/acs/acs5?get=NAME,B19013_001E&for=tract:*&in=state:36 county:061&key=XYZ"),
        )],
        verdicts: vec![(2, Verdict::Match)],
    }
}

/// The expected case never appears in the transcript.
pub fn missing_case() -> Fixture {
    let transcript = TranscriptBuilder::new()
        .question(1, "Population of the United States")
        .action(
            &PayloadBuilder::new("dec/pl", "2020")
                .variable("P1_001N")
                .geo_for("us", "1")
                .to_json(),
        )
        .build();

    Fixture {
        name: "missing_case",
        transcript,
        specs: vec![
            ExpectedSpec::new(1, "Population of the United States", url("2020/dec/pl?get=P1_001N&for=us:1")),
            ExpectedSpec::new(7, "Housing units in Texas", url("2020/dec/pl?get=H1_001N&for=state:48")),
        ],
        verdicts: vec![(1, Verdict::Match), (7, Verdict::NotFound)],
    }
}

/// The only action in the window is cut off mid-payload.
pub fn truncated_payload() -> Fixture {
    let transcript = TranscriptBuilder::new()
        .question(3, "Poverty count for Cook County")
        .thought("Use the ACS 5-year poverty table.")
        .raw("Action: census_api_call\nAction Input: {\"dataset\": \"acs/acs5\", \"year\": \"2021\", \"geo_for\": {\"county\": \"031\"\n")
        .raw("Error: the run was interrupted\n")
        .build();

    Fixture {
        name: "truncated_payload",
        transcript,
        specs: vec![ExpectedSpec::new(
            3,
            "Poverty count for Cook County",
            url("2021/acs/acs5?get=B17001_002E&for=county:031&in=state:17"),
        )],
        verdicts: vec![(3, Verdict::NoCalls)],
    }
}

/// Two cases, each with a corrected retry. Only the later action counts.
pub fn retried_actions() -> Fixture {
    let wrong = PayloadBuilder::new("acs/acs1", "2022")
        .variable("B01001_001E")
        .geo_for("state", "06")
        .to_json();
    let right = PayloadBuilder::new("acs/acs1", "2022")
        .variable("B01003_001E")
        .geo_for("state", "06")
        .to_json();

    let transcript = TranscriptBuilder::new()
        .question(4, "Population of California")
        .action(&wrong)
        .thought("That variable is sex by age; retrying with the total.")
        .action(&right)
        .question(5, "Population of California, again")
        .action(&right)
        .thought("Switching tables.")
        .action(&wrong)
        .build();

    let expected = url("2022/acs/acs1?get=B01003_001E&for=state:06");
    Fixture {
        name: "retried_actions",
        transcript,
        specs: vec![
            ExpectedSpec::new(4, "Population of California", expected.clone()),
            ExpectedSpec::new(5, "Population of California, again", expected),
        ],
        verdicts: vec![(4, Verdict::Match), (5, Verdict::Mismatch)],
    }
}

/// A realistic multi-case run touching every verdict.
///
/// Includes a repeated marker, ids whose textual and numeric order differ,
/// a response URL without an action, and an unexpected id ahead of the first
/// expected one.
pub fn full_run() -> Fixture {
    let transcript = TranscriptBuilder::new()
        .raw("Session started.\n")
        .question(0, "Warm-up question outside the suite")
        .action(
            &PayloadBuilder::new("dec/pl", "2020")
                .variable("P1_001N")
                .geo_for("us", "1")
                .to_json(),
        )
        .question(1, "Population of New York")
        .action(
            &PayloadBuilder::new("acs/acs1", "2022")
                .variable("B01003_001E")
                .geo_for("state", "36")
                .extra("reason", serde_json::Value::String("total population".into()))
                .to_json(),
        )
        .question(2, "Median age in Texas")
        .thought("Recalling Q1: was about New York, not relevant.")
        .response_url(&url("2021/acs/acs1?get=B01002_001E&for=state:48"))
        .question(9, "Households in Maine")
        .action(
            &PayloadBuilder::new("acs/acs5", "2019")
                .variable("B11001_001E")
                .geo_for("state", "23")
                .to_json(),
        )
        .question(10, "Counties in Ohio")
        .thought("I do not have a tool for this.")
        .build();

    Fixture {
        name: "full_run",
        transcript,
        specs: vec![
            ExpectedSpec::new(1, "Population of New York", url("2022/acs/acs1?get=B01003_001E&for=state:36&key=K1")),
            ExpectedSpec::new(2, "Median age in Texas", url("2021/acs/acs1?get=B01002_001E&for=state:48")),
            ExpectedSpec::new(9, "Households in Maine", url("2020/acs/acs5?get=B11001_001E&for=state:23")),
            ExpectedSpec::new(10, "Counties in Ohio", url("2020/dec/pl?get=NAME&for=county:*&in=state:39")),
            ExpectedSpec::new(12, "Never asked", url("2020/dec/pl?get=P1_001N&for=us:1")),
        ],
        verdicts: vec![
            (1, Verdict::Match),
            (2, Verdict::Match),
            (9, Verdict::Mismatch),
            (10, Verdict::NoCalls),
            (12, Verdict::NotFound),
        ],
    }
}
