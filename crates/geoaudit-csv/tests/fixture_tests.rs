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

//! Loader and writer tests over the shared fixtures.

use geoaudit_core::verify;
use geoaudit_csv::{load_specs, load_specs_reader, write_verdicts, LoadConfig, SpecError};
use geoaudit_test::fixtures::{self, errors};

#[test]
fn test_fixture_tables_round_trip_through_loader() {
    for (name, fixture_fn) in fixtures::all() {
        let fixture = fixture_fn();
        let specs = load_specs(&fixture.specs_csv()).unwrap_or_else(|e| panic!("{}: {}", name, e));
        assert_eq!(specs.len(), fixture.specs.len(), "{}", name);
        for (loaded, original) in specs.iter().zip(fixture.specs.iter()) {
            assert_eq!(loaded, original, "{}", name);
        }
    }
}

#[test]
fn test_invalid_tables_are_rejected() {
    for (name, csv) in errors::invalid_spec_tables() {
        let err = load_specs(&csv).expect_err(name);
        let expected = match name {
            "missing_request_column" => matches!(err, SpecError::MissingColumn(_)),
            "empty_request" | "empty_id" => matches!(err, SpecError::MalformedSpec { .. }),
            "non_numeric_id" => matches!(err, SpecError::InvalidId { .. }),
            "duplicate_id" => matches!(err, SpecError::DuplicateId { first_row: 1, row: 2, .. }),
            other => panic!("unknown fixture {}", other),
        };
        assert!(expected, "{}: unexpected {:?}", name, err);
    }
}

#[test]
fn test_loading_from_reader() {
    let fixture = fixtures::full_run();
    let csv = fixture.specs_csv();
    let specs = load_specs_reader(csv.as_bytes(), &LoadConfig::default()).unwrap();
    assert_eq!(specs.numbers().collect::<Vec<_>>(), vec![1, 2, 9, 10, 12]);
}

#[test]
fn test_full_run_verdict_table() {
    let fixture = fixtures::full_run();
    let specs = load_specs(&fixture.specs_csv()).unwrap();
    let summary = verify(&specs, &fixture.transcript, &fixture.options());
    let csv = write_verdicts(&summary).unwrap();

    let verdicts: Vec<&str> = csv
        .lines()
        .skip(1)
        .map(|line| line.split(',').nth(2).unwrap_or(""))
        .collect();
    assert_eq!(verdicts, vec!["MATCH", "MATCH", "MISMATCH", "NO_CALLS", "NOT_FOUND"]);
}
