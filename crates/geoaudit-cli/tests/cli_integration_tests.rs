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

//! End-to-end tests for the geoaudit binary

use assert_cmd::Command;
use geoaudit_test::fixtures::builders::{PayloadBuilder, SpecTableBuilder, TranscriptBuilder};
use geoaudit_test::fixtures::{self, errors, Fixture};
use geoaudit_test::EXAMPLE_API_ROOT;
use predicates::prelude::*;
use std::fs;
use tempfile::NamedTempFile;

fn geoaudit_cmd() -> Command {
    let mut cmd = Command::cargo_bin("geoaudit").expect("Failed to find geoaudit binary");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn create_temp_file(content: &str, suffix: &str) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    fs::write(file.path(), content).expect("Failed to write temp file");
    file
}

/// Spec table and transcript files for a fixture.
fn fixture_files(fixture: &Fixture) -> (NamedTempFile, NamedTempFile) {
    (
        create_temp_file(&fixture.specs_csv(), ".csv"),
        create_temp_file(&fixture.transcript, ".log"),
    )
}

fn verify_cmd(specs: &NamedTempFile, transcript: &NamedTempFile) -> Command {
    let mut cmd = geoaudit_cmd();
    cmd.arg("verify")
        .arg(specs.path())
        .arg(transcript.path())
        .args(["--api-root", EXAMPLE_API_ROOT]);
    cmd
}

// ===== Help =====

#[test]
fn test_help_output() {
    geoaudit_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("transcript query verification"))
        .stdout(predicate::str::contains("batch-verify"));
}

#[test]
fn test_no_subcommand_fails() {
    geoaudit_cmd().assert().failure();
}

// ===== Verify =====

#[test]
fn test_verify_text_report() {
    let (specs, transcript) = fixture_files(&fixtures::full_run());

    verify_cmd(&specs, &transcript)
        .assert()
        .success()
        .stdout(predicate::str::contains("Questions found: 4 of 5"))
        .stdout(predicate::str::contains("✓ MATCH Q1"))
        .stdout(predicate::str::contains("✗ MISMATCH Q9"))
        .stdout(predicate::str::contains("∅ NO_CALLS Q10"))
        .stdout(predicate::str::contains("? NOT_FOUND Q12"))
        .stdout(predicate::str::contains(
            "Totals: 5 cases, 2 match, 1 mismatch, 1 no calls, 1 not found",
        ));
}

#[test]
fn test_verify_json_report() {
    let (specs, transcript) = fixture_files(&fixtures::full_run());

    let output = verify_cmd(&specs, &transcript)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["totals"]["cases"], 5);
    assert_eq!(json["totals"]["matches"], 2);
    assert_eq!(json["totals"]["not_found_or_no_calls"], 2);
    assert_eq!(json["stats"]["urls_found"], 1);
    let verdicts: Vec<_> = json["cases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["verdict"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(verdicts, ["MATCH", "MATCH", "MISMATCH", "NO_CALLS", "NOT_FOUND"]);
    assert_eq!(json["cases"][1]["actual"]["provenance"], "from_response_field");
}

#[test]
fn test_verify_parallel_json_identical() {
    let (specs, transcript) = fixture_files(&fixtures::full_run());

    let sequential = verify_cmd(&specs, &transcript)
        .args(["--format", "json"])
        .output()
        .unwrap();
    let parallel = verify_cmd(&specs, &transcript)
        .args(["--format", "json", "--parallel"])
        .output()
        .unwrap();
    assert_eq!(sequential.stdout, parallel.stdout);
}

#[test]
fn test_verify_csv_to_file() {
    let (specs, transcript) = fixture_files(&fixtures::full_run());
    let out = NamedTempFile::new().unwrap();

    verify_cmd(&specs, &transcript)
        .args(["--format", "csv", "--output"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let csv = fs::read_to_string(out.path()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("id,question,verdict,expected,actual,provenance"));
    assert!(lines[4].starts_with("10,Counties in Ohio,NO_CALLS,"));
}

#[test]
fn test_verify_unknown_format() {
    let (specs, transcript) = fixture_files(&fixtures::state_population());

    verify_cmd(&specs, &transcript)
        .args(["--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format 'xml'"));
}

#[test]
fn test_fail_on_mismatch() {
    let (specs, transcript) = fixture_files(&fixtures::full_run());

    verify_cmd(&specs, &transcript)
        .arg("--fail-on-mismatch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("3 of 5 cases did not match"));
}

#[test]
fn test_fail_on_mismatch_passes_when_all_match() {
    let (specs, transcript) = fixture_files(&fixtures::state_population());

    verify_cmd(&specs, &transcript)
        .arg("--fail-on-mismatch")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ MATCH Q1"));
}

#[test]
fn test_key_param_flag() {
    // The expected request carries key=XYZ; with a different key name it is
    // no longer stripped and the rebuilt request cannot contain it.
    let (specs, transcript) = fixture_files(&fixtures::state_population());

    verify_cmd(&specs, &transcript)
        .args(["--key-param", "token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✗ MISMATCH Q1"));
}

#[test]
fn test_action_tag_flag() {
    let transcript = TranscriptBuilder::new()
        .action_tag("acs_query")
        .question(1, "Population of Ohio")
        .action(
            &PayloadBuilder::new("acs/acs1", "2022")
                .variable("B01003_001E")
                .geo_for("state", "39")
                .to_json(),
        )
        .build();
    let specs = SpecTableBuilder::new()
        .row(
            "1",
            "Population of Ohio",
            &format!("{}/2022/acs/acs1?get=B01003_001E&for=state:39", EXAMPLE_API_ROOT),
        )
        .build();
    let specs = create_temp_file(&specs, ".csv");
    let transcript = create_temp_file(&transcript, ".log");

    verify_cmd(&specs, &transcript)
        .assert()
        .success()
        .stdout(predicate::str::contains("∅ NO_CALLS Q1"));

    verify_cmd(&specs, &transcript)
        .args(["--action-tag", "acs_query"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ MATCH Q1"));
}

#[test]
fn test_invalid_spec_tables_rejected() {
    let transcript = create_temp_file("Q1: nothing here\n", ".log");
    for (_name, table) in errors::invalid_spec_tables() {
        let specs = create_temp_file(&table, ".csv");
        verify_cmd(&specs, &transcript)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Spec error"))
            .stdout(predicate::str::is_empty());
    }
}

#[test]
fn test_missing_transcript() {
    let specs = create_temp_file(&fixtures::state_population().specs_csv(), ".csv");

    geoaudit_cmd()
        .arg("verify")
        .arg(specs.path())
        .arg("/nonexistent/geoaudit/run.log")
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_file_size_limit() {
    let (specs, transcript) = fixture_files(&fixtures::full_run());

    verify_cmd(&specs, &transcript)
        .env("GEOAUDIT_MAX_FILE_SIZE", "16")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is too large"));
}

// ===== Inspect =====

#[test]
fn test_inspect_all_cases() {
    let transcript = create_temp_file(&fixtures::full_run().transcript, ".log");

    geoaudit_cmd()
        .arg("inspect")
        .arg(transcript.path())
        .args(["--api-root", EXAMPLE_API_ROOT])
        .assert()
        .success()
        .stdout(predicate::str::contains("Case ids: 0, 1, 2, 9, 10"))
        .stdout(predicate::str::contains("final: no usable request"));
}

#[test]
fn test_inspect_single_case_shows_skipped_payload() {
    let transcript = create_temp_file(&fixtures::truncated_payload().transcript, ".log");

    geoaudit_cmd()
        .arg("inspect")
        .arg(transcript.path())
        .args(["--case", "3.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped @"))
        .stdout(predicate::str::contains("unterminated payload block"));
}

#[test]
fn test_inspect_bad_case_ids() {
    let transcript = create_temp_file(&fixtures::state_population().transcript, ".log");

    geoaudit_cmd()
        .arg("inspect")
        .arg(transcript.path())
        .args(["--case", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid case id 'abc'"));

    geoaudit_cmd()
        .arg("inspect")
        .arg(transcript.path())
        .args(["--case", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("case 42 does not appear"));
}

// ===== Batch =====

#[test]
fn test_batch_verify() {
    let fixture = fixtures::retried_actions();
    let specs = create_temp_file(&fixture.specs_csv(), ".csv");
    let runs: Vec<NamedTempFile> = (0..3)
        .map(|_| create_temp_file(&fixture.transcript, ".log"))
        .collect();

    geoaudit_cmd()
        .arg("batch-verify")
        .arg(specs.path())
        .args(runs.iter().map(|f| f.path()))
        .args(["--api-root", EXAMPLE_API_ROOT, "--parallel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch Summary"))
        .stdout(predicate::str::contains("3/6"))
        .stdout(predicate::str::contains("1/2 match, 1 mismatch").count(3));
}

#[test]
fn test_batch_verify_fail_on_mismatch() {
    let fixture = fixtures::retried_actions();
    let specs = create_temp_file(&fixture.specs_csv(), ".csv");
    let run = create_temp_file(&fixture.transcript, ".log");

    geoaudit_cmd()
        .arg("batch-verify")
        .arg(specs.path())
        .arg(run.path())
        .args(["--api-root", EXAMPLE_API_ROOT, "--fail-on-mismatch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 cases did not match"));
}

#[test]
fn test_batch_verify_with_missing_transcript() {
    let fixture = fixtures::state_population();
    let specs = create_temp_file(&fixture.specs_csv(), ".csv");
    let run = create_temp_file(&fixture.transcript, ".log");

    geoaudit_cmd()
        .arg("batch-verify")
        .arg(specs.path())
        .arg(run.path())
        .arg("/nonexistent/geoaudit/run.log")
        .args(["--api-root", EXAMPLE_API_ROOT, "--jobs", "2"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("1/1 match"))
        .stderr(predicate::str::contains("1 of 2 transcripts could not be verified"));
}
