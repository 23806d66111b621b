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

//! Property-based tests for segmentation, request building and comparison.
//!
//! - Segmentation coverage: in-order transcripts are tiled by their windows
//! - Non-empty windows never overlap, whatever order the markers appear in
//! - Builder determinism
//! - Normalization idempotence
//! - Containment monotonicity and key-agnosticism of comparison

use geoaudit_core::{
    build_request, compare, normalize, segment, ActionPayload, BuildOptions, NormalizeOptions,
    Verdict,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ===== Generators =====

/// Filler text that can never contain a marker.
fn filler() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z .,\n{}\"]{0,40}").expect("Failed to create filler regex")
}

/// Request-like strings over the characters real requests use.
fn request() -> impl Strategy<Value = String> {
    (
        prop::string::string_regex("[0-9]{4}").expect("year regex"),
        prop::string::string_regex("[a-z]{2,4}/[a-z0-9]{2,4}").expect("dataset regex"),
        prop::string::string_regex("[A-Z0-9_]{1,12}(,[A-Z0-9_]{1,12}){0,3}").expect("get regex"),
        prop::string::string_regex("[a-z]{2,6}:[0-9*]{1,3}").expect("for regex"),
        prop::option::of(
            prop::string::string_regex("[a-z]{2,6}:[0-9]{2}( [a-z]{2,6}:[0-9]{3})?")
                .expect("in regex"),
        ),
    )
        .prop_map(|(year, dataset, get, geo_for, geo_in)| {
            let mut url = format!(
                "https://api.example.org/data/{}/{}?get={}&for={}",
                year, dataset, get, geo_for
            );
            if let Some(geo_in) = geo_in {
                url.push_str("&in=");
                url.push_str(&geo_in);
            }
            url
        })
}

fn payload_json() -> impl Strategy<Value = String> {
    (
        prop::string::string_regex("[a-z]{2,4}/[a-z0-9]{2,4}").expect("dataset regex"),
        2000u32..2030,
        prop::collection::vec(
            prop::string::string_regex("[A-Z0-9_]{1,12}").expect("variable regex"),
            0..5,
        ),
        prop::collection::vec(
            (
                prop::string::string_regex("[a-z]{2,6}").expect("geo type regex"),
                prop::string::string_regex("[0-9*]{1,3}").expect("geo code regex"),
            ),
            0..4,
        ),
    )
        .prop_map(|(dataset, year, variables, geo_in)| {
            let variables: Vec<String> = variables.iter().map(|v| format!("\"{}\"", v)).collect();
            let geo_in: Vec<String> = geo_in
                .iter()
                .map(|(t, c)| format!("\"{}\": \"{}\"", t, c))
                .collect();
            format!(
                "{{\"dataset\": \"{}\", \"year\": {}, \"variables\": [{}], \"geo_for\": {{\"county\": \"*\"}}, \"geo_in\": {{{}}}}}",
                dataset,
                year,
                variables.join(", "),
                geo_in.join(", ")
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    // ===== Segmentation =====

    #[test]
    fn prop_in_order_windows_tile_transcript(
        sections in prop::collection::vec((1u64..4, filler()), 1..12),
        extra_expected in prop::collection::btree_set(1u64..200, 0..6),
        prefix in filler(),
    ) {
        // Strictly increasing ids in order of appearance.
        let mut transcript = prefix;
        let mut id = 0u64;
        let mut present = Vec::new();
        for (step, text) in &sections {
            id += step;
            present.push(id);
            transcript.push_str(&format!("Q{}: {}", id, text));
        }

        let expected: BTreeSet<u64> = present.iter().copied().chain(extra_expected).collect();
        let seg = segment(&transcript, expected.iter().copied());
        let windows: Vec<_> = seg.iter().copied().collect();

        prop_assert_eq!(windows.len(), present.len());
        prop_assert_eq!(windows.last().map(|w| w.end), Some(transcript.len()));
        for pair in windows.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        for window in &windows {
            let marker = format!("Q{}:", window.number);
            prop_assert!(window.slice(&transcript).starts_with(&marker));
        }
    }

    #[test]
    fn prop_windows_never_overlap(
        ids in prop::collection::vec(1u64..30, 1..20),
        texts in prop::collection::vec(filler(), 20),
    ) {
        let mut transcript = String::new();
        for (id, text) in ids.iter().zip(texts.iter()) {
            transcript.push_str(&format!("Q{}: {}", id, text));
        }

        let seg = segment(&transcript, 1..30);
        let mut windows: Vec<_> = seg.iter().copied().collect();
        for window in &windows {
            prop_assert!(window.start <= window.end);
            prop_assert!(window.end <= transcript.len());
        }
        // Clamped windows are empty and may sit inside another window.
        windows.retain(|w| !w.is_empty());
        windows.sort_by_key(|w| w.start);
        for pair in windows.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }

    // ===== Builder =====

    #[test]
    fn prop_builder_is_deterministic(json in payload_json()) {
        let payload = ActionPayload::from_json(&json).expect("generated payload decodes");
        let again = ActionPayload::from_json(&json).expect("generated payload decodes");
        let options = BuildOptions::default();
        prop_assert_eq!(build_request(&payload, &options), build_request(&again, &options));
    }

    #[test]
    fn prop_built_request_compares_to_itself(json in payload_json()) {
        let payload = ActionPayload::from_json(&json).expect("generated payload decodes");
        let url = build_request(&payload, &BuildOptions::default());
        prop_assert_eq!(compare(&url, Some(&url), &NormalizeOptions::default()), Verdict::Match);
    }

    // ===== Normalization =====

    #[test]
    fn prop_normalize_is_idempotent(raw in "[ -~]{0,80}", sort in any::<bool>()) {
        let options = NormalizeOptions { sort_params: sort, ..Default::default() };
        let once = normalize(&raw, &options);
        prop_assert_eq!(normalize(&once, &options), once);
    }

    #[test]
    fn prop_normalize_is_idempotent_on_requests(url in request()) {
        let options = NormalizeOptions::default();
        let once = normalize(&url, &options);
        prop_assert_eq!(normalize(&once, &options), once);
    }

    // ===== Comparison =====

    #[test]
    fn prop_extra_trailing_params_still_match(
        expected in request(),
        extras in prop::collection::vec(("[a-z]{1,8}", "[a-z0-9:*]{0,8}"), 1..4),
    ) {
        let mut actual = expected.clone();
        for (k, v) in &extras {
            actual.push_str(&format!("&{}={}", k, v));
        }
        prop_assert_eq!(
            compare(&expected, Some(&actual), &NormalizeOptions::default()),
            Verdict::Match
        );
    }

    #[test]
    fn prop_key_value_is_ignored(
        base in request(),
        k1 in "[A-Za-z0-9]{0,16}",
        k2 in "[A-Za-z0-9]{0,16}",
    ) {
        let options = NormalizeOptions::default();
        prop_assert_eq!(
            normalize(&format!("{}&key={}", base, k1), &options),
            normalize(&format!("{}&key={}", base, k2), &options)
        );
        prop_assert_eq!(
            normalize(&format!("{}&key={}", base, k1), &options),
            normalize(&base, &options)
        );
    }

    #[test]
    fn prop_missing_call_is_never_a_match(expected in request()) {
        prop_assert_eq!(compare(&expected, None, &NormalizeOptions::default()), Verdict::NoCalls);
    }
}
