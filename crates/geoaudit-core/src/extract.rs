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

//! Action and response-URL extraction within one transcript window.
//!
//! Two kinds of signal are recovered, both in document order:
//!
//! - **Actions**: the action tag followed by a brace block, with only
//!   whitespace and at most one short `Label:` in between (as in
//!   `Action Input:`). The block is delimited with [`find_block_end`] and
//!   decoded into an [`ActionPayload`]. Blocks that fail to decode, or that
//!   name neither a dataset nor a year, are recorded as skipped.
//! - **Response URLs**: `"url": "<value>"` fields anywhere in the window,
//!   JSON-unescaped.
//!
//! # Examples
//!
//! ```
//! use geoaudit_core::{extract, segment, ExtractOptions};
//!
//! let transcript = r#"Q1: population of New York
//! Action: census_api_call
//! Action Input: {"dataset": "acs/acs1", "year": "2022", "variables": ["B01003_001E"], "geo_for": {"state": "36"}}
//! Observation: {"url": "https://api.census.gov/data/2022/acs/acs1?get=B01003_001E&for=state:36"}
//! "#;
//!
//! let seg = segment(transcript, [1]);
//! let window = seg.get(1).unwrap();
//! let found = extract(transcript, window, &ExtractOptions::default());
//!
//! assert_eq!(found.actions.len(), 1);
//! assert_eq!(found.urls.len(), 1);
//! assert!(found.skipped.is_empty());
//! ```

use crate::build::{build_request, BuildOptions};
use crate::error::PayloadError;
use crate::payload::ActionPayload;
use crate::scan::find_block_end;
use crate::types::{CandidateRequest, Provenance, TranscriptWindow};
use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Default action tag emitted by the assistant before a request payload.
pub const DEFAULT_ACTION_TAG: &str = "census_api_call";

/// Default number of bytes allowed between the action tag and its `{`.
pub const DEFAULT_MAX_GAP: usize = 256;

/// Default maximum brace nesting inside one payload.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What may sit between the action tag and its opening brace.
fn payload_gap_regex() -> &'static BytesRegex {
    static PAYLOAD_GAP: OnceLock<BytesRegex> = OnceLock::new();
    PAYLOAD_GAP.get_or_init(|| {
        BytesRegex::new(r"\A\s*(?:[A-Za-z][A-Za-z0-9 _-]{0,47}:\s*)?\{")
            .expect("payload gap pattern is valid")
    })
}

fn url_field_regex() -> &'static Regex {
    static URL_FIELD: OnceLock<Regex> = OnceLock::new();
    URL_FIELD.get_or_init(|| {
        Regex::new(r#""url"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("url field pattern is valid")
    })
}

/// Configuration for window extraction.
///
/// # Examples
///
/// ```
/// use geoaudit_core::ExtractOptions;
///
/// let options = ExtractOptions {
///     action_tag: "acs_query".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(options.max_gap, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Literal tag that introduces an action record.
    pub action_tag: String,
    /// Maximum bytes between the end of the tag and the opening brace.
    /// Only whitespace and one `Label:` may fill the gap.
    pub max_gap: usize,
    /// Maximum brace nesting accepted inside a payload.
    pub max_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            action_tag: DEFAULT_ACTION_TAG.to_string(),
            max_gap: DEFAULT_MAX_GAP,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A decoded action found in the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    /// Byte offset of the action tag.
    pub offset: usize,
    /// Byte range of the brace block.
    pub block: (usize, usize),
    pub payload: ActionPayload,
}

/// A `"url"` response field found in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseUrl {
    /// Byte offset of the `"url"` key.
    pub offset: usize,
    pub url: String,
}

/// An action block that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPayload {
    /// Byte offset of the action tag.
    pub offset: usize,
    pub error: PayloadError,
}

/// Everything recovered from one window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub actions: Vec<ActionRecord>,
    pub urls: Vec<ResponseUrl>,
    pub skipped: Vec<SkippedPayload>,
}

impl Extraction {
    /// All candidate requests in ascending transcript order.
    ///
    /// Actions are rebuilt with [`build_request`]; response URLs are taken
    /// verbatim.
    pub fn candidates(&self, options: &BuildOptions) -> Vec<CandidateRequest> {
        let mut candidates: Vec<CandidateRequest> = self
            .actions
            .iter()
            .map(|action| action_candidate(action, options))
            .chain(self.urls.iter().map(url_candidate))
            .collect();
        candidates.sort_by_key(|c| c.offset);
        candidates
    }

    /// The authoritative candidate: the last one in document order.
    pub fn final_candidate(&self, options: &BuildOptions) -> Option<CandidateRequest> {
        let last_action = self.actions.last();
        let last_url = self.urls.last();
        match (last_action, last_url) {
            (Some(a), Some(u)) if u.offset > a.offset => Some(url_candidate(u)),
            (Some(a), _) => Some(action_candidate(a, options)),
            (None, Some(u)) => Some(url_candidate(u)),
            (None, None) => None,
        }
    }

    /// Whether the window yielded no usable signal at all.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.urls.is_empty()
    }
}

fn action_candidate(action: &ActionRecord, options: &BuildOptions) -> CandidateRequest {
    CandidateRequest {
        request: build_request(&action.payload, options),
        provenance: Provenance::FromAction,
        offset: action.offset,
    }
}

fn url_candidate(url: &ResponseUrl) -> CandidateRequest {
    CandidateRequest {
        request: url.url.clone(),
        provenance: Provenance::FromResponseField,
        offset: url.offset,
    }
}

/// Extract actions and response URLs from one window.
///
/// Only signal that starts inside `[window.start, window.end)` is returned,
/// and brace blocks may not run past the window end. Never fails: blocks
/// that cannot be decoded land in [`Extraction::skipped`].
pub fn extract(transcript: &str, window: &TranscriptWindow, options: &ExtractOptions) -> Extraction {
    let mut skipped = Vec::new();
    let actions = extract_actions(transcript, window, options, &mut skipped);
    let extraction = Extraction {
        actions,
        urls: extract_urls(transcript, window),
        skipped,
    };

    debug!(
        "Case {}: {} actions, {} urls, {} skipped in {} bytes",
        window.number,
        extraction.actions.len(),
        extraction.urls.len(),
        extraction.skipped.len(),
        window.len()
    );
    extraction
}

fn extract_actions(
    transcript: &str,
    window: &TranscriptWindow,
    options: &ExtractOptions,
    skipped: &mut Vec<SkippedPayload>,
) -> Vec<ActionRecord> {
    let mut actions = Vec::new();
    if options.action_tag.is_empty() {
        return actions;
    }

    let bytes = transcript.as_bytes();
    let text = window.slice(transcript);
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find(options.action_tag.as_str()) {
        let tag_offset = window.start + cursor + rel;
        let tag_end = tag_offset + options.action_tag.len();
        let gap_limit = tag_end.saturating_add(options.max_gap).min(window.end);

        let Some(open) = payload_open(bytes, tag_end, gap_limit) else {
            // A bare mention of the tag, not an action record.
            cursor = tag_end - window.start;
            continue;
        };

        let decoded = find_block_end(bytes, open, window.end, options.max_depth).and_then(|close| {
            let payload = ActionPayload::from_json(&transcript[open..close])?;
            if payload.dataset.is_none() && payload.year.is_none() {
                return Err(PayloadError::MissingFields);
            }
            Ok((close, payload))
        });

        match decoded {
            Ok((close, payload)) => {
                actions.push(ActionRecord {
                    offset: tag_offset,
                    block: (open, close),
                    payload,
                });
                cursor = close - window.start;
            }
            Err(error) => {
                warn!("Case {}: skipping action at byte {}: {}", window.number, tag_offset, error);
                skipped.push(SkippedPayload {
                    offset: tag_offset,
                    error,
                });
                cursor = tag_end - window.start;
            }
        }
    }

    actions
}

/// Offset of the `{` that opens the payload for a tag ending at `tag_end`.
fn payload_open(bytes: &[u8], tag_end: usize, gap_limit: usize) -> Option<usize> {
    if gap_limit <= tag_end {
        return None;
    }
    payload_gap_regex()
        .find(&bytes[tag_end..gap_limit])
        .map(|m| tag_end + m.end() - 1)
}

fn extract_urls(transcript: &str, window: &TranscriptWindow) -> Vec<ResponseUrl> {
    url_field_regex()
        .captures_iter(window.slice(transcript))
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let raw = caps.get(1)?.as_str();
            let url = unescape_json_string(raw)?;
            if url.trim().is_empty() {
                return None;
            }
            Some(ResponseUrl {
                offset: window.start + whole.start(),
                url,
            })
        })
        .collect()
}

/// Decode JSON string escapes (`\/`, `\u0026`, ...). Invalid escapes yield
/// `None` and the field is ignored.
fn unescape_json_string(raw: &str) -> Option<String> {
    if !raw.contains('\\') {
        return Some(raw.to_string());
    }
    serde_json::from_str::<String>(&format!("\"{}\"", raw)).ok()
}
