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

//! Transcript segmentation into per-case windows.
//!
//! A transcript is one long append-only log. Every test case announces
//! itself with a `Q<id>:` marker, but markers can repeat (retries, echoed
//! prompts, forward references), so segmentation works in two passes:
//!
//! 1. [`MarkerIndex::scan`] walks the transcript once and records every
//!    marker offset grouped by numeric id.
//! 2. [`segment_indexed`] turns the index into windows. A window starts at
//!    the earliest marker of its id and ends at the earliest start among
//!    the *numerically greater* ids, or at end-of-transcript.
//!
//! Numeric order, not appearance order, decides where a window ends.
//!
//! # Examples
//!
//! ```
//! use geoaudit_core::segment;
//!
//! let transcript = "Q1: first\nQ2: second\nQ1: retry of first\n";
//! let seg = segment(transcript, [1, 2]);
//!
//! let w1 = seg.get(1).unwrap();
//! assert_eq!(w1.slice(transcript), "Q1: first\n");
//!
//! let w2 = seg.get(2).unwrap();
//! assert_eq!(w2.end, transcript.len());
//! ```

use crate::types::TranscriptWindow;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;
use tracing::{debug, warn};

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"Q(\d+):").expect("marker pattern is valid"))
}

/// Every `Q<id>:` marker in a transcript, grouped by numeric id.
///
/// Built once per transcript and shared by every case lookup.
#[derive(Debug, Clone, Default)]
pub struct MarkerIndex {
    occurrences: BTreeMap<u64, Vec<usize>>,
    transcript_len: usize,
}

impl MarkerIndex {
    /// Scan the transcript for markers in a single pass.
    ///
    /// Markers whose digits overflow `u64` are ignored.
    pub fn scan(transcript: &str) -> Self {
        let mut occurrences: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
        for caps in marker_regex().captures_iter(transcript) {
            let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if let Ok(number) = digits.as_str().parse::<u64>() {
                occurrences.entry(number).or_default().push(whole.start());
            }
        }
        debug!(
            "Marker scan: {} distinct ids, {} markers, {} bytes",
            occurrences.len(),
            occurrences.values().map(Vec::len).sum::<usize>(),
            transcript.len()
        );
        Self {
            occurrences,
            transcript_len: transcript.len(),
        }
    }

    /// Earliest marker offset for an id.
    pub fn first_offset(&self, number: u64) -> Option<usize> {
        self.occurrences.get(&number).and_then(|o| o.first().copied())
    }

    /// All marker offsets for an id, ascending.
    pub fn offsets(&self, number: u64) -> &[usize] {
        self.occurrences.get(&number).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct ids seen in the transcript, ascending.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.occurrences.keys().copied()
    }

    pub fn marker_count(&self) -> usize {
        self.occurrences.values().map(Vec::len).sum()
    }

    pub fn transcript_len(&self) -> usize {
        self.transcript_len
    }
}

/// Windows for the ids that were both expected and present in the transcript.
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    windows: BTreeMap<u64, TranscriptWindow>,
}

impl Segmentation {
    pub fn get(&self, number: u64) -> Option<&TranscriptWindow> {
        self.windows.get(&number)
    }

    /// Windows in ascending numeric id order.
    pub fn iter(&self) -> impl Iterator<Item = &TranscriptWindow> {
        self.windows.values()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Segment a transcript for the given expected ids.
///
/// Convenience wrapper that scans markers and segments in one call. Use
/// [`MarkerIndex::scan`] with [`segment_indexed`] when the index is needed
/// for more than one segmentation.
pub fn segment<I>(transcript: &str, ids: I) -> Segmentation
where
    I: IntoIterator<Item = u64>,
{
    segment_indexed(&MarkerIndex::scan(transcript), ids)
}

/// Compute windows from a prebuilt marker index.
///
/// Only ids present in both `ids` and the index get a window. When a
/// greater id's first marker precedes this id's first marker, the window is
/// clamped to empty so windows never overlap.
pub fn segment_indexed<I>(index: &MarkerIndex, ids: I) -> Segmentation
where
    I: IntoIterator<Item = u64>,
{
    let present: Vec<(u64, usize)> = ids
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter_map(|n| index.first_offset(n).map(|start| (n, start)))
        .collect();

    // suffix_min[i] = earliest start among present[i..]
    let mut suffix_min = vec![index.transcript_len(); present.len() + 1];
    for i in (0..present.len()).rev() {
        suffix_min[i] = suffix_min[i + 1].min(present[i].1);
    }

    let mut windows = BTreeMap::new();
    for (i, &(number, start)) in present.iter().enumerate() {
        let mut end = suffix_min[i + 1];
        if end < start {
            warn!(
                "Case {} starts at byte {} after a greater case begins at {}; window is empty",
                number, start, end
            );
            end = start;
        }
        windows.insert(number, TranscriptWindow { number, start, end });
    }

    debug!("Segmentation: {} windows", windows.len());
    Segmentation { windows }
}
