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

//! Value types shared by every stage of the audit.

use crate::error::DuplicateSpecId;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Canonicalize a raw test-case identifier.
///
/// Identifiers are numeric. Integer text and integral float text (the form
/// spreadsheet exports tend to produce) both map to the plain decimal form;
/// leading zeros are dropped. Anything else is rejected.
///
/// # Examples
///
/// ```
/// use geoaudit_core::normalize_id;
///
/// assert_eq!(normalize_id(" 12 "), Some((12, "12".to_string())));
/// assert_eq!(normalize_id("12.0"), Some((12, "12".to_string())));
/// assert_eq!(normalize_id("007"), Some((7, "7".to_string())));
/// assert_eq!(normalize_id("12.5"), None);
/// assert_eq!(normalize_id("Q12"), None);
/// ```
pub fn normalize_id(raw: &str) -> Option<(u64, String)> {
    let trimmed = raw.trim();
    let integral = match trimmed.split_once('.') {
        Some((whole, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => whole,
        Some(_) => return None,
        None => trimmed,
    };
    if integral.is_empty() || !integral.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number = integral.parse::<u64>().ok()?;
    Some((number, number.to_string()))
}

/// One expected test case: the question asked and the request it should
/// have produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectedSpec {
    /// Canonical identifier (decimal form of `number`).
    pub id: String,
    /// Numeric value of the identifier, used for ordering.
    pub number: u64,
    /// Human-readable question, used only for reporting.
    pub question: String,
    /// The request URL the assistant should have issued.
    pub expected_request: String,
}

impl ExpectedSpec {
    /// Create a spec from an already-canonical numeric id.
    pub fn new(number: u64, question: impl Into<String>, expected_request: impl Into<String>) -> Self {
        Self {
            id: number.to_string(),
            number,
            question: question.into(),
            expected_request: expected_request.into(),
        }
    }
}

/// Ordered collection of expected specs with lookup by id.
///
/// Insertion order is kept for iteration; ids are unique.
#[derive(Debug, Clone, Default)]
pub struct SpecSet {
    specs: Vec<ExpectedSpec>,
    index: HashMap<String, usize>,
}

impl SpecSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a spec, keeping the first one on an id collision.
    ///
    /// Returns the position of the already-present spec when the id is
    /// taken, so loaders can report both rows.
    pub fn insert(&mut self, spec: ExpectedSpec) -> Result<(), usize> {
        if let Some(&existing) = self.index.get(&spec.id) {
            return Err(existing);
        }
        self.index.insert(spec.id.clone(), self.specs.len());
        self.specs.push(spec);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ExpectedSpec> {
        self.index.get(id).map(|&i| &self.specs[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExpectedSpec> {
        self.specs.iter()
    }

    pub fn as_slice(&self) -> &[ExpectedSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Build a set from a sequence of specs, rejecting any repeated id.
    ///
    /// # Examples
    ///
    /// ```
    /// use geoaudit_core::{ExpectedSpec, SpecSet};
    ///
    /// let ok = SpecSet::from_specs(vec![ExpectedSpec::new(1, "a", "u1")]).unwrap();
    /// assert_eq!(ok.len(), 1);
    ///
    /// let err = SpecSet::from_specs(vec![
    ///     ExpectedSpec::new(1, "a", "u1"),
    ///     ExpectedSpec::new(1, "b", "u2"),
    /// ])
    /// .unwrap_err();
    /// assert_eq!((err.first, err.position), (0, 1));
    /// ```
    pub fn from_specs<I>(specs: I) -> Result<Self, DuplicateSpecId>
    where
        I: IntoIterator<Item = ExpectedSpec>,
    {
        let mut set = SpecSet::new();
        for (position, spec) in specs.into_iter().enumerate() {
            let id = spec.id.clone();
            set.insert(spec)
                .map_err(|first| DuplicateSpecId { id, first, position })?;
        }
        Ok(set)
    }

    /// Numeric ids of every spec, in insertion order.
    pub fn numbers(&self) -> impl Iterator<Item = u64> + '_ {
        self.specs.iter().map(|s| s.number)
    }
}

impl TryFrom<Vec<ExpectedSpec>> for SpecSet {
    type Error = DuplicateSpecId;

    fn try_from(specs: Vec<ExpectedSpec>) -> Result<Self, Self::Error> {
        Self::from_specs(specs)
    }
}

/// Half-open byte range `[start, end)` of the transcript attributed to one
/// test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TranscriptWindow {
    /// Numeric id of the case.
    pub number: u64,
    /// Offset of the earliest `Q<id>:` marker for this case.
    pub start: usize,
    /// Start of the next case's window, or the transcript length.
    pub end: usize,
}

impl TranscriptWindow {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Borrow the window's text from the transcript it was computed on.
    pub fn slice<'t>(&self, transcript: &'t str) -> &'t str {
        &transcript[self.start..self.end]
    }
}

/// Where a candidate request was recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Rebuilt from a structured action payload.
    FromAction,
    /// Copied from a `"url": "..."` response field.
    FromResponseField,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FromAction => write!(f, "action"),
            Self::FromResponseField => write!(f, "response"),
        }
    }
}

/// A request string the assistant actually issued, with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRequest {
    pub request: String,
    pub provenance: Provenance,
    /// Transcript byte offset of the action tag or URL field.
    pub offset: usize,
}

/// Terminal classification of one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The issued request matches the expectation.
    Match,
    /// A request was issued but it differs from the expectation.
    Mismatch,
    /// The case ran but no usable request could be recovered.
    NoCalls,
    /// The case marker never appears in the transcript.
    NotFound,
}

impl Verdict {
    pub fn is_match(self) -> bool {
        self == Verdict::Match
    }

    /// Glyph used in the human-readable report.
    pub fn glyph(self) -> &'static str {
        match self {
            Verdict::Match => "✓",
            Verdict::Mismatch => "✗",
            Verdict::NoCalls => "∅",
            Verdict::NotFound => "?",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Match => write!(f, "MATCH"),
            Verdict::Mismatch => write!(f, "MISMATCH"),
            Verdict::NoCalls => write!(f, "NO_CALLS"),
            Verdict::NotFound => write!(f, "NOT_FOUND"),
        }
    }
}
