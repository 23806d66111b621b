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

//! Error types for payload extraction.

use thiserror::Error;

/// Failure to turn one embedded action block into an [`ActionPayload`].
///
/// These errors are always recoverable: the extractor records the offending
/// block as skipped and keeps scanning the rest of the window.
///
/// # Examples
///
/// ```
/// use geoaudit_core::PayloadError;
///
/// let err = PayloadError::Unterminated { open: 120 };
/// assert_eq!(err.to_string(), "unterminated payload block opened at byte 120");
/// ```
///
/// [`ActionPayload`]: crate::ActionPayload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The opening brace was never balanced before the window ended.
    #[error("unterminated payload block opened at byte {open}")]
    Unterminated {
        /// Byte offset of the opening brace in the transcript.
        open: usize,
    },

    /// No opening brace at the offset where a block was expected.
    #[error("no payload block starts at byte {offset}")]
    NotABlock {
        /// Byte offset that was expected to hold `{`.
        offset: usize,
    },

    /// Brace nesting went deeper than the configured maximum.
    #[error("payload nesting exceeds maximum depth {max}")]
    TooDeep {
        /// The configured maximum depth.
        max: usize,
    },

    /// The balanced block is not a valid JSON object.
    #[error("unparseable payload: {0}")]
    Unparseable(String),

    /// The object names neither a dataset nor a year, so it is not a request.
    #[error("payload has neither dataset nor year")]
    MissingFields,

    /// A recognized field holds a value of the wrong shape.
    #[error("invalid field '{field}': expected {expected}")]
    InvalidField {
        /// Field name as it appears in the payload.
        field: String,
        /// Human-readable description of the accepted shapes.
        expected: &'static str,
    },
}

/// Two expected specs share one canonical id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate spec id '{id}' at position {position} (first seen at position {first})")]
pub struct DuplicateSpecId {
    pub id: String,
    /// Position of the spec already holding the id.
    pub first: usize,
    /// Position of the rejected spec in the input sequence.
    pub position: usize,
}

/// Convenience type alias for `Result` with `PayloadError`.
pub type Result<T> = std::result::Result<T, PayloadError>;

impl From<serde_json::Error> for PayloadError {
    fn from(err: serde_json::Error) -> Self {
        PayloadError::Unparseable(err.to_string())
    }
}
