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

//! Error types for spec-table loading and verdict export.

use thiserror::Error;

/// Spec-table and CSV export errors.
///
/// Every variant is fatal: a table that fails to load stops the run before
/// any case is compared.
///
/// # Examples
///
/// ```
/// use geoaudit_csv::SpecError;
///
/// let err = SpecError::MalformedSpec {
///     row: 3,
///     column: "API call".to_string(),
/// };
/// assert_eq!(err.to_string(), "Malformed spec at row 3: column 'API call' is empty");
/// ```
#[derive(Debug, Error)]
pub enum SpecError {
    /// A required field is empty.
    #[error("Malformed spec at row {row}: column '{column}' is empty")]
    MalformedSpec {
        /// Data row number (1-based, header excluded).
        row: usize,
        /// Name of the empty column.
        column: String,
    },

    /// Two rows share an identifier after normalization.
    ///
    /// # Examples
    ///
    /// ```
    /// use geoaudit_csv::SpecError;
    ///
    /// let err = SpecError::DuplicateId {
    ///     id: "4".to_string(),
    ///     first_row: 1,
    ///     row: 2,
    /// };
    /// assert!(err.to_string().contains("first defined at row 1"));
    /// ```
    #[error("Duplicate id '{id}' at row {row} (first defined at row {first_row})")]
    DuplicateId {
        /// Canonical id.
        id: String,
        /// Row of the first occurrence.
        first_row: usize,
        /// Row of the repeated occurrence.
        row: usize,
    },

    /// The identifier is not a non-negative integer.
    #[error("Invalid id '{value}' at row {row}: expected a non-negative integer")]
    InvalidId {
        /// Data row number (1-based).
        row: usize,
        /// The raw id text.
        value: String,
    },

    /// Missing required column in the header row.
    ///
    /// # Examples
    ///
    /// ```
    /// use geoaudit_csv::SpecError;
    ///
    /// let err = SpecError::MissingColumn("API call".to_string());
    /// assert_eq!(err.to_string(), "Missing required column: API call");
    /// ```
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Row count exceeded the configured limit.
    #[error("Security limit exceeded: row count {actual} exceeds maximum {limit}")]
    SecurityLimit {
        /// Maximum allowed rows.
        limit: usize,
        /// Row count at which loading stopped.
        actual: usize,
    },

    /// A record could not be parsed.
    #[error("CSV parse error at line {line}: {message}")]
    ParseError {
        /// Line number where the error occurred (1-based).
        line: usize,
        /// Detailed error message.
        message: String,
    },

    /// I/O error during reading or writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the underlying CSV library.
    #[error("CSV library error: {0}")]
    CsvLib(#[from] csv::Error),
}

/// Convenience type alias for `Result` with `SpecError`.
pub type Result<T> = std::result::Result<T, SpecError>;
