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

//! Structured error types for the geoaudit CLI.
//!
//! Every command returns `Result<(), CliError>`; `main` prints the error
//! and exits non-zero.

use geoaudit_csv::SpecError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for geoaudit CLI operations.
///
/// Implements `Clone` so batch results produced on worker threads can carry
/// their failures back to the caller. Library errors that are not `Clone`
/// are captured as their display text.
///
/// # Examples
///
/// ```rust,no_run
/// use geoaudit_cli::error::CliError;
///
/// fn read_transcript(path: &str) -> Result<String, CliError> {
///     std::fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
/// }
/// ```
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// I/O operation failed (file read, write, or metadata access).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Input file is larger than the configured limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes ({max_mb} MB)")]
    FileTooLarge {
        /// The file path that exceeded the limit
        path: PathBuf,
        /// The actual file size in bytes
        actual: u64,
        /// The maximum allowed file size in bytes
        max: u64,
        /// The maximum allowed file size in MB (for display)
        max_mb: u64,
    },

    /// The expected-spec table could not be loaded.
    #[error("Spec error: {0}")]
    Spec(String),

    /// JSON serialization error.
    #[error("JSON format error: {message}")]
    JsonFormat {
        /// The error message
        message: String,
    },

    /// Verdict CSV could not be written.
    #[error("CSV output error: {0}")]
    CsvOutput(String),

    /// Invalid input provided by the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Some cases did not match and the caller asked for a failing exit.
    #[error("{failed} of {total} cases did not match")]
    CasesFailed {
        /// Cases with a verdict other than MATCH
        failed: usize,
        /// All cases in the run
        total: usize,
    },

    /// Some transcripts in a batch could not be verified at all.
    #[error("{failed} of {total} transcripts could not be verified")]
    BatchFailed {
        /// Transcripts that failed to load
        failed: usize,
        /// All transcripts in the batch
        total: usize,
    },
}

impl CliError {
    /// Create an I/O error with file path context.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use geoaudit_cli::error::CliError;
    /// use std::fs;
    ///
    /// let result = fs::read_to_string("run.log")
    ///     .map_err(|e| CliError::io_error("run.log", e));
    /// ```
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a file-too-large error.
    ///
    /// # Arguments
    ///
    /// * `path` - The file path that exceeded the limit
    /// * `actual` - The actual file size in bytes
    /// * `max` - The maximum allowed file size in bytes
    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a CSV output error.
    pub fn csv_output(msg: impl Into<String>) -> Self {
        Self::CsvOutput(msg.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonFormat {
            message: source.to_string(),
        }
    }
}

impl From<SpecError> for CliError {
    fn from(source: SpecError) -> Self {
        Self::Spec(source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = CliError::io_error(
            "run.log",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("run.log"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_file_too_large_display() {
        let err = CliError::file_too_large("big.log", 200_000_000, 100 * 1024 * 1024);
        let msg = err.to_string();
        assert!(msg.contains("big.log"));
        assert!(msg.contains("200000000 bytes"));
        assert!(msg.contains("100 MB"));
    }

    #[test]
    fn test_spec_error_conversion() {
        let err: CliError = SpecError::MissingColumn("API call".to_string()).into();
        assert_eq!(err.to_string(), "Spec error: Missing required column: API call");
    }

    #[test]
    fn test_cases_failed_display() {
        let err = CliError::CasesFailed { failed: 2, total: 5 };
        assert_eq!(err.to_string(), "2 of 5 cases did not match");
    }

    #[test]
    fn test_batch_failed_display() {
        let err = CliError::BatchFailed { failed: 1, total: 3 };
        assert_eq!(err.to_string(), "1 of 3 transcripts could not be verified");
    }

    #[test]
    fn test_invalid_input_display() {
        let err = CliError::invalid_input("unknown format 'xml'");
        assert_eq!(err.to_string(), "Invalid input: unknown format 'xml'");
    }

    #[test]
    fn test_json_format_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let cli_err: CliError = json_err.into();
        assert!(matches!(cli_err, CliError::JsonFormat { .. }));
    }

    #[test]
    fn test_error_cloning() {
        let err = CliError::io_error("run.log", io::Error::new(io::ErrorKind::NotFound, "not found"));
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
