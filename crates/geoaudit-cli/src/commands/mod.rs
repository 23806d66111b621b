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

//! CLI command implementations

mod batch_verify;
mod inspect;
mod verify;

pub use batch_verify::{batch_verify, BatchSettings};
pub use inspect::inspect;
pub use verify::{render_text, verify, ReportFormat, VerifySettings};

use crate::error::CliError;
use clap::Args;
use geoaudit_core::{BuildOptions, ExtractOptions, NormalizeOptions, VerifyOptions};
use std::fs;
use std::io::{self, Write};

/// Default maximum input file size (1 GB).
/// Can be overridden via the GEOAUDIT_MAX_FILE_SIZE environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Pipeline flags shared by every command that runs extraction.
#[derive(Args, Debug, Clone, Default)]
pub struct RunOptions {
    /// API root prepended to rebuilt requests
    #[arg(long, value_name = "URL")]
    pub api_root: Option<String>,

    /// Tag that introduces an action record in the transcript
    #[arg(long, value_name = "TAG")]
    pub action_tag: Option<String>,

    /// Query parameter holding the API key; it and every later parameter
    /// are dropped before comparison
    #[arg(long, value_name = "NAME")]
    pub key_param: Option<String>,

    /// Sort query parameters before comparison
    #[arg(long)]
    pub sort_params: bool,
}

impl RunOptions {
    /// Map the flags onto pipeline options, keeping defaults for anything
    /// not given.
    pub fn to_verify_options(&self) -> VerifyOptions {
        let mut extract = ExtractOptions::default();
        if let Some(tag) = &self.action_tag {
            extract.action_tag = tag.clone();
        }

        let mut build = BuildOptions::default();
        if let Some(root) = &self.api_root {
            build.api_root = root.clone();
        }

        let mut normalize = NormalizeOptions {
            sort_params: self.sort_params,
            ..Default::default()
        };
        if let Some(key) = &self.key_param {
            normalize.key_param = key.clone();
        }

        VerifyOptions {
            extract,
            build,
            normalize,
        }
    }
}

fn get_max_file_size() -> u64 {
    std::env::var("GEOAUDIT_MAX_FILE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Read a file from disk with size validation.
///
/// The size is checked with `fs::metadata` before anything is read, so an
/// oversized transcript is rejected without allocating for it.
///
/// # Errors
///
/// Returns `Err` if the metadata cannot be read, the file exceeds the
/// configured maximum (`GEOAUDIT_MAX_FILE_SIZE`, in bytes), or the file
/// cannot be read as UTF-8.
///
/// # Examples
///
/// ```no_run
/// use geoaudit_cli::commands::read_file;
///
/// # fn main() -> Result<(), geoaudit_cli::error::CliError> {
/// let transcript = read_file("run.log")?;
/// assert!(!transcript.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn read_file(path: &str) -> Result<String, CliError> {
    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;

    let max_file_size = get_max_file_size();
    if metadata.len() > max_file_size {
        return Err(CliError::file_too_large(path, metadata.len(), max_file_size));
    }

    fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
}

/// Write content to a file, or to stdout when no path is given.
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), CliError> {
    match path {
        Some(p) => fs::write(p, content).map_err(|e| CliError::io_error(p, e)),
        None => io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| CliError::io_error("<stdout>", e)),
    }
}
