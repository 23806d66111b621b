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

//! CSV adapters for geoaudit.
//!
//! Reads expected-spec tables into a [`SpecSet`] and writes a run
//! [`Summary`] back out as a verdict table.
//!
//! # Expected-spec tables
//!
//! A table needs three columns, located by header name:
//!
//! | Column | Meaning |
//! |--------|---------|
//! | `No` | Numeric case id (`12` and `12.0` are the same id) |
//! | `Question friendly human` | Question text, used only for reporting |
//! | `API call` | Expected request URL, optionally with a key parameter |
//!
//! Extra columns are ignored. Empty required fields, non-numeric ids and
//! duplicate ids are fatal.
//!
//! # Examples
//!
//! ```
//! use geoaudit_core::{verify, VerifyOptions};
//! use geoaudit_csv::{load_specs, write_verdicts};
//!
//! let specs = load_specs(
//!     "No,Question friendly human,API call\n\
//!      1,US population,https://api.census.gov/data/2020/dec/pl?get=P1_001N&for=us:1&key=abc\n",
//! )
//! .unwrap();
//!
//! let transcript = "Q1: US population\n\"url\": \"https://api.census.gov/data/2020/dec/pl?get=P1_001N&for=us:1\"\n";
//! let summary = verify(&specs, transcript, &VerifyOptions::default());
//!
//! let csv = write_verdicts(&summary).unwrap();
//! assert!(csv.lines().nth(1).unwrap().contains(",MATCH,"));
//! ```
//!
//! [`SpecSet`]: geoaudit_core::SpecSet
//! [`Summary`]: geoaudit_core::Summary

mod error;
mod load;
mod write;

pub use error::{Result, SpecError};
pub use load::{load_specs, load_specs_reader, load_specs_with_config, LoadConfig, DEFAULT_MAX_ROWS};
pub use write::{
    write_verdicts, write_verdicts_with_config, write_verdicts_writer, WriteConfig, VERDICT_COLUMNS,
};
