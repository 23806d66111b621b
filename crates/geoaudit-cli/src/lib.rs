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

//! geoaudit command-line library.
//!
//! The `geoaudit` binary is a thin wrapper over this crate:
//!
//! - [`cli`]: clap command definitions
//! - [`commands`]: command implementations and report rendering
//! - [`batch`]: parallel processing of many transcripts against one spec table
//! - [`error`]: the [`CliError`](error::CliError) type every command returns

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
