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

//! Request reconstruction from action payloads.
//!
//! The target grammar is
//!
//! ```text
//! <api-root>/<year>/<dataset>?get=<v1>,<v2>&for=<type>:<code>[&in=<t1>:<c1> <t2>:<c2>]
//! ```
//!
//! The API accepts a single primary filter, so when a payload carries several
//! `geo_for` entries the last one is used. Containing filters are joined
//! with a single space in payload order.

use crate::payload::ActionPayload;
use tracing::debug;

/// Default root of the statistical API.
pub const DEFAULT_API_ROOT: &str = "https://api.census.gov/data";

/// Configuration for request reconstruction.
///
/// # Examples
///
/// ```
/// use geoaudit_core::BuildOptions;
///
/// let options = BuildOptions::default();
/// assert_eq!(options.api_root, "https://api.census.gov/data");
///
/// let options = BuildOptions {
///     api_root: "https://api.example.org/data".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// API root the year and dataset segments are appended to. A trailing
    /// slash is ignored.
    pub api_root: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
        }
    }
}

/// Build the request URL a payload describes.
///
/// Total over any payload: missing fields render as empty segments so a
/// half-formed action still yields a comparable string.
///
/// # Examples
///
/// ```
/// use geoaudit_core::{build_request, ActionPayload, BuildOptions};
///
/// let payload = ActionPayload::from_json(
///     r#"{"dataset":"acs/acs5","year":"2021","variables":["NAME","B01003_001E"],
///         "geo_for":{"county":"*"},"geo_in":{"state":"36"}}"#,
/// ).unwrap();
///
/// assert_eq!(
///     build_request(&payload, &BuildOptions::default()),
///     "https://api.census.gov/data/2021/acs/acs5?get=NAME,B01003_001E&for=county:*&in=state:36"
/// );
/// ```
pub fn build_request(payload: &ActionPayload, options: &BuildOptions) -> String {
    let root = options.api_root.trim_end_matches('/');
    let year = payload.year.as_deref().unwrap_or("");
    let dataset = payload.dataset.as_deref().unwrap_or("").trim_matches('/');

    let mut params = Vec::with_capacity(3);
    params.push(format!("get={}", payload.variables.join(",")));

    if payload.geo_for.len() > 1 {
        debug!(
            "Payload has {} primary geography filters; using the last",
            payload.geo_for.len()
        );
    }
    let primary = payload
        .geo_for
        .last()
        .map(|(geo_type, code)| format!("{}:{}", geo_type, code))
        .unwrap_or_default();
    params.push(format!("for={}", primary));

    if !payload.geo_in.is_empty() {
        let parents: Vec<String> = payload
            .geo_in
            .iter()
            .map(|(geo_type, code)| format!("{}:{}", geo_type, code))
            .collect();
        params.push(format!("in={}", parents.join(" ")));
    }

    format!("{}/{}/{}?{}", root, year, dataset, params.join("&"))
}
