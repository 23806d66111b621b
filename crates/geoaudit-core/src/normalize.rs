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

//! Request normalization and verdict decisions.
//!
//! Both sides of a comparison go through the same [`normalize`]:
//!
//! 1. Surrounding whitespace is trimmed and inner spaces become `%20`.
//! 2. The key parameter and everything after it is cut off. Keys are
//!    run-specific credentials, never part of the query.
//! 3. Parameter order is kept unless [`NormalizeOptions::sort_params`] is set.
//!
//! [`compare`] then matches when the normalized expectation is contained in
//! the normalized actual request, which lets an actual request carry extra
//! trailing parameters.

use crate::types::Verdict;

/// Default name of the credential parameter.
pub const DEFAULT_KEY_PARAM: &str = "key";

/// Configuration for request normalization.
///
/// # Examples
///
/// ```
/// use geoaudit_core::NormalizeOptions;
///
/// let options = NormalizeOptions::default();
/// assert_eq!(options.key_param, "key");
/// assert!(!options.sort_params);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Name of the credential parameter to strip.
    pub key_param: String,
    /// Sort query parameters so that order differences are ignored.
    pub sort_params: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            key_param: DEFAULT_KEY_PARAM.to_string(),
            sort_params: false,
        }
    }
}

/// Reduce a request URL to its comparable normal form.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```
/// use geoaudit_core::{normalize, NormalizeOptions};
///
/// let options = NormalizeOptions::default();
/// assert_eq!(
///     normalize("https://h/data/2020/acs/acs5?get=X&for=tract:*&in=state:36 county:061&key=abc", &options),
///     "https://h/data/2020/acs/acs5?get=X&for=tract:*&in=state:36%20county:061"
/// );
/// ```
pub fn normalize(request: &str, options: &NormalizeOptions) -> String {
    let encoded = request.trim().replace(' ', "%20");

    let Some(query_start) = encoded.find('?') else {
        return encoded;
    };
    let (base, query) = encoded.split_at(query_start);
    let query = &query[1..];

    let mut params: Vec<&str> = Vec::new();
    for param in query.split('&') {
        let name = param.split_once('=').map_or(param, |(name, _)| name);
        if !options.key_param.is_empty() && name == options.key_param {
            break;
        }
        params.push(param);
    }

    if params.is_empty() {
        return base.to_string();
    }
    if options.sort_params {
        params.sort_unstable();
    }
    format!("{}?{}", base, params.join("&"))
}

/// Classify one case from its expected request and the recovered actual one.
///
/// `None` for `actual` means the window yielded no usable request.
///
/// # Examples
///
/// ```
/// use geoaudit_core::{compare, NormalizeOptions, Verdict};
///
/// let options = NormalizeOptions::default();
/// let expected = "https://h/data/2022/acs/acs1?get=B01003_001E&for=state:36&key=XYZ";
///
/// assert_eq!(
///     compare(expected, Some("https://h/data/2022/acs/acs1?get=B01003_001E&for=state:36"), &options),
///     Verdict::Match
/// );
/// assert_eq!(
///     compare(expected, Some("https://h/data/2022/acs/acs1?get=B01003_001E&for=state:06"), &options),
///     Verdict::Mismatch
/// );
/// assert_eq!(compare(expected, None, &options), Verdict::NoCalls);
/// ```
pub fn compare(expected: &str, actual: Option<&str>, options: &NormalizeOptions) -> Verdict {
    let Some(actual) = actual else {
        return Verdict::NoCalls;
    };
    let expected = normalize(expected, options);
    let actual = normalize(actual, options);
    // Containment subsumes equality.
    if actual.contains(&expected) {
        Verdict::Match
    } else {
        Verdict::Mismatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        normalize(s, &NormalizeOptions::default())
    }

    #[test]
    fn test_key_stripped_with_tail() {
        assert_eq!(norm("https://h/d?get=A&key=SECRET&extra=1"), "https://h/d?get=A");
    }

    #[test]
    fn test_key_as_first_param() {
        assert_eq!(norm("https://h/d?key=SECRET&get=A"), "https://h/d");
    }

    #[test]
    fn test_key_substring_names_kept() {
        assert_eq!(norm("https://h/d?get=A&monkey=1"), "https://h/d?get=A&monkey=1");
        assert_eq!(norm("https://h/d?get=key&for=us:1"), "https://h/d?get=key&for=us:1");
    }

    #[test]
    fn test_no_query() {
        assert_eq!(norm("  https://h/d  "), "https://h/d");
    }

    #[test]
    fn test_spaces_encoded() {
        assert_eq!(norm("https://h/d?in=state:36 county:061"), "https://h/d?in=state:36%20county:061");
        assert_eq!(
            norm("https://h/d?in=state:36 county:061"),
            norm("https://h/d?in=state:36%20county:061")
        );
    }

    #[test]
    fn test_order_kept_by_default() {
        assert_ne!(norm("https://h/d?for=us:1&get=A"), norm("https://h/d?get=A&for=us:1"));
    }

    #[test]
    fn test_sorted_params() {
        let options = NormalizeOptions {
            sort_params: true,
            ..Default::default()
        };
        assert_eq!(
            normalize("https://h/d?for=us:1&get=A&key=1", &options),
            normalize("https://h/d?get=A&for=us:1", &options)
        );
    }

    #[test]
    fn test_custom_key_param() {
        let options = NormalizeOptions {
            key_param: "api_key".to_string(),
            ..Default::default()
        };
        assert_eq!(normalize("https://h/d?get=A&api_key=z", &options), "https://h/d?get=A");
        assert_eq!(normalize("https://h/d?get=A&key=z", &options), "https://h/d?get=A&key=z");
    }

    #[test]
    fn test_compare_extra_trailing_params_match() {
        let options = NormalizeOptions::default();
        assert_eq!(
            compare("https://h/d?get=A&for=us:1", Some("https://h/d?get=A&for=us:1&in=x:1"), &options),
            Verdict::Match
        );
    }

    #[test]
    fn test_compare_different_key_values_match() {
        let options = NormalizeOptions::default();
        assert_eq!(
            compare("https://h/d?get=A&key=one", Some("https://h/d?get=A&key=two"), &options),
            Verdict::Match
        );
    }

    #[test]
    fn test_compare_missing_params_mismatch() {
        let options = NormalizeOptions::default();
        assert_eq!(
            compare("https://h/d?get=A&for=us:1", Some("https://h/d?get=A"), &options),
            Verdict::Mismatch
        );
    }
}
