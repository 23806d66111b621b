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

//! Decoded structured-action payloads.

use crate::error::{PayloadError, Result};
use serde_json::{Map, Value};

/// The request parameters an assistant action carried.
///
/// Built from one embedded JSON object. Geography filters keep the key order
/// of the source object; everything the builder does not use is kept in
/// [`extra`](Self::extra).
///
/// # Examples
///
/// ```
/// use geoaudit_core::ActionPayload;
///
/// let payload = ActionPayload::from_json(
///     r#"{"dataset": "acs/acs5", "year": 2021, "variables": ["B01003_001E"],
///         "geo_for": {"county": "*"}, "geo_in": {"state": "36"}, "note": "x"}"#,
/// ).unwrap();
///
/// assert_eq!(payload.year.as_deref(), Some("2021"));
/// assert_eq!(payload.geo_in, vec![("state".to_string(), "36".to_string())]);
/// assert!(payload.extra.contains_key("note"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionPayload {
    pub dataset: Option<String>,
    pub year: Option<String>,
    /// Requested variables, order-significant.
    pub variables: Vec<String>,
    /// Primary geography filter entries, in source order.
    pub geo_for: Vec<(String, String)>,
    /// Containing geography filter entries, in source order.
    pub geo_in: Vec<(String, String)>,
    /// Fields the request builder does not use.
    pub extra: Map<String, Value>,
}

impl ActionPayload {
    /// Decode a payload from the text of a balanced brace block.
    ///
    /// # Errors
    ///
    /// - [`PayloadError::Unparseable`] if the text is not a JSON object.
    /// - [`PayloadError::InvalidField`] if a recognized field has the wrong
    ///   shape. `null` is treated as absent.
    pub fn from_json(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Self::from_map(map),
            other => Err(PayloadError::Unparseable(format!(
                "expected a JSON object, found {}",
                kind_of(&other)
            ))),
        }
    }

    /// Decode a payload from an already-parsed JSON object.
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        let mut payload = ActionPayload::default();

        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            match key.as_str() {
                "dataset" => payload.dataset = Some(scalar_text(&key, &value, "a string")?),
                "year" => payload.year = Some(scalar_text(&key, &value, "a string or integer")?),
                "variables" => payload.variables = variable_list(&key, &value)?,
                "geo_for" => payload.geo_for = geo_pairs(&key, &value)?,
                "geo_in" => payload.geo_in = geo_pairs(&key, &value)?,
                _ => {
                    payload.extra.insert(key, value);
                }
            }
        }

        Ok(payload)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strings pass through; integers are rendered in decimal.
fn scalar_text(field: &str, value: &Value, expected: &'static str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        _ => Err(PayloadError::InvalidField {
            field: field.to_string(),
            expected,
        }),
    }
}

fn variable_list(field: &str, value: &Value) -> Result<Vec<String>> {
    const EXPECTED: &str = "an array of strings or a comma-separated string";
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| scalar_text(field, item, EXPECTED))
            .collect(),
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()),
        _ => Err(PayloadError::InvalidField {
            field: field.to_string(),
            expected: EXPECTED,
        }),
    }
}

fn geo_pairs(field: &str, value: &Value) -> Result<Vec<(String, String)>> {
    const EXPECTED: &str = "an object of geography codes";
    let Value::Object(map) = value else {
        return Err(PayloadError::InvalidField {
            field: field.to_string(),
            expected: EXPECTED,
        });
    };
    map.iter()
        .map(|(geo_type, code)| -> Result<(String, String)> {
            Ok((geo_type.clone(), scalar_text(field, code, EXPECTED)?))
        })
        .collect()
}
