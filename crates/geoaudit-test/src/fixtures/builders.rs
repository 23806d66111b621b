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

//! Builder pattern for creating customizable transcripts and spec tables.

use geoaudit_core::DEFAULT_ACTION_TAG;
use serde_json::{Map, Value};

/// Builder for action payload JSON.
///
/// Fields are emitted in the order they were set, which matters for
/// `geo_in` rendering.
///
/// # Examples
///
/// ```
/// use geoaudit_test::fixtures::builders::PayloadBuilder;
///
/// let json = PayloadBuilder::new("acs/acs1", "2022")
///     .variable("B01003_001E")
///     .geo_for("state", "36")
///     .to_json();
///
/// assert_eq!(
///     json,
///     r#"{"dataset":"acs/acs1","year":"2022","variables":["B01003_001E"],"geo_for":{"state":"36"}}"#
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct PayloadBuilder {
    dataset: Option<String>,
    year: Option<String>,
    variables: Vec<String>,
    geo_for: Vec<(String, String)>,
    geo_in: Vec<(String, String)>,
    extra: Vec<(String, Value)>,
}

impl PayloadBuilder {
    /// Creates a builder with dataset and year set.
    pub fn new(dataset: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            dataset: Some(dataset.into()),
            year: Some(year.into()),
            ..Default::default()
        }
    }

    /// Creates a builder with no fields set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a requested variable.
    pub fn variable(mut self, name: impl Into<String>) -> Self {
        self.variables.push(name.into());
        self
    }

    /// Adds a primary geography filter entry.
    pub fn geo_for(mut self, geo_type: impl Into<String>, code: impl Into<String>) -> Self {
        self.geo_for.push((geo_type.into(), code.into()));
        self
    }

    /// Adds a containing geography filter entry.
    pub fn geo_in(mut self, geo_type: impl Into<String>, code: impl Into<String>) -> Self {
        self.geo_in.push((geo_type.into(), code.into()));
        self
    }

    /// Adds a field the request builder ignores.
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.push((key.into(), value));
        self
    }

    /// Builds the payload as a JSON object.
    pub fn to_value(&self) -> Value {
        fn geo(entries: &[(String, String)]) -> Value {
            Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            )
        }

        let mut map = Map::new();
        if let Some(dataset) = &self.dataset {
            map.insert("dataset".into(), Value::String(dataset.clone()));
        }
        if let Some(year) = &self.year {
            map.insert("year".into(), Value::String(year.clone()));
        }
        if !self.variables.is_empty() {
            map.insert(
                "variables".into(),
                Value::Array(self.variables.iter().cloned().map(Value::String).collect()),
            );
        }
        if !self.geo_for.is_empty() {
            map.insert("geo_for".into(), geo(&self.geo_for));
        }
        if !self.geo_in.is_empty() {
            map.insert("geo_in".into(), geo(&self.geo_in));
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    /// Builds the payload as compact JSON text.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

/// Builder for transcript text.
///
/// Each method appends one line in the layout a tool-using assistant log
/// typically has.
///
/// # Examples
///
/// ```
/// use geoaudit_test::fixtures::builders::{PayloadBuilder, TranscriptBuilder};
///
/// let transcript = TranscriptBuilder::new()
///     .question(1, "Population of New York")
///     .thought("I should query ACS 1-year.")
///     .action(&PayloadBuilder::new("acs/acs1", "2022").variable("B01003_001E").to_json())
///     .build();
///
/// assert!(transcript.starts_with("Q1: Population of New York\n"));
/// assert!(transcript.contains("Action: census_api_call\nAction Input: {"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TranscriptBuilder {
    text: String,
    action_tag: Option<String>,
}

impl TranscriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a different action tag for subsequent actions.
    pub fn action_tag(mut self, tag: impl Into<String>) -> Self {
        self.action_tag = Some(tag.into());
        self
    }

    /// Appends a `Q<id>:` marker line.
    pub fn question(mut self, id: u64, text: &str) -> Self {
        self.text.push_str(&format!("Q{}: {}\n", id, text));
        self
    }

    /// Appends a free-form reasoning line.
    pub fn thought(mut self, text: &str) -> Self {
        self.text.push_str(&format!("Thought: {}\n", text));
        self
    }

    /// Appends an action record with the payload text verbatim.
    pub fn action(mut self, payload: &str) -> Self {
        let tag = self.action_tag.as_deref().unwrap_or(DEFAULT_ACTION_TAG);
        self.text
            .push_str(&format!("Action: {}\nAction Input: {}\n", tag, payload));
        self
    }

    /// Appends a tool observation carrying a `"url"` response field.
    pub fn response_url(mut self, url: &str) -> Self {
        let field = serde_json::to_string(url).unwrap_or_default();
        self.text.push_str(&format!(
            "Observation: {{\"url\": {}, \"data\": [[\"NAME\"]]}}\n",
            field
        ));
        self
    }

    /// Appends raw text as-is.
    pub fn raw(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    pub fn build(self) -> String {
        self.text
    }
}

/// Builder for expected-spec CSV tables.
///
/// # Examples
///
/// ```
/// use geoaudit_test::fixtures::builders::SpecTableBuilder;
///
/// let csv = SpecTableBuilder::new()
///     .row("1", "Population of New York", "https://h/data?get=A,B&for=us:1")
///     .build();
///
/// assert_eq!(
///     csv,
///     "No,Question friendly human,API call\n1,Population of New York,\"https://h/data?get=A,B&for=us:1\"\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SpecTableBuilder {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Default for SpecTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecTableBuilder {
    /// Creates a builder with the standard three-column header.
    pub fn new() -> Self {
        Self {
            header: vec![
                "No".to_string(),
                "Question friendly human".to_string(),
                "API call".to_string(),
            ],
            rows: Vec::new(),
        }
    }

    /// Replaces the header row.
    pub fn header(mut self, columns: &[&str]) -> Self {
        self.header = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Appends a three-column row.
    pub fn row(mut self, id: &str, question: &str, request: &str) -> Self {
        self.rows
            .push(vec![id.to_string(), question.to_string(), request.to_string()]);
        self
    }

    /// Appends a row with arbitrary cells.
    pub fn raw_row(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn build(self) -> String {
        let mut out = String::new();
        for line in std::iter::once(&self.header).chain(self.rows.iter()) {
            let cells: Vec<String> = line.iter().map(|c| quote(c)).collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }
}

fn quote(cell: &str) -> String {
    if cell.contains(|c: char| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
