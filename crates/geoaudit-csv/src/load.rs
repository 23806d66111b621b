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

//! Expected-spec loading from CSV tables.

use crate::error::{Result, SpecError};
use geoaudit_core::{normalize_id, ExpectedSpec, SpecSet};
use std::io::Read;
use tracing::debug;

/// Default maximum number of data rows.
pub const DEFAULT_MAX_ROWS: usize = 100_000;

/// Configuration for loading spec tables.
///
/// Columns are located by header name, so their order and any extra columns
/// in the table do not matter.
///
/// # Examples
///
/// ```
/// use geoaudit_csv::LoadConfig;
///
/// // Semicolon-separated export with a renamed request column
/// let config = LoadConfig {
///     delimiter: b';',
///     request_column: "Expected URL".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.id_column, "No");
/// ```
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Field delimiter (default: `,`).
    pub delimiter: u8,
    /// Whether to trim leading/trailing whitespace from fields and headers
    /// (default: `true`).
    pub trim: bool,
    /// Maximum number of data rows (default: 100,000).
    pub max_rows: usize,
    /// Header of the identifier column (default: `No`).
    pub id_column: String,
    /// Header of the question column (default: `Question friendly human`).
    pub question_column: String,
    /// Header of the expected-request column (default: `API call`).
    pub request_column: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
            max_rows: DEFAULT_MAX_ROWS,
            id_column: "No".to_string(),
            question_column: "Question friendly human".to_string(),
            request_column: "API call".to_string(),
        }
    }
}

/// Load a spec table from CSV text with the default configuration.
///
/// # Examples
///
/// ```
/// use geoaudit_csv::load_specs;
///
/// let csv = "No,Question friendly human,API call\n\
///            1,Population of New York,https://api.census.gov/data/2022/acs/acs1?get=B01003_001E&for=state:36\n\
///            2.0,Median age in Texas,https://api.census.gov/data/2021/acs/acs1?get=B01002_001E&for=state:48\n";
///
/// let specs = load_specs(csv).unwrap();
/// assert_eq!(specs.len(), 2);
/// assert_eq!(specs.get("2").unwrap().question, "Median age in Texas");
/// ```
pub fn load_specs(csv: &str) -> Result<SpecSet> {
    load_specs_with_config(csv, &LoadConfig::default())
}

/// Load a spec table from CSV text.
pub fn load_specs_with_config(csv: &str, config: &LoadConfig) -> Result<SpecSet> {
    load_specs_reader(csv.as_bytes(), config)
}

/// Load a spec table from any reader.
///
/// # Errors
///
/// - [`SpecError::MissingColumn`] if a configured header is absent.
/// - [`SpecError::MalformedSpec`] if a row has an empty id, question or
///   request.
/// - [`SpecError::InvalidId`] if an id is not a non-negative integer.
/// - [`SpecError::DuplicateId`] if two rows normalize to the same id.
/// - [`SpecError::SecurityLimit`] if the table has more than
///   [`LoadConfig::max_rows`] data rows.
pub fn load_specs_reader<R: Read>(reader: R, config: &LoadConfig) -> Result<SpecSet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(if config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| SpecError::MissingColumn(name.to_string()))
    };
    let id_idx = column(&config.id_column)?;
    let question_idx = column(&config.question_column)?;
    let request_idx = column(&config.request_column)?;

    let mut specs = SpecSet::new();
    // Data row of each inserted spec, parallel to insertion order.
    let mut spec_rows: Vec<usize> = Vec::new();

    for (record_idx, result) in csv_reader.records().enumerate() {
        let row = record_idx + 1;
        // Security: Limit row count to prevent memory exhaustion
        if record_idx >= config.max_rows {
            return Err(SpecError::SecurityLimit {
                limit: config.max_rows,
                actual: row,
            });
        }

        let record = result.map_err(|e| SpecError::ParseError {
            line: e.position().map_or(row + 1, |p| p.line() as usize),
            message: e.to_string(),
        })?;

        if record.iter().all(|field| field.trim().is_empty()) {
            debug!("Skipping blank spec row {}", row);
            continue;
        }

        let raw_id = required(&record, id_idx, row, &config.id_column)?;
        let question = required(&record, question_idx, row, &config.question_column)?;
        let request = required(&record, request_idx, row, &config.request_column)?;

        let (number, _) = normalize_id(raw_id).ok_or_else(|| SpecError::InvalidId {
            row,
            value: raw_id.to_string(),
        })?;

        let spec = ExpectedSpec::new(number, question, request);
        let id = spec.id.clone();
        if let Err(existing) = specs.insert(spec) {
            return Err(SpecError::DuplicateId {
                id,
                first_row: spec_rows[existing],
                row,
            });
        }
        spec_rows.push(row);
    }

    debug!("Loaded {} expected specs", specs.len());
    Ok(specs)
}

fn required<'r>(record: &'r csv::StringRecord, idx: usize, row: usize, column: &str) -> Result<&'r str> {
    match record.get(idx).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(SpecError::MalformedSpec {
            row,
            column: column.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "No,Question friendly human,API call\n";

    fn table(rows: &str) -> String {
        format!("{}{}", HEADER, rows)
    }

    #[test]
    fn test_load_config_default() {
        let config = LoadConfig::default();
        assert_eq!(config.delimiter, b',');
        assert!(config.trim);
        assert_eq!(config.max_rows, DEFAULT_MAX_ROWS);
        assert_eq!(config.request_column, "API call");
    }

    #[test]
    fn test_row_order_preserved() {
        let specs = load_specs(&table("10,ten,https://h/10\n2,two,https://h/2\n")).unwrap();
        let ids: Vec<_> = specs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "2"]);
    }

    #[test]
    fn test_columns_found_by_name() {
        let csv = "API call,Notes,No,Question friendly human\nhttps://h/1,ignored,1,one\n";
        let specs = load_specs(csv).unwrap();
        let spec = specs.get("1").unwrap();
        assert_eq!(spec.expected_request, "https://h/1");
        assert_eq!(spec.question, "one");
    }

    #[test]
    fn test_quoted_request_with_commas_and_spaces() {
        let specs = load_specs(&table(
            "1,q,\"https://h/data/2020/acs/acs5?get=NAME,B19013_001E&for=tract:*&in=state:36 county:061\"\n",
        ))
        .unwrap();
        assert!(specs
            .get("1")
            .unwrap()
            .expected_request
            .ends_with("in=state:36 county:061"));
    }

    #[test]
    fn test_missing_column() {
        let err = load_specs("No,API call\n1,https://h/1\n").unwrap_err();
        assert!(matches!(err, SpecError::MissingColumn(ref c) if c == "Question friendly human"));
    }

    #[test]
    fn test_empty_request_is_malformed() {
        let err = load_specs(&table("1,q,\n")).unwrap_err();
        assert!(matches!(
            err,
            SpecError::MalformedSpec { row: 1, ref column } if column == "API call"
        ));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let err = load_specs(&table("1,q,https://h/1\n2,q\n")).unwrap_err();
        assert!(matches!(err, SpecError::MalformedSpec { row: 2, .. }));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let specs = load_specs(&table("1,q,https://h/1\n,,\n2,r,https://h/2\n")).unwrap();
        assert_eq!(specs.len(), 2);
    }

    #[test]
    fn test_duplicate_after_normalization() {
        let err = load_specs(&table("4,a,https://h/a\n5,b,https://h/b\n4.0,c,https://h/c\n")).unwrap_err();
        match err {
            SpecError::DuplicateId { id, first_row, row } => {
                assert_eq!(id, "4");
                assert_eq!(first_row, 1);
                assert_eq!(row, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_id() {
        let err = load_specs(&table("Q1,a,https://h/a\n")).unwrap_err();
        assert!(matches!(err, SpecError::InvalidId { row: 1, ref value } if value == "Q1"));
    }

    #[test]
    fn test_max_rows_limit_enforcement() {
        let config = LoadConfig {
            max_rows: 2,
            ..Default::default()
        };
        let csv = table("1,a,u\n2,b,u\n3,c,u\n");
        let err = load_specs_with_config(&csv, &config).unwrap_err();
        assert!(matches!(err, SpecError::SecurityLimit { limit: 2, actual: 3 }));
    }

    #[test]
    fn test_tab_delimiter() {
        let config = LoadConfig {
            delimiter: b'\t',
            ..Default::default()
        };
        let csv = "No\tQuestion friendly human\tAPI call\n1\tq\thttps://h/1?get=A,B\n";
        let specs = load_specs_with_config(csv, &config).unwrap();
        assert_eq!(specs.get("1").unwrap().expected_request, "https://h/1?get=A,B");
    }

    #[test]
    fn test_header_only() {
        let specs = load_specs(HEADER).unwrap();
        assert!(specs.is_empty());
    }
}
