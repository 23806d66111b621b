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

//! Balanced-brace scanning for embedded payload blocks.
//!
//! Payloads are arbitrary JSON objects, so a fixed-depth pattern cannot find
//! where they end. The scanner walks byte by byte from the opening brace,
//! tracking nesting depth and JSON string state, and stops at the brace
//! that brings the depth back to zero.

use crate::error::{PayloadError, Result};

/// Find the end of the brace block that opens at `open`.
///
/// Scans `bytes[open..limit]` and returns the offset one past the matching
/// closing brace. Braces inside double-quoted strings are ignored, and a
/// backslash escapes the next byte inside a string.
///
/// # Errors
///
/// - [`PayloadError::NotABlock`] if `bytes[open]` is not `{` or lies at or
///   past `limit`.
/// - [`PayloadError::Unterminated`] if `limit` is reached with the block
///   still open.
/// - [`PayloadError::TooDeep`] if nesting exceeds `max_depth`.
///
/// # Examples
///
/// ```
/// use geoaudit_core::find_block_end;
///
/// let text = br#"x {"a": {"b": "}"}} tail"#;
/// let end = find_block_end(text, 2, text.len(), 64).unwrap();
/// assert_eq!(&text[2..end], br#"{"a": {"b": "}"}}"#);
/// ```
pub fn find_block_end(bytes: &[u8], open: usize, limit: usize, max_depth: usize) -> Result<usize> {
    let limit = limit.min(bytes.len());
    if open >= limit || bytes[open] != b'{' {
        return Err(PayloadError::NotABlock { offset: open });
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (pos, &b) in bytes.iter().enumerate().take(limit).skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => {
                depth += 1;
                if depth > max_depth {
                    return Err(PayloadError::TooDeep { max: max_depth });
                }
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos + 1);
                }
            }
            _ => {}
        }
    }

    Err(PayloadError::Unterminated { open })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str, open: usize) -> Result<&str> {
        let end = find_block_end(text.as_bytes(), open, text.len(), 64)?;
        Ok(&text[open..end])
    }

    #[test]
    fn test_flat_block() {
        assert_eq!(block(r#"{"a": 1} rest"#, 0).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_nested_blocks() {
        let text = r#"{"geo_in": {"state": "36", "county": {"x": {}}}} after"#;
        assert_eq!(
            block(text, 0).unwrap(),
            r#"{"geo_in": {"state": "36", "county": {"x": {}}}}"#
        );
    }

    #[test]
    fn test_braces_inside_strings() {
        let text = r#"{"note": "use {curly} and }"} tail"#;
        assert_eq!(block(text, 0).unwrap(), r#"{"note": "use {curly} and }"}"#);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let text = r#"{"q": "say \"}\" now"} tail"#;
        assert_eq!(block(text, 0).unwrap(), r#"{"q": "say \"}\" now"}"#);
    }

    #[test]
    fn test_escaped_backslash_ends_escape() {
        let text = r#"{"p": "C:\\"} tail"#;
        assert_eq!(block(text, 0).unwrap(), r#"{"p": "C:\\"}"#);
    }

    #[test]
    fn test_unterminated() {
        let text = r#"{"dataset": "acs/acs1", "geo_for": {"state": "36""#;
        assert_eq!(block(text, 0), Err(PayloadError::Unterminated { open: 0 }));
    }

    #[test]
    fn test_limit_truncates_block() {
        let text = r#"{"a": 1}"#;
        let err = find_block_end(text.as_bytes(), 0, 5, 64).unwrap_err();
        assert_eq!(err, PayloadError::Unterminated { open: 0 });
    }

    #[test]
    fn test_too_deep() {
        let text = "{{{{}}}}";
        let err = find_block_end(text.as_bytes(), 0, text.len(), 3).unwrap_err();
        assert_eq!(err, PayloadError::TooDeep { max: 3 });
    }

    #[test]
    fn test_non_brace_open_is_an_error() {
        let text = r#"x {"a": 1}"#;
        let err = find_block_end(text.as_bytes(), 0, text.len(), 64).unwrap_err();
        assert_eq!(err, PayloadError::NotABlock { offset: 0 });
    }

    #[test]
    fn test_open_past_limit_is_an_error() {
        let text = r#"{"a": 1}"#;
        assert_eq!(
            find_block_end(text.as_bytes(), 0, 0, 64),
            Err(PayloadError::NotABlock { offset: 0 })
        );
        assert_eq!(
            find_block_end(text.as_bytes(), 40, text.len(), 64),
            Err(PayloadError::NotABlock { offset: 40 })
        );
        assert_eq!(
            find_block_end(b"", 0, 10, 64),
            Err(PayloadError::NotABlock { offset: 0 })
        );
    }

    #[test]
    fn test_open_offset_is_respected() {
        let text = r#"prefix {"x": [1, 2]} suffix"#;
        assert_eq!(block(text, 7).unwrap(), r#"{"x": [1, 2]}"#);
    }
}
