//! JSON record file parser

use super::{records_from_document, RecordParser};
use crate::error::ParseError;
use crate::raw::{RawRecord, RawValue};
use serde_json::Value;
use std::path::Path;

/// Parser for `.json` record files
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl RecordParser for JsonParser {
    fn parse(&self, path: &Path, content: &str) -> Result<Vec<RawRecord>, ParseError> {
        let value: Value = serde_json::from_str(content).map_err(|e| {
            ParseError::syntax_error(path, format!("{e} at line {}", e.line()))
        })?;
        records_from_document(path, to_raw(value), &record_lines(content))
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}

/// Declaring line of each record, in file order
///
/// Records are the objects of the top-level array or of the top-level
/// `records` array. A record is declared on the line of its own `name` key,
/// or on the line of its opening brace when it has none.
fn record_lines(content: &str) -> Vec<usize> {
    let mut lines = Vec::new();
    let mut line = 1;
    let mut open = Vec::new();
    let mut record_depth = None;
    let mut top_key = None;
    let mut last_string: Option<(String, usize)> = None;
    // Opening line of the record whose name is still unseen
    let mut pending = None;

    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            '"' => {
                let start = line;
                let mut text = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => break,
                        '\n' => line += 1,
                        c => text.push(c),
                    }
                }
                last_string = Some((text, start));
            }
            ':' => {
                if let Some((key, key_line)) = last_string.take() {
                    if Some(open.len()) == record_depth && key == "name" && pending.take().is_some() {
                        lines.push(key_line);
                    }
                    if open == ['{'] {
                        top_key = Some(key);
                    }
                }
            }
            '[' | '{' => {
                if c == '[' && open.is_empty() {
                    record_depth = Some(2);
                } else if c == '[' && open == ['{'] && top_key.as_deref() == Some("records") {
                    record_depth = Some(3);
                }
                open.push(c);
                if c == '{' && Some(open.len()) == record_depth {
                    pending = Some(line);
                }
            }
            ']' | '}' => {
                if c == '}' && Some(open.len()) == record_depth {
                    lines.extend(pending.take());
                }
                open.pop();
            }
            _ => {}
        }
    }
    lines
}

fn to_raw(value: Value) -> RawValue {
    match value {
        Value::Null => RawValue::Null,
        Value::Bool(b) => RawValue::Bool(b),
        Value::Number(n) => n
            .as_i64()
            .map_or_else(|| RawValue::Str(n.to_string()), RawValue::Int),
        Value::String(s) => RawValue::Str(s),
        Value::Array(items) => RawValue::List(items.into_iter().map(to_raw).collect()),
        Value::Object(map) => RawValue::Map(map.into_iter().map(|(k, v)| (k, to_raw(v))).collect()),
    }
}
