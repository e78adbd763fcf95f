//! YAML record file parser

use super::{records_from_document, RecordParser};
use crate::error::ParseError;
use crate::raw::{RawRecord, RawValue};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use std::path::Path;

static NAME_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^["']?name["']?\s*:(?:\s|$)"#).expect("yaml name pattern is valid"));

/// Value introducing a literal or folded block scalar
static BLOCK_SCALAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|:\s|-\s)\s*[|>][0-9+-]*\s*(?:#.*)?$").expect("block scalar pattern is valid")
});

/// Parser for `.yaml` / `.yml` record files
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl RecordParser for YamlParser {
    fn parse(&self, path: &Path, content: &str) -> Result<Vec<RawRecord>, ParseError> {
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| ParseError::syntax_error(path, e.to_string()))?;
        let document = to_raw(path, value)?;
        records_from_document(path, document, &record_lines(content))
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Declaring line of each record, in file order
///
/// Records are the items of the top-level sequence or of the top-level
/// `records` sequence, all at one indentation. A record is declared on the
/// line of its own `name` key, or on its item line when it has none at the
/// record's key column (flow style). Block scalar content is skipped.
fn record_lines(content: &str) -> Vec<usize> {
    let mut lines = Vec::new();
    let mut in_records = true;
    let mut item_indent = None;
    // Item line and key column of the record whose name is still unseen
    let mut pending: Option<(usize, Option<usize>)> = None;
    let mut block = None;

    for (index, raw) in content.lines().enumerate() {
        let number = index + 1;
        let text = raw.trim_start_matches(' ');
        let indent = raw.len() - text.len();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        if let Some(threshold) = block {
            if indent > threshold {
                continue;
            }
            block = None;
        }
        if indent == 0 && (text.starts_with("---") || text.starts_with("...")) {
            continue;
        }
        if indent == 0 && !is_item(text) {
            in_records = text.starts_with("records:");
            item_indent = None;
            lines.extend(pending.take().map(|(line, _)| line));
            continue;
        }
        if !in_records {
            continue;
        }

        let rest = if is_item(text) { text[1..].trim_start_matches(' ') } else { text };
        let column = indent + (text.len() - rest.len());
        if is_item(text) && (item_indent.is_none() || item_indent == Some(indent)) {
            item_indent = Some(indent);
            lines.extend(pending.take().map(|(line, _)| line));
            if NAME_KEY.is_match(rest) {
                lines.push(number);
            } else if rest.is_empty() {
                pending = Some((number, None));
            } else {
                pending = Some((number, Some(column)));
            }
        } else if let Some((line, key_column)) = pending {
            let key_column = key_column.unwrap_or(column);
            if column == key_column && !is_item(text) && NAME_KEY.is_match(rest) {
                lines.push(number);
                pending = None;
            } else {
                pending = Some((line, Some(key_column)));
            }
        }

        if BLOCK_SCALAR.is_match(rest) {
            block = Some(if rest.starts_with(['|', '>']) { indent } else { column });
        }
    }
    lines.extend(pending.map(|(line, _)| line));
    lines
}

/// Whether a line, stripped of indentation, starts a sequence item
fn is_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

fn to_raw(path: &Path, value: Value) -> Result<RawValue, ParseError> {
    Ok(match value {
        Value::Null => RawValue::Null,
        Value::Bool(b) => RawValue::Bool(b),
        Value::Number(n) => n
            .as_i64()
            .map_or_else(|| RawValue::Str(n.to_string()), RawValue::Int),
        Value::String(s) => RawValue::Str(s),
        Value::Sequence(items) => RawValue::List(
            items
                .into_iter()
                .map(|v| to_raw(path, v))
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(map) => {
            let mut out = indexmap::IndexMap::with_capacity(map.len());
            for (key, v) in map {
                let key = match key {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(ParseError::structure(
                            path,
                            format!("unsupported mapping key {other:?}"),
                        ))
                    }
                };
                out.insert(key, to_raw(path, v)?);
            }
            RawValue::Map(out)
        }
        Value::Tagged(tagged) => to_raw(path, tagged.value)?,
    })
}
