//! Record file parsers
//!
//! Decode record files into [`RawRecord`]s:
//! - YAML record files via serde_yaml
//! - JSON record files via serde_json
//!
//! Parsers only check the document shape. Schema validation happens once, in
//! [`crate::RecordStoreBuilder::build`].

use crate::error::ParseError;
use crate::raw::{RawRecord, RawValue};
use crate::record::Location;
use std::path::Path;

mod json;
mod yaml;

pub use json::JsonParser;
pub use yaml::YamlParser;

/// Parser trait for decoding record files
///
/// Implement this trait to add support for new file formats.
pub trait RecordParser: Send + Sync + 'static {
    /// Decode file content; `path` is used for locations and messages
    ///
    /// # Errors
    /// Returns [`ParseError`] on syntax errors or an unexpected document shape.
    fn parse(&self, path: &Path, content: &str) -> Result<Vec<RawRecord>, ParseError>;

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this parser can handle the given path
    fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }

    /// Parser priority (higher = tried first when multiple parsers match)
    fn priority(&self) -> i32 {
        0
    }
}

/// Parser registration for dynamic parser management
pub struct ParserRegistry {
    parsers: Vec<Box<dyn RecordParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parser_count", &self.parsers.len())
            .field("extensions", &self.all_extensions())
            .finish()
    }
}

impl ParserRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Register a parser
    pub fn register<P: RecordParser>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
        self.parsers.sort_by_key(|p| std::cmp::Reverse(p.priority()));
    }

    /// Find parser for path
    #[must_use]
    pub fn find_for_path(&self, path: &Path) -> Option<&dyn RecordParser> {
        self.parsers.iter().find(|p| p.can_parse(path)).map(|p| &**p)
    }

    /// Get all registered extensions
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&str> {
        self.parsers
            .iter()
            .flat_map(|p| p.extensions())
            .copied()
            .collect()
    }

    /// Read and decode one record file
    ///
    /// # Errors
    /// Fails if no parser handles the extension, the file cannot be read, or
    /// the parser rejects its content.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<RawRecord>, ParseError> {
        let parser = self
            .find_for_path(path)
            .ok_or_else(|| ParseError::NoParserForExtension {
                path: path.to_path_buf(),
            })?;
        let content =
            std::fs::read_to_string(path).map_err(|e| ParseError::io_error(path, e))?;
        parser.parse(path, &content)
    }
}

/// Create default parser registry with built-in parsers
#[inline]
#[must_use]
pub fn default_parsers() -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    registry.register(YamlParser);
    registry.register(JsonParser);
    registry
}

/// Split a decoded document into raw records
///
/// A document is either a sequence of records, or a mapping with an optional
/// `package` key and a `records` sequence. Each record names its `category`
/// and `name`; every other key is a field.
///
/// `lines` holds the declaring line of each record as located by the
/// parser. When its length disagrees with the decoded records, no line is
/// trusted and locations name the file only.
fn records_from_document(
    path: &Path,
    document: RawValue,
    lines: &[usize],
) -> Result<Vec<RawRecord>, ParseError> {
    let entries = match document {
        RawValue::Null => return Ok(Vec::new()),
        RawValue::List(entries) => entries,
        RawValue::Map(mut map) => {
            map.shift_remove("package");
            let entries = match map.shift_remove("records") {
                Some(RawValue::List(entries)) => entries,
                Some(RawValue::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(ParseError::structure(
                        path,
                        format!("'records' must be a list, found {}", other.kind()),
                    ))
                }
            };
            if let Some(key) = map.keys().next() {
                return Err(ParseError::structure(path, format!("unexpected key '{key}'")));
            }
            entries
        }
        other => {
            return Err(ParseError::structure(
                path,
                format!("expected a list of records, found {}", other.kind()),
            ))
        }
    };

    let file = path.display().to_string();
    let lines = if lines.len() == entries.len() { lines } else { &[] };
    if lines.is_empty() && !entries.is_empty() {
        tracing::debug!(file = %file, "record lines not located");
    }
    let mut out = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let RawValue::Map(mut fields) = entry else {
            return Err(ParseError::structure(
                path,
                format!("record {} is not a mapping", index + 1),
            ));
        };
        let category = take_text(path, index, &mut fields, "category")?;
        let name = take_text(path, index, &mut fields, "name")?;

        let location = match lines.get(index) {
            Some(&line) => Location::new(file.clone(), line),
            None => Location::in_file(file.clone()),
        };

        out.push(RawRecord {
            category,
            name,
            location,
            fields,
        });
    }
    Ok(out)
}

fn take_text(
    path: &Path,
    index: usize,
    fields: &mut indexmap::IndexMap<String, RawValue>,
    key: &str,
) -> Result<String, ParseError> {
    match fields.shift_remove(key) {
        Some(RawValue::Str(s)) => Ok(s),
        Some(other) => Err(ParseError::structure(
            path,
            format!("record {}: '{key}' must be a string, found {}", index + 1, other.kind()),
        )),
        None => Err(ParseError::structure(
            path,
            format!("record {}: missing '{key}'", index + 1),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestParser;

    impl RecordParser for TestParser {
        fn parse(&self, path: &Path, _content: &str) -> Result<Vec<RawRecord>, ParseError> {
            Ok(vec![RawRecord::new(
                "process_step",
                "only",
                Location::new(path.display().to_string(), 1),
            )])
        }

        fn extensions(&self) -> &[&str] {
            &["test"]
        }

        fn priority(&self) -> i32 {
            10
        }
    }

    #[test]
    fn parser_can_parse_by_extension() {
        let parser = TestParser;

        assert!(parser.can_parse(Path::new("file.test")));
        assert!(parser.can_parse(Path::new("/path/to/file.test")));
        assert!(!parser.can_parse(Path::new("file.txt")));
        assert!(!parser.can_parse(Path::new("test")));
    }

    #[test]
    fn registry_prefers_higher_priority() {
        let mut registry = default_parsers();
        registry.register(TestParser);

        assert_eq!(registry.all_extensions()[0], "test");
        assert!(registry.find_for_path(Path::new("a.yml")).is_some());
        assert!(registry.find_for_path(Path::new("a.json")).is_some());
        assert!(registry.find_for_path(Path::new("a.csv")).is_none());
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let err = default_parsers()
            .parse_file(Path::new("records.csv"))
            .unwrap_err();
        assert!(matches!(err, ParseError::NoParserForExtension { .. }));
    }

    #[test]
    fn records_mapping_rejects_stray_keys() {
        let mut map = indexmap::IndexMap::new();
        map.insert("records".to_string(), RawValue::List(Vec::new()));
        map.insert("extra".to_string(), RawValue::Bool(true));
        let err = records_from_document(Path::new("x.yaml"), RawValue::Map(map), &[]).unwrap_err();
        assert_eq!(err.to_string(), "malformed record file x.yaml: unexpected key 'extra'");
    }
}
