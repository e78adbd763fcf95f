//! Untyped records as decoded from a record file, before schema validation

use crate::record::Location;
use indexmap::IndexMap;

/// Format-neutral decoded value
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Text (non-integer numbers arrive here in their textual form)
    Str(String),
    /// Sequence
    List(Vec<RawValue>),
    /// Mapping with string keys
    Map(IndexMap<String, RawValue>),
}

impl RawValue {
    /// Short type name for error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "mapping",
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

/// Record before validation
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Category tag as written
    pub category: String,
    /// Record name as written
    pub name: String,
    /// Declaration site
    pub location: Location,
    /// Remaining keys in file order
    pub fields: IndexMap<String, RawValue>,
}

impl RawRecord {
    /// Create record without fields
    #[inline]
    #[must_use]
    pub fn new(category: impl Into<String>, name: impl Into<String>, location: Location) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            location,
            fields: IndexMap::new(),
        }
    }

    /// Add a field
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }
}
