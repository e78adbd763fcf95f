//! Typed records held by the store

use crate::schema::Category;
use indexmap::IndexMap;
use std::fmt;

/// Stable key of a record inside one store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub(crate) u32);

impl RecordId {
    /// Declaration position across the whole store
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declaration site of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// File the record was read from
    pub file: String,
    /// 1-based line of the record's name, `None` when it could not be found
    pub line: Option<usize>,
}

impl Location {
    /// Create location
    #[inline]
    #[must_use]
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
        }
    }

    /// Location known only by its file
    #[inline]
    #[must_use]
    pub fn in_file(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
        }
    }

    /// File name without directory and extension
    #[must_use]
    pub fn file_stem(&self) -> &str {
        let base = self.file.rsplit(['/', '\\']).next().unwrap_or(&self.file);
        base.split_once('.').map_or(base, |(stem, _)| stem)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.file),
            None => f.write_str(&self.file),
        }
    }
}

/// Resolved enumeration literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumLiteral {
    /// Enumeration type name
    pub enumeration: &'static str,
    /// Literal
    pub literal: &'static str,
}

impl fmt::Display for EnumLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal)
    }
}

/// Validated field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Absent optional field or tuple member
    Null,
    /// Text
    Str(String),
    /// Integer
    Int(i64),
    /// Flag
    Bool(bool),
    /// Enumeration literal
    Enum(EnumLiteral),
    /// Resolved reference
    Ref(RecordId),
    /// Placeholder accepted instead of a reference (`ALL`, `VARIOUS`)
    Wildcard(&'static str),
    /// Named members of a tuple field
    Tuple(IndexMap<&'static str, FieldValue>),
    /// Ordered values
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Absent value
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text content
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Boolean content
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Enumeration literal
    #[must_use]
    pub fn as_enum(&self) -> Option<&'static str> {
        match self {
            Self::Enum(e) => Some(e.literal),
            _ => None,
        }
    }

    /// Referenced record
    #[must_use]
    pub fn as_record(&self) -> Option<RecordId> {
        match self {
            Self::Ref(id) => Some(*id),
            _ => None,
        }
    }

    /// Wildcard placeholder
    #[must_use]
    pub fn as_wildcard(&self) -> Option<&'static str> {
        match self {
            Self::Wildcard(w) => Some(w),
            _ => None,
        }
    }

    /// List items; null reads as an empty list
    #[must_use]
    pub fn items(&self) -> &[FieldValue] {
        match self {
            Self::List(items) => items,
            Self::Null => &[],
            other => std::slice::from_ref(other),
        }
    }

    /// Tuple member, null when absent
    #[must_use]
    pub fn member(&self, name: &str) -> &FieldValue {
        match self {
            Self::Tuple(members) => members.get(name).unwrap_or(&FieldValue::Null),
            _ => &FieldValue::Null,
        }
    }

    /// Every reference held by this value, in order
    #[must_use]
    pub fn references(&self) -> Vec<RecordId> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<RecordId>) {
        match self {
            Self::Ref(id) => out.push(*id),
            Self::List(items) => items.iter().for_each(|v| v.collect_references(out)),
            Self::Tuple(members) => members.values().for_each(|v| v.collect_references(out)),
            _ => {}
        }
    }
}

/// One validated record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Store key
    pub id: RecordId,
    /// Category
    pub category: Category,
    /// Unique name within the category
    pub name: String,
    /// Declaration site
    pub location: Location,
    /// Every schema field in schema order; absent optional fields are null
    pub fields: IndexMap<&'static str, FieldValue>,
}

impl Record {
    /// Field value, null when the schema has no such field
    #[must_use]
    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&FieldValue::Null)
    }

    /// Text field
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).as_str()
    }

    /// Boolean field, false when absent
    #[must_use]
    pub fn flag(&self, field: &str) -> bool {
        self.get(field).as_bool().unwrap_or(false)
    }

    /// Enumeration field
    #[must_use]
    pub fn literal(&self, field: &str) -> Option<&'static str> {
        self.get(field).as_enum()
    }
}
