//! Error types for the record store
//!
//! Provides error handling for:
//! - Parse operations (record file → raw records)
//! - Store validation (raw records → typed store)
//! - Field access on a loaded store

use crate::record::Location;
use crate::schema::Category;
use std::fmt;
use std::path::PathBuf;

/// Errors while reading a record file
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No parser registered for the file extension
    #[error("no parser registered for {path}")]
    NoParserForExtension {
        /// Offending file
        path: PathBuf,
    },

    /// Syntax error reported by the underlying format library
    #[error("syntax error in {path}: {message}")]
    SyntaxError {
        /// Offending file
        path: PathBuf,
        /// Message from the format library
        message: String,
    },

    /// Syntactically valid file with the wrong document shape
    #[error("malformed record file {path}: {message}")]
    Structure {
        /// Offending file
        path: PathBuf,
        /// What was expected
        message: String,
    },

    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Create syntax error for path
    pub fn syntax_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create structure error for path
    pub fn structure(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Structure {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// One schema problem found while building the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Declaration site of the offending record
    pub location: Location,
    /// Human-readable description
    pub message: String,
}

impl SchemaViolation {
    /// Create a violation at a location
    #[inline]
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Errors that leave the store unusable
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record file could not be read
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Records were read but do not satisfy the schema
    #[error("record store is invalid: {} schema violation(s)", violations.len())]
    Invalid {
        /// Every violation found, in declaration order
        violations: Vec<SchemaViolation>,
    },
}

impl StoreError {
    /// Schema violations carried by this error, empty for parse errors
    #[must_use]
    pub fn violations(&self) -> &[SchemaViolation] {
        match self {
            Self::Invalid { violations } => violations,
            Self::Parse(_) => &[],
        }
    }
}

/// Errors when reading fields from a loaded store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The category's schema declares no such field
    #[error("{category} records have no field '{field}'")]
    MissingField {
        /// Category of the record
        category: Category,
        /// Requested field name
        field: String,
    },

    /// A non-reference value was dereferenced
    #[error("value is not a record reference")]
    NotAReference,
}
