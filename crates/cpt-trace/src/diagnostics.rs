//! Non-fatal problems collected during a run
//!
//! Local errors (naming conventions, unresolved in-text references,
//! malformed rows) and completeness warnings do not stop processing. They
//! are gathered here and decide the exit status at the end.

use cpt_store::Location;
use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Completeness finding
    Warning,
    /// Local error
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Declaration site of the record concerned, if any
    pub location: Option<Location>,
    /// Message
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Sink for diagnostics across a run
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a local error
    pub fn error(&mut self, location: Option<&Location>, message: impl Into<String>) {
        self.push(Severity::Error, location, message.into());
    }

    /// Record a warning
    pub fn warning(&mut self, location: Option<&Location>, message: impl Into<String>) {
        self.push(Severity::Warning, location, message.into());
    }

    fn push(&mut self, severity: Severity, location: Option<&Location>, message: String) {
        tracing::debug!(%severity, %message, "diagnostic recorded");
        self.entries.push(Diagnostic {
            severity,
            location: location.cloned(),
            message,
        });
    }

    /// Whether nothing was reported
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of diagnostics
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of diagnostics of one severity
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    /// Diagnostics in report order
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Move every diagnostic of `other` into this sink
    pub fn append(&mut self, other: &mut Diagnostics) {
        self.entries.append(&mut other.entries);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
