//! Document renderers
//!
//! Each document walks one category in declaration order and builds
//! [`Fragment`]s, which the chosen [`Dialect`] then writes out.

mod assumptions;
mod checklist;
mod clauses;
mod constraints;

pub use assumptions::{NOT_TRACED, PROCESS_ASSUMPTIONS};

use crate::body::{BodyText, Linker};
use crate::config::RenderConfig;
use crate::dialect::Dialect;
use crate::filter::RenderFilter;
use crate::markup::{Fragment, Inline};
use cpt_store::{Record, RecordStore};
use cpt_trace::{Diagnostics, NameTable, Resolver};
use std::fmt;

/// Document kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    /// Checklist items with metadata tables
    Checklist,
    /// Numbered worklist items
    Worklist,
    /// Fill-in checklist grouped by section
    ChecklistTemplate,
    /// Assumptions and their tracing, one artifact per kind
    Assumptions,
    /// Standard-clause tracing entries
    Clauses {
        /// Whether to list the process steps applying to each clause
        emit_steps: bool,
    },
    /// Switch and rule constraints grouped by tool
    Constraints,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Checklist => "checklist",
            Self::Worklist => "worklist",
            Self::ChecklistTemplate => "checklist template",
            Self::Assumptions => "assumptions",
            Self::Clauses { .. } => "clause tracing",
            Self::Constraints => "constraints",
        })
    }
}

/// Role of an artifact within its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The document itself
    Main,
    /// Assumptions of one kind
    AssumptionKind(&'static str),
    /// Clause labels without subreference, one per line
    Sections,
    /// Clause text as written, one entry after the other
    Verbatim,
}

/// One rendered output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Role
    pub kind: ArtifactKind,
    /// Rendered text
    pub content: String,
}

/// Renders documents from a store and its derived names
pub struct Renderer<'a, 's> {
    store: &'s RecordStore,
    names: &'a NameTable,
    resolver: &'a Resolver<'s>,
    config: &'a RenderConfig,
}

impl<'a, 's> Renderer<'a, 's> {
    /// Create renderer
    #[inline]
    #[must_use]
    pub fn new(names: &'a NameTable, resolver: &'a Resolver<'s>, config: &'a RenderConfig) -> Self {
        Self {
            store: resolver.store(),
            names,
            resolver,
            config,
        }
    }

    /// Render a document to fragments
    ///
    /// Local problems (unresolved references, malformed rows) go to
    /// `diagnostics`; the affected output is still produced.
    pub fn fragments(
        &self,
        document: Document,
        filter: &RenderFilter,
        diagnostics: &mut Diagnostics,
    ) -> Vec<(ArtifactKind, Fragment)> {
        let fragments = match document {
            Document::Checklist => vec![(ArtifactKind::Main, self.checklist(filter, diagnostics))],
            Document::Worklist => vec![(ArtifactKind::Main, self.worklist(filter, diagnostics))],
            Document::ChecklistTemplate => {
                vec![(ArtifactKind::Main, self.template(filter, diagnostics))]
            }
            Document::Assumptions => self.assumptions(diagnostics),
            Document::Clauses { emit_steps } => self.clauses(emit_steps, diagnostics),
            Document::Constraints => vec![(ArtifactKind::Main, self.constraints(diagnostics))],
        };
        tracing::debug!(%document, artifacts = fragments.len(), "document rendered");
        fragments
    }

    /// Render a document to text
    pub fn render(
        &self,
        document: Document,
        filter: &RenderFilter,
        dialect: &dyn Dialect,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Artifact> {
        self.fragments(document, filter, diagnostics)
            .into_iter()
            .map(|(kind, fragment)| Artifact {
                kind,
                content: dialect.render(&fragment),
            })
            .collect()
    }

    fn linker(&self) -> Linker<'a> {
        Linker::new(self.store, self.names)
    }

    fn body(&self, record: &Record, text: &str, diagnostics: &mut Diagnostics) -> Vec<Inline> {
        BodyText::new(self.linker(), &self.config.roles).resolve(record, text, diagnostics)
    }

    fn scope<'r>(&'r self, record: &'r Record) -> &'r str {
        record
            .literal("scope")
            .map_or("", |scope| self.config.scope_description(scope))
    }
}

/// `Yes` or `No`
fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Lines of a text field as plain text
fn verbatim(text: &str) -> Vec<Inline> {
    text.lines().map(Inline::text).collect()
}
