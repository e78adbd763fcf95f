//! One invocation: load, check, render, write

use crate::config::HandbookConfig;
use crate::output::{self, Destination, Output};
use anyhow::{anyhow, bail, Context, Result};
use clap::ArgMatches;
use cpt_render::{Document, Format, Priority, RenderFilter, Renderer};
use cpt_store::schema::SCOPE;
use cpt_store::RecordStore;
use cpt_trace::{CompletenessChecker, Diagnostics, NameTable, Resolver};
use std::path::PathBuf;

/// Everything an invocation needs
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Document to render, `None` to only check
    pub document: Option<Document>,
    /// Record files in load order
    pub files: Vec<PathBuf>,
    /// Configuration
    pub config: HandbookConfig,
    /// Output markup
    pub format: Format,
    /// Item filter
    pub filter: RenderFilter,
    /// Output destination
    pub destination: Destination,
}

impl Invocation {
    /// Check-only invocation over `files` with default settings
    #[must_use]
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            document: None,
            files,
            config: HandbookConfig::default(),
            format: Format::Rst,
            filter: RenderFilter::new(),
            destination: Destination::Stdout,
        }
    }

    /// Invocation described by parsed command line arguments
    ///
    /// # Errors
    /// Fails on an unreadable configuration or an unknown scope.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let Some((name, args)) = matches.subcommand() else {
            bail!("no subcommand given");
        };
        let document = match name {
            "check" => None,
            "checklist" => Some(Document::Checklist),
            "worklist" => Some(Document::Worklist),
            "template" => Some(Document::ChecklistTemplate),
            "assumptions" => Some(Document::Assumptions),
            "clauses" => Some(Document::Clauses {
                emit_steps: !args.get_flag("no-steps"),
            }),
            "constraints" => Some(Document::Constraints),
            other => bail!("unknown subcommand '{other}'"),
        };

        let mut invocation = Self::new(
            args.get_many::<PathBuf>("files")
                .map(|files| files.cloned().collect())
                .unwrap_or_default(),
        );
        invocation.document = document;

        if let Some(path) = args.get_one::<PathBuf>("config") {
            invocation.config = HandbookConfig::load(path)?;
        }

        let optional = |id: &str| args.try_get_one::<String>(id).ok().flatten();
        invocation.format = match optional("format") {
            Some(format) => format.parse().map_err(anyhow::Error::msg)?,
            None if document == Some(Document::ChecklistTemplate) => Format::Markdown,
            None => Format::Rst,
        };
        if let Some(priority) = optional("min-priority") {
            invocation.filter.min_priority =
                priority.parse::<Priority>().map_err(anyhow::Error::msg)?;
        }
        if let Some(scope) = optional("scope") {
            let literal = SCOPE
                .resolve(scope)
                .ok_or_else(|| anyhow!("unknown scope '{scope}'"))?;
            invocation.filter.scope = Some(literal.to_string());
        }

        let path = |id: &str| args.try_get_one::<PathBuf>(id).ok().flatten().cloned();
        invocation.destination = match (path("out-dir"), path("out")) {
            (Some(dir), _) => Destination::Directory(dir),
            (None, Some(file)) => Destination::File(file),
            (None, None) => Destination::Stdout,
        };
        Ok(invocation)
    }
}

/// Result of a completed invocation
#[derive(Debug)]
pub struct Outcome {
    /// Local errors and warnings, in the order found
    pub diagnostics: Diagnostics,
    /// Number of completeness violations among the diagnostics
    pub violations: usize,
    /// Files written
    pub written: Vec<PathBuf>,
}

impl Outcome {
    /// Whether the run found no problem at all
    #[must_use]
    pub fn success(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Run an invocation
///
/// Nothing is written unless the store loads and every anchor is unique.
/// Outputs are written only once every artifact has been rendered.
///
/// # Errors
/// Fails on an invalid store, duplicate anchors or write failures.
pub fn run(invocation: &Invocation) -> Result<Outcome> {
    let store = RecordStore::load(&invocation.files).context("cannot load record files")?;
    let mut diagnostics = Diagnostics::new();
    let names = NameTable::build(&store, &mut diagnostics)?;
    let resolver = Resolver::new(&store);

    let violations = CompletenessChecker::new(&resolver).check_all(&invocation.config.obligations);
    CompletenessChecker::report(&violations, &mut diagnostics);

    let mut outputs = Vec::new();
    if let Some(document) = invocation.document {
        let render = &invocation.config.render;
        let dialect = invocation.format.dialect(render.pages_base_url.as_deref());
        let renderer = Renderer::new(&names, &resolver, render);
        for artifact in renderer.render(document, &invocation.filter, dialect.as_ref(), &mut diagnostics) {
            match output::target_for(artifact.kind, &invocation.destination, dialect.extension()) {
                Some(target) => outputs.push(Output {
                    target,
                    content: artifact.content,
                }),
                None => tracing::debug!(kind = ?artifact.kind, "artifact has no destination"),
            }
        }
    }

    let written = output::emit(&outputs)?;
    Ok(Outcome {
        diagnostics,
        violations: violations.len(),
        written,
    })
}
