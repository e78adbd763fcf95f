//! Body text resolution
//!
//! Record bodies are written with a small set of reStructuredText roles.
//! Each line is turned into [`Inline`] spans by three passes, each one only
//! looking at the plain text the earlier passes left:
//!
//! 1. `:ref:` roles and `[[Pkg.Name]]` assumption links become internal links
//! 2. configured standard-reference roles (`:lrm:` and friends) become
//!    external links
//! 3. `` `text <url>`_ `` becomes a link and ` ``code`` ` a literal

use crate::config::RoleTemplate;
use crate::markup::{Inline, LinkTarget, Span};
use cpt_store::{Category, FieldValue, Record, RecordStore};
use cpt_trace::naming::humanize;
use cpt_trace::{Diagnostics, NameTable};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static REF_ROLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":ref:`([^`<]*?)\s*(?:<([^`>]+)>)?`").expect("ref role pattern is valid")
});

static ASSUMPTION_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([A-Za-z][A-Za-z0-9_.]*)\]\]").expect("assumption link pattern is valid")
});

static ROLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":([A-Za-z][A-Za-z0-9_-]*):`([^`]*)`").expect("role pattern is valid")
});

static HYPERLINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"`([^`<]*?)\s*<([^`>]+)>`_").expect("hyperlink pattern is valid")
});

static LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"``([^`]+)``").expect("literal pattern is valid"));

/// Builds links to records
#[derive(Debug, Clone, Copy)]
pub struct Linker<'a> {
    store: &'a RecordStore,
    names: &'a NameTable,
}

impl<'a> Linker<'a> {
    /// Create linker
    #[inline]
    #[must_use]
    pub fn new(store: &'a RecordStore, names: &'a NameTable) -> Self {
        Self { store, names }
    }

    /// Link to a record, `None` if the record has no anchor
    ///
    /// Process steps carry the page they are documented on.
    #[must_use]
    pub fn link(&self, record: &Record, label: impl Into<String>) -> Option<Span> {
        let anchor = self.names.anchor_for(record)?;
        let page = match record.category {
            Category::ProcessStep => record.text("page").map(str::to_string),
            _ => None,
        };
        Some(Span::Link {
            label: label.into(),
            target: LinkTarget::Internal {
                anchor: anchor.to_string(),
                page,
            },
        })
    }

    /// Link labelled with the record name
    #[must_use]
    pub fn named(&self, record: &Record) -> Option<Span> {
        self.link(record, record.name.clone())
    }

    /// Link labelled with the derived label
    #[must_use]
    pub fn labelled(&self, record: &Record) -> Option<Span> {
        let label = self.names.label_for(record)?;
        self.link(record, label)
    }

    /// Step reference: a link, or `(All)`/`(Various)` for wildcards
    #[must_use]
    pub fn step(&self, value: &FieldValue) -> Option<Inline> {
        if let Some(wildcard) = value.as_wildcard() {
            return Some(Inline::span(Span::Emphasis(format!("({})", humanize(wildcard)))));
        }
        let id = value.as_record()?;
        self.named(self.store.record(id)).map(Inline::span)
    }

    fn resolve_anchor(&self, anchor: &str) -> Option<&'a Record> {
        self.names
            .lookup_anchor(anchor)
            .map(|id| self.store.record(id))
    }

    fn resolve_assumption(&self, path: &str) -> Option<&'a Record> {
        let name = path.rsplit('.').next().unwrap_or(path);
        self.store.lookup(Category::Assumption, name)
    }

    fn default_label(&self, record: &Record) -> String {
        let label = self.names.label_for(record).unwrap_or(&record.name);
        match record.category {
            Category::ProcessStep => format!("Step {label}"),
            _ => label.to_string(),
        }
    }
}

/// Resolves record bodies into spans
#[derive(Debug, Clone, Copy)]
pub struct BodyText<'a> {
    linker: Linker<'a>,
    roles: &'a IndexMap<String, RoleTemplate>,
}

impl<'a> BodyText<'a> {
    /// Create resolver
    #[inline]
    #[must_use]
    pub fn new(linker: Linker<'a>, roles: &'a IndexMap<String, RoleTemplate>) -> Self {
        Self { linker, roles }
    }

    /// Resolve `text` of `record`, one [`Inline`] per line
    ///
    /// Unresolved references are reported as errors against the record and
    /// kept as written.
    pub fn resolve(
        &self,
        record: &Record,
        text: &str,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Inline> {
        text.lines()
            .map(|line| self.resolve_line(record, line, diagnostics))
            .collect()
    }

    fn resolve_line(&self, record: &Record, line: &str, diagnostics: &mut Diagnostics) -> Inline {
        let mut unresolved = |anchor: &str| {
            diagnostics.error(
                Some(&record.location),
                format!("unresolved reference '{anchor}' in {} '{}'", record.category, record.name),
            );
        };

        let spans = vec![Span::Text(line.to_string())];
        let spans = rewrite(spans, &REF_ROLE, |caps, whole| {
            let (anchor, label) = match caps.get(2) {
                Some(anchor) => (anchor.as_str(), Some(caps[1].to_string())),
                None => (&caps[1], None),
            };
            let target = self.linker.resolve_anchor(anchor);
            match target.and_then(|t| {
                let label = label.unwrap_or_else(|| self.linker.default_label(t));
                self.linker.link(t, label)
            }) {
                Some(link) => link,
                None => {
                    unresolved(anchor);
                    Span::Text(whole.to_string())
                }
            }
        });
        let spans = rewrite(spans, &ASSUMPTION_LINK, |caps, whole| {
            match self
                .linker
                .resolve_assumption(&caps[1])
                .and_then(|t| self.linker.named(t))
            {
                Some(link) => link,
                None => {
                    unresolved(&caps[1]);
                    Span::Text(whole.to_string())
                }
            }
        });
        let spans = rewrite(spans, &ROLE, |caps, whole| match self.roles.get(&caps[1]) {
            Some(template) => {
                let (label, url) = template.expand(&caps[2]);
                Span::Link {
                    label,
                    target: LinkTarget::External(url),
                }
            }
            None => Span::Text(whole.to_string()),
        });
        let spans = rewrite(spans, &HYPERLINK, |caps, _| Span::Link {
            label: caps[1].to_string(),
            target: LinkTarget::External(caps[2].to_string()),
        });
        let spans = rewrite(spans, &LITERAL, |caps, _| Span::Literal(caps[1].to_string()));
        Inline(spans)
    }
}

/// Replace every match of `pattern` inside plain-text spans
fn rewrite(
    spans: Vec<Span>,
    pattern: &Regex,
    mut replace: impl FnMut(&Captures<'_>, &str) -> Span,
) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        let Span::Text(text) = span else {
            out.push(span);
            continue;
        };
        let mut last = 0;
        for caps in pattern.captures_iter(&text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push(&mut out, Span::Text(text[last..whole.start()].to_string()));
            push(&mut out, replace(&caps, whole.as_str()));
            last = whole.end();
        }
        push(&mut out, Span::Text(text[last..].to_string()));
    }
    out
}

/// Append a span, merging adjacent plain text
fn push(out: &mut Vec<Span>, span: Span) {
    match (out.last_mut(), span) {
        (_, Span::Text(text)) if text.is_empty() => {}
        (Some(Span::Text(previous)), Span::Text(text)) => previous.push_str(&text),
        (_, span) => out.push(span),
    }
}
