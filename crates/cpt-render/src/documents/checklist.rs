use super::{yes_no, Renderer};
use crate::filter::RenderFilter;
use crate::markup::{Block, Fragment, Inline, Span};
use cpt_store::{Category, Record};
use cpt_trace::Diagnostics;
use indexmap::IndexMap;

/// Scope whose items carry no priority or review fields
const AUTOMATED: &str = "Automated";

impl Renderer<'_, '_> {
    pub(super) fn checklist(&self, filter: &RenderFilter, diagnostics: &mut Diagnostics) -> Fragment {
        let mut fragment = Fragment::new();
        for record in self.store.iterate(Category::ChecklistItem) {
            let Some(names) = self.names.names(record.id) else {
                continue;
            };
            if !filter.admits(record) {
                continue;
            }

            fragment.push(Block::Anchor(names.anchor.to_string()));
            fragment.push(Block::Rubric {
                role: Some(role_of(record)),
                title: names.label.clone(),
                suffix: mode_suffix(record).to_string(),
            });
            fragment.push(Block::Fields(self.checklist_fields(record)));
            if let Some(text) = record.text("text") {
                fragment.push(Block::Paragraph(self.body(record, text, diagnostics)));
            }
        }
        fragment
    }

    fn checklist_fields(&self, record: &Record) -> Vec<(String, Inline)> {
        let mut fields = Vec::new();
        let scope = record.literal("scope").unwrap_or_default();
        if scope != AUTOMATED {
            if let Some(priority) = record.literal("priority") {
                fields.push(("Priority".to_string(), Inline::text(priority)));
            }
            fields.push((
                "External Review".to_string(),
                Inline::text(yes_no(record.flag("ext_review"))),
            ));
        }

        let linker = self.linker();
        let mut step = linker.step(record.get("step")).unwrap_or_default();
        if let Some(to) = linker.step(record.get("step_to")) {
            step = step.with_text(" .. ").concat(to);
        } else if let Some(also) = linker.step(record.get("step_also")) {
            step = step.with_text(", ").concat(also);
        }
        fields.push(("Step".to_string(), step));
        fields.push(("Scope".to_string(), Inline::text(self.scope(record))));
        fields
    }

    pub(super) fn worklist(&self, filter: &RenderFilter, diagnostics: &mut Diagnostics) -> Fragment {
        let mut fragment = Fragment::new();
        let mut numbering = WorklistNumbering::default();
        for record in self.store.iterate(Category::WorklistItem) {
            let section = record.text("section").unwrap_or_default();
            let (major, minor) = numbering.next(section);
            let Some(names) = self.names.names(record.id) else {
                continue;
            };
            if !filter.admits(record) {
                continue;
            }

            fragment.push(Block::Anchor(names.anchor.to_string()));
            fragment.push(Block::Rubric {
                role: Some(role_of(record)),
                title: format!("Worklist item {major}.{minor}"),
                suffix: format!(" ({section})"),
            });
            fragment.push(Block::text(format!("Applies to: {}", self.scope(record))));
            if let Some(text) = record.text("text") {
                fragment.push(Block::Paragraph(self.body(record, text, diagnostics)));
            }
        }
        fragment
    }

    pub(super) fn template(&self, filter: &RenderFilter, diagnostics: &mut Diagnostics) -> Fragment {
        let mut groups: IndexMap<&str, Vec<&Record>> = IndexMap::new();
        for record in self.store.iterate(Category::ChecklistItem) {
            let group = record
                .text("section")
                .unwrap_or_else(|| record.location.file_stem());
            groups.entry(group).or_default().push(record);
        }

        let mut fragment = Fragment::new();
        fragment.push(Block::Heading {
            level: 1,
            text: Inline::text(format!(
                "{} ({})",
                self.config.title,
                filter.min_priority.to_string().to_uppercase()
            )),
        });

        for (group, records) in groups {
            let admitted: Vec<_> = records
                .into_iter()
                .filter(|r| filter.admits(r))
                .filter_map(|r| self.names.names(r.id).map(|n| (r, n)))
                .collect();
            if admitted.is_empty() {
                continue;
            }
            fragment.push(Block::Heading {
                level: 2,
                text: Inline::text(group),
            });

            for (record, names) in admitted {
                let mut title = format!("{} ({}", names.label, self.scope(record));
                if let Some(priority) = record.literal("priority") {
                    title.push_str(&format!(", {priority} Priority"));
                }
                title.push(')');
                fragment.push(Block::Heading {
                    level: 3,
                    text: Inline::text(title),
                });
                if record.flag("ext_review") {
                    fragment.push(Block::line(Inline::span(Span::Strong(
                        "EXTERNAL REVIEW REQUIRED".to_string(),
                    ))));
                }
                if let Some(text) = record.text("text") {
                    fragment.push(Block::Quote(self.body(record, text, diagnostics)));
                }
            }
        }
        fragment
    }
}

/// Visible `major.minor` numbers of worklist items
///
/// The minor number counts items of the current section; a new section
/// advances the major number.
#[derive(Debug, Default)]
struct WorklistNumbering {
    section: Option<String>,
    major: u32,
    minor: u32,
}

impl WorklistNumbering {
    fn next(&mut self, section: &str) -> (u32, u32) {
        match &self.section {
            Some(current) if current == section => self.minor += 1,
            _ => {
                self.section = Some(section.to_string());
                self.major += 1;
                self.minor = 1;
            }
        }
        (self.major, self.minor)
    }
}

fn role_of(record: &Record) -> String {
    format!(
        "cl_{}",
        record.literal("scope").unwrap_or_default().to_lowercase()
    )
}

fn mode_suffix(record: &Record) -> &'static str {
    match (record.flag("automatable"), record.flag("manual")) {
        (true, true) => " (automatable/manual)",
        (true, false) => " (automatable)",
        (false, true) => " (manual)",
        (false, false) => "",
    }
}
