use super::{yes_no, Renderer};
use crate::markup::{Block, Fragment, Inline, Span};
use cpt_store::schema::TOOL;
use cpt_store::{Category, Record};
use cpt_trace::constraint_id::{note_of, switch_of};
use cpt_trace::{ConstraintKind, Diagnostics, Tool};

impl Renderer<'_, '_> {
    pub(super) fn constraints(&self, diagnostics: &mut Diagnostics) -> Fragment {
        let mut fragment = Fragment::new();
        for literal in TOOL.literals {
            let Some(tool) = Tool::from_literal(literal) else {
                continue;
            };
            let records: Vec<&Record> = self
                .store
                .iterate(Category::SwitchConstraint)
                .filter(|r| r.literal("tool") == Some(*literal))
                .filter(|r| self.names.names(r.id).is_some())
                .collect();
            if records.is_empty() {
                continue;
            }

            fragment.push(Block::Heading {
                level: 2,
                text: Inline::text(tool.title()),
            });
            for record in records {
                self.constraint(record, tool, &mut fragment, diagnostics);
            }
        }
        fragment
    }

    fn constraint(
        &self,
        record: &Record,
        tool: Tool,
        fragment: &mut Fragment,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(names) = self.names.names(record.id) else {
            return;
        };
        let status = record.literal("status").unwrap_or_default();

        fragment.push(Block::Anchor(names.anchor.to_string()));
        fragment.push(Block::Rubric {
            role: None,
            title: names.label.clone(),
            suffix: format!(" ({})", status.to_lowercase()),
        });

        let mut fields = vec![
            ("Tool".to_string(), Inline::text(tool.title())),
            ("Status".to_string(), Inline::text(status)),
        ];
        if let Some(warn) = record.get("warn_related").as_bool() {
            fields.push(("Warning related".to_string(), Inline::text(yes_no(warn))));
        }
        let label = match record.literal("kind").and_then(ConstraintKind::from_literal) {
            Some(ConstraintKind::Rule) => "Rule",
            _ => "Switches",
        };
        let entries = record
            .get("switches")
            .items()
            .iter()
            .filter_map(|v| v.as_str())
            .map(|entry| {
                let switch = Inline::span(Span::Literal(switch_of(entry).to_string()));
                match note_of(entry) {
                    Some(note) => switch.with_text(format!(" ({note})")),
                    None => switch,
                }
            })
            .collect();
        fields.push((label.to_string(), Inline::join(entries, ", ")));

        let linker = self.linker();
        let steps: Vec<Inline> = record
            .get("steps")
            .items()
            .iter()
            .filter_map(|step| linker.step(step))
            .collect();
        if !steps.is_empty() {
            fields.push(("Steps".to_string(), Inline::join(steps, ", ")));
        }
        fragment.push(Block::Fields(fields));

        if let Some(rationale) = record.text("rationale") {
            fragment.push(Block::Paragraph(self.body(record, rationale, diagnostics)));
        }
    }
}
