use super::{ArtifactKind, Renderer};
use crate::markup::{Block, Fragment, Inline};
use cpt_store::schema::ASSUMPTION_KIND;
use cpt_store::{Category, Record, RelationKind};
use cpt_trace::{CompletenessChecker, Diagnostics, VIA_PROCESS_ASSUMPTIONS};

/// Marker written under assumptions nothing traces
pub const NOT_TRACED: &str = "Assumption not traced in process.";

/// Trace entry of assumptions covered by the process assumptions page
pub const PROCESS_ASSUMPTIONS: &str = "(Process Assumptions)";

impl Renderer<'_, '_> {
    /// One fragment per assumption kind, in enumeration order, even when empty
    pub(super) fn assumptions(&self, diagnostics: &mut Diagnostics) -> Vec<(ArtifactKind, Fragment)> {
        let checker = CompletenessChecker::new(self.resolver);
        ASSUMPTION_KIND
            .literals
            .iter()
            .map(|kind| {
                let mut fragment = Fragment::new();
                for record in self
                    .store
                    .iterate(Category::Assumption)
                    .filter(|r| r.literal("kind") == Some(*kind))
                {
                    self.assumption(record, &checker, &mut fragment, diagnostics);
                }
                (ArtifactKind::AssumptionKind(*kind), fragment)
            })
            .collect()
    }

    fn assumption(
        &self,
        record: &Record,
        checker: &CompletenessChecker<'_, '_>,
        fragment: &mut Fragment,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(names) = self.names.names(record.id) else {
            return;
        };
        let linker = self.linker();

        fragment.push(Block::Anchor(names.anchor.to_string()));
        fragment.push(Block::Heading {
            level: 3,
            text: Inline::text(names.label.clone()),
        });
        fragment.push(Block::text("Description:"));
        if let Some(text) = record.text("text") {
            fragment.push(Block::Indented(self.body(record, text, diagnostics)));
        }

        if let Some(targets) = checker.deferral(record) {
            let links = targets
                .iter()
                .filter_map(|t| linker.named(t).map(Inline::span))
                .collect();
            fragment.push(Block::line(
                Inline::text("See entries for: ").concat(Inline::oxford(links)),
            ));
        }

        let mut steps: Vec<Inline> = record
            .flag(VIA_PROCESS_ASSUMPTIONS)
            .then(|| Inline::text(PROCESS_ASSUMPTIONS))
            .into_iter()
            .chain(
                self.resolver
                    .inbound(record, RelationKind::Traces)
                    .filter_map(|source| match source.category {
                        Category::ClauseTracing => linker.labelled(source),
                        _ => linker.named(source),
                    })
                    .map(Inline::span),
            )
            .collect();
        match steps.len() {
            0 => {}
            1 => fragment.push(Block::line(
                Inline::text("Applicable process step: ").concat(steps.remove(0)),
            )),
            _ => {
                fragment.push(Block::text("Applicable process steps:"));
                fragment.push(Block::Bullets(steps));
            }
        }

        if let Some(notes) = record.text("notes") {
            fragment.push(Block::Paragraph(self.body(record, notes, diagnostics)));
        }

        if !checker.is_satisfied(record, RelationKind::Traces) {
            fragment.push(Block::Warning(Inline::text(NOT_TRACED)));
        }
    }
}
