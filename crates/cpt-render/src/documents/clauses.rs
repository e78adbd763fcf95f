use super::{verbatim, ArtifactKind, Renderer};
use crate::markup::{Block, Fragment, Inline, Span};
use cpt_store::{Category, Record};
use cpt_trace::naming::{clause_coordinate, clause_label};
use cpt_trace::Diagnostics;

const ASIL_LEVELS: [char; 4] = ['A', 'B', 'C', 'D'];

const HEADER: &str = "Process steps that apply:";

impl Renderer<'_, '_> {
    /// Main document plus the sections and verbatim companions
    pub(super) fn clauses(
        &self,
        emit_steps: bool,
        diagnostics: &mut Diagnostics,
    ) -> Vec<(ArtifactKind, Fragment)> {
        let mut main = Fragment::new();
        let mut sections = Vec::new();
        let mut texts = Vec::new();
        let mut current: Option<Vec<i64>> = None;

        for record in self.store.iterate(Category::ClauseTracing) {
            let coordinate = clause_coordinate(record);
            let key: Vec<i64> = coordinate.iter().copied().take(3).collect();
            if current.as_ref() != Some(&key) {
                main.push(Block::Heading {
                    level: 3,
                    text: Inline::text(section_title(&key)),
                });
                current = Some(key);
            }

            self.clause(record, emit_steps, &mut main, diagnostics);

            sections.push(Inline::text(clause_label(record, false)));
            if let Some(text) = record.text("text").or_else(|| record.text("row")) {
                texts.extend(verbatim(text));
            }
        }

        vec![
            (ArtifactKind::Main, main),
            (ArtifactKind::Sections, companion(sections)),
            (ArtifactKind::Verbatim, companion(texts)),
        ]
    }

    fn clause(
        &self,
        record: &Record,
        emit_steps: bool,
        fragment: &mut Fragment,
        diagnostics: &mut Diagnostics,
    ) {
        let Some(names) = self.names.names(record.id) else {
            return;
        };
        let linker = self.linker();

        let mut body = Vec::new();
        if let Some(text) = record.text("text") {
            body.push(Block::Paragraph(verbatim(text)));
        }
        if let Some(row) = record.text("row") {
            let lines: Vec<&str> = row.lines().collect();
            let (row, notes) = match lines.as_slice() {
                [] => ("", &[][..]),
                [row] => (*row, &[][..]),
                [row, _] => {
                    diagnostics.error(Some(&record.location), "row must be 1 or 3+ lines long");
                    (*row, &[][..])
                }
                [row, _, notes @ ..] => (*row, notes),
            };
            body.push(asil_table(row, record.text("applies").unwrap_or_default()));
            if !notes.is_empty() {
                body.push(Block::Paragraph(
                    notes.iter().map(|line| Inline::text(*line)).collect(),
                ));
            }
        }

        fragment.push(Block::Anchor(names.anchor.to_string()));
        fragment.push(Block::Topic {
            title: Inline::text(format!("{}:", names.label)),
            body,
        });

        if emit_steps {
            let mut steps: Vec<Inline> = record
                .get("steps")
                .items()
                .iter()
                .filter_map(|step| linker.step(step))
                .collect();
            steps.extend(
                record
                    .get("ref_steps")
                    .items()
                    .iter()
                    .filter_map(|value| value.as_record())
                    .filter_map(|id| linker.labelled(self.store.record(id)))
                    .map(|link| Inline::text("See ").with(link)),
            );
            let alt_steps = record.text("alt_steps");

            match steps.len() {
                0 if alt_steps.is_none() => fragment.push(Block::text(format!("{HEADER} N/A"))),
                0 => fragment.push(Block::text(HEADER)),
                1 => fragment.push(Block::line(
                    Inline::text(format!("{HEADER} ")).concat(steps.remove(0)),
                )),
                _ => {
                    fragment.push(Block::text(HEADER));
                    fragment.push(Block::Bullets(steps));
                }
            }
            if let Some(alt_steps) = alt_steps {
                fragment.push(Block::Indented(verbatim(alt_steps)));
            }
        }

        if let Some(same_as) = record
            .get("same_as")
            .as_record()
            .and_then(|id| linker.labelled(self.store.record(id)))
        {
            fragment.push(Block::line(Inline::text("Same as: ").with(same_as)));
        }

        if let Some(just) = record.text("just") {
            fragment.push(Block::text("Justification:"));
            fragment.push(Block::Indented(verbatim(just)));
        }
    }
}

fn companion(lines: Vec<Inline>) -> Fragment {
    let mut fragment = Fragment::new();
    if !lines.is_empty() {
        fragment.push(Block::Paragraph(lines));
    }
    fragment
}

/// `Section C.S` for a (part, chapter, section) key
fn section_title(key: &[i64]) -> String {
    let levels: Vec<String> = key.iter().skip(1).map(ToString::to_string).collect();
    format!("Section {}", levels.join("."))
}

/// ASIL applicability: `+` recommended (lowercase), `++` highly recommended
/// (uppercase), `o` otherwise
fn asil_table(row: &str, applies: &str) -> Block {
    let mut header = vec![Inline::new()];
    let mut cells = vec![Inline::text(row)];
    for level in ASIL_LEVELS {
        header.push(Inline::text(level.to_string()));
        let mark = if applies.contains(level.to_ascii_lowercase()) {
            "+"
        } else if applies.contains(level) {
            "++"
        } else {
            "o"
        };
        cells.push(Inline::span(Span::Literal(mark.to_string())));
    }
    Block::Table {
        widths: vec![10, 1, 1, 1, 1],
        header: Some(header),
        rows: vec![cells],
    }
}
