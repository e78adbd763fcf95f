//! Anchors and labels derived from record names
//!
//! Every record gets a stable [`Anchor`] for cross-linking and a label for
//! display. The whole table is derived once, up front, so anchor collisions
//! are caught before anything is rendered.

use crate::constraint_id::{derive_identifier, ConstraintKind, ConstraintSpec, GroupCounters, Status, Tool};
use crate::diagnostics::Diagnostics;
use cpt_store::{Category, Location, Record, RecordId, RecordStore};
use std::collections::HashMap;
use std::fmt;

/// Prefix every checklist item name carries
pub const CHECKLIST_PREFIX: &str = "item_";

/// Stable cross-link target
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Anchor {
    namespace: Option<&'static str>,
    slug: String,
}

impl Anchor {
    /// Create anchor
    #[inline]
    #[must_use]
    pub fn new(namespace: Option<&'static str>, slug: impl Into<String>) -> Self {
        Self {
            namespace,
            slug: slug.into(),
        }
    }

    /// Part after the namespace
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace {
            Some(ns) => write!(f, "{ns}-{}", self.slug),
            None => f.write_str(&self.slug),
        }
    }
}

/// Fatal naming errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    /// Two records of one category derive the same anchor
    #[error("{second}: {category} anchor '{anchor}' already used by the record at {first}")]
    DuplicateAnchor {
        /// Category of both records
        category: Category,
        /// Colliding anchor
        anchor: String,
        /// Earlier declaration
        first: Location,
        /// Later declaration
        second: Location,
    },
}

/// Derived names of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    /// Cross-link target
    pub anchor: Anchor,
    /// Display label
    pub label: String,
    /// Visible number (checklist items) or derived identifier (constraints)
    pub ident: Option<String>,
}

/// Anchors and labels for every well-named record
#[derive(Debug, Clone)]
pub struct NameTable {
    names: Vec<Option<Names>>,
    by_anchor: [HashMap<String, RecordId>; 6],
}

impl NameTable {
    /// Derive names for every record of the store
    ///
    /// Naming-convention violations are reported to `diagnostics` and leave
    /// the record without names; renderers skip such records.
    ///
    /// # Errors
    /// Returns [`NamingError::DuplicateAnchor`] on the first anchor collision.
    pub fn build(store: &RecordStore, diagnostics: &mut Diagnostics) -> Result<Self, NamingError> {
        let mut table = Self {
            names: vec![None; store.len()],
            by_anchor: Default::default(),
        };
        let mut counters = GroupCounters::new();

        for record in store.records() {
            let Some(names) = derive(record, &mut counters, diagnostics) else {
                continue;
            };
            let key = names.anchor.to_string();
            let slot = &mut table.by_anchor[record.category.index()];
            if let Some(first) = slot.get(&key) {
                return Err(NamingError::DuplicateAnchor {
                    category: record.category,
                    anchor: key,
                    first: store.record(*first).location.clone(),
                    second: record.location.clone(),
                });
            }
            slot.insert(key, record.id);
            table.names[record.id.index()] = Some(names);
        }

        tracing::debug!(
            named = table.names.iter().filter(|n| n.is_some()).count(),
            total = store.len(),
            "name table built"
        );
        Ok(table)
    }

    /// Names of a record, `None` if it violates its naming convention
    #[must_use]
    pub fn names(&self, id: RecordId) -> Option<&Names> {
        self.names.get(id.index()).and_then(Option::as_ref)
    }

    /// Anchor of a record
    #[must_use]
    pub fn anchor_for(&self, record: &Record) -> Option<&Anchor> {
        self.names(record.id).map(|n| &n.anchor)
    }

    /// Label of a record
    #[must_use]
    pub fn label_for(&self, record: &Record) -> Option<&str> {
        self.names(record.id).map(|n| n.label.as_str())
    }

    /// Visible number or derived identifier of a record
    #[must_use]
    pub fn ident_for(&self, record: &Record) -> Option<&str> {
        self.names(record.id).and_then(|n| n.ident.as_deref())
    }

    /// Record with the given anchor in one category
    #[must_use]
    pub fn lookup_in(&self, category: Category, anchor: &str) -> Option<RecordId> {
        self.by_anchor[category.index()].get(anchor).copied()
    }

    /// Record with the given anchor, categories searched in canonical order
    #[must_use]
    pub fn lookup_anchor(&self, anchor: &str) -> Option<RecordId> {
        Category::ALL
            .into_iter()
            .find_map(|c| self.lookup_in(c, anchor))
    }
}

fn derive(
    record: &Record,
    counters: &mut GroupCounters,
    diagnostics: &mut Diagnostics,
) -> Option<Names> {
    let name = record.name.as_str();
    let names = match record.category {
        Category::ProcessStep => Names {
            anchor: Anchor::new(Some("step"), slug(name)),
            label: humanize(name),
            ident: None,
        },
        Category::ChecklistItem => {
            let number = match name.strip_prefix(CHECKLIST_PREFIX) {
                Some(rest) if !rest.is_empty() => rest.replace('_', "."),
                _ => {
                    diagnostics.error(
                        Some(&record.location),
                        format!("checklist item '{name}' must be named {CHECKLIST_PREFIX}<number>"),
                    );
                    return None;
                }
            };
            Names {
                anchor: Anchor::new(Some("checklist-item"), number.replace('.', "-")),
                label: format!("Checklist item {number}"),
                ident: Some(number),
            }
        }
        // Worklist numbers come from section order, not the name, so any
        // valid record name is accepted here
        Category::WorklistItem => Names {
            anchor: Anchor::new(Some("worklist"), slug(name)),
            label: humanize(name),
            ident: None,
        },
        Category::Assumption => Names {
            anchor: Anchor::new(None, slug(name)),
            label: name.to_string(),
            ident: None,
        },
        Category::ClauseTracing => Names {
            anchor: Anchor::new(Some("iso-trace"), name.replace('_', "-")),
            label: clause_label(record, true),
            ident: None,
        },
        Category::SwitchConstraint => {
            let id = constraint_identifier(record, counters)?;
            if id != name {
                diagnostics.error(
                    Some(&record.location),
                    format!("constraint '{name}' should be named '{id}'"),
                );
            }
            Names {
                anchor: Anchor::new(Some("switch"), slug(&id)),
                label: id.clone(),
                ident: Some(id),
            }
        }
    };
    Some(names)
}

/// Derived identifier of a constraint record
///
/// Advances the group counter of the constraint's tool when it lists other
/// than exactly one switch.
pub fn constraint_identifier(record: &Record, counters: &mut GroupCounters) -> Option<String> {
    let switches: Vec<String> = record
        .get("switches")
        .items()
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    let spec = ConstraintSpec {
        tool: record.literal("tool").and_then(Tool::from_literal)?,
        kind: record.literal("kind").and_then(ConstraintKind::from_literal)?,
        status: record.literal("status").and_then(Status::from_literal)?,
        switches: &switches,
    };
    Some(derive_identifier(&spec, counters))
}

/// Lowercase, `_` replaced by `-`
#[must_use]
pub fn slug(name: &str) -> String {
    name.to_lowercase().replace('_', "-")
}

/// First letter uppercase, the rest lowercase, `_` replaced by a space
#[must_use]
pub fn humanize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out: String = first.to_uppercase().collect();
    out.push_str(&chars.as_str().to_lowercase());
    out.replace('_', " ")
}

/// Coordinate of a clause: part, chapter and present deeper levels
///
/// A level counts only if it and every shallower level are present.
#[must_use]
pub fn clause_coordinate(record: &Record) -> Vec<i64> {
    let coordinate = record.get("ref");
    let mut out = Vec::with_capacity(5);
    for member in ["part", "chapter", "sec", "subsec", "subsubsec"] {
        match coordinate.member(member).as_int() {
            Some(level) => out.push(level),
            None => break,
        }
    }
    out
}

/// `Part P - Section C[.S[.SS[.SSS]]]`, plus ` <subref>` when requested
#[must_use]
pub fn clause_label(record: &Record, with_subref: bool) -> String {
    let coordinate = clause_coordinate(record);
    let mut label = match coordinate.as_slice() {
        [part, rest @ ..] => {
            let section: Vec<String> = rest.iter().map(ToString::to_string).collect();
            format!("Part {part} - Section {}", section.join("."))
        }
        [] => String::new(),
    };
    if with_subref {
        if let Some(subref) = record.text("subref") {
            label.push(' ');
            label.push_str(subref);
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpt_store::{RawRecord, RawValue, RecordStoreBuilder};
    use pretty_assertions::assert_eq;

    fn at(line: usize) -> Location {
        Location::new("n.yaml", line)
    }

    fn item(name: &str, line: usize) -> RawRecord {
        RawRecord::new("checklist_item", name, at(line))
            .with("scope", "All")
            .with("automatable", true)
            .with("manual", false)
            .with("ext_review", false)
            .with("step", "ALL")
            .with("text", "t")
    }

    fn clause(name: &str, coordinate: Vec<i64>) -> RawRecord {
        RawRecord::new("clause", name, at(1)).with("ref", coordinate)
    }

    #[test]
    fn step_and_assumption_names() {
        let store = RecordStoreBuilder::new()
            .with(RawRecord::new("process_step", "Review_Code", at(1)))
            .with(
                RawRecord::new("assumption", "No_Alias", at(2))
                    .with("kind", "All")
                    .with("text", "t"),
            )
            .build()
            .unwrap();
        let mut diagnostics = Diagnostics::new();
        let table = NameTable::build(&store, &mut diagnostics).unwrap();

        let step = &store.records()[0];
        assert_eq!(table.anchor_for(step).unwrap().to_string(), "step-review-code");
        assert_eq!(table.label_for(step), Some("Review code"));
        let assumption = &store.records()[1];
        assert_eq!(table.anchor_for(assumption).unwrap().to_string(), "no-alias");
        assert_eq!(table.label_for(assumption), Some("No_Alias"));
        assert_eq!(table.lookup_anchor("no-alias"), Some(assumption.id));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn checklist_numbers_and_prefix_violation() {
        let store = RecordStoreBuilder::new()
            .with(item("item_3_2", 1))
            .with(item("check_4", 9))
            .build()
            .unwrap();
        let mut diagnostics = Diagnostics::new();
        let table = NameTable::build(&store, &mut diagnostics).unwrap();

        let good = &store.records()[0];
        assert_eq!(table.anchor_for(good).unwrap().to_string(), "checklist-item-3-2");
        assert_eq!(table.label_for(good), Some("Checklist item 3.2"));
        assert_eq!(table.ident_for(good), Some("3.2"));
        assert!(table.names(store.records()[1].id).is_none());
        assert_eq!(
            diagnostics.iter().next().unwrap().to_string(),
            "n.yaml:9: error: checklist item 'check_4' must be named item_<number>"
        );
    }

    #[test]
    fn worklist_names_need_no_item_prefix() {
        let store = RecordStoreBuilder::new()
            .with(
                RawRecord::new("worklist_item", "prepare_tools", at(4))
                    .with("section", "Setup")
                    .with("scope", "All")
                    .with("text", "t"),
            )
            .build()
            .unwrap();
        let mut diagnostics = Diagnostics::new();
        let table = NameTable::build(&store, &mut diagnostics).unwrap();

        let item = &store.records()[0];
        assert_eq!(table.anchor_for(item).unwrap().to_string(), "worklist-prepare-tools");
        assert_eq!(table.label_for(item), Some("Prepare tools"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn colliding_anchors_are_fatal() {
        let store = RecordStoreBuilder::new()
            .with(RawRecord::new("process_step", "review_code", at(1)))
            .with(RawRecord::new("process_step", "Review_Code", at(7)))
            .build()
            .unwrap();
        let err = NameTable::build(&store, &mut Diagnostics::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "n.yaml:7: process_step anchor 'step-review-code' already used by the record at n.yaml:1"
        );
    }

    #[test]
    fn clause_labels_truncate_at_first_gap() {
        let mut gap = indexmap::IndexMap::new();
        gap.insert("part".to_string(), RawValue::Int(6));
        gap.insert("chapter".to_string(), RawValue::Int(8));
        gap.insert("subsec".to_string(), RawValue::Int(2));
        let store = RecordStoreBuilder::new()
            .with(clause("p6_8_4_1", vec![6, 8, 4, 1]).with("subref", "a)"))
            .with(clause("p6_9", vec![6, 9]))
            .with(RawRecord::new("clause", "gap", at(3)).with("ref", RawValue::Map(gap)))
            .build()
            .unwrap();
        let labels: Vec<_> = store
            .records()
            .iter()
            .map(|r| clause_label(r, true))
            .collect();
        assert_eq!(
            labels,
            vec![
                "Part 6 - Section 8.4.1 a)",
                "Part 6 - Section 9",
                "Part 6 - Section 8",
            ]
        );
        assert_eq!(clause_label(&store.records()[0], false), "Part 6 - Section 8.4.1");

        let table = NameTable::build(&store, &mut Diagnostics::new()).unwrap();
        assert_eq!(
            table.anchor_for(&store.records()[0]).unwrap().to_string(),
            "iso-trace-p6-8-4-1"
        );
    }

    #[test]
    fn constraint_names_must_match_identifier() {
        let constraint = |name: &str, switch: &str| {
            RawRecord::new("switch_constraint", name, at(2))
                .with("tool", "SPARK")
                .with("kind", "Switch")
                .with("status", "Required")
                .with("switches", vec![switch])
                .with("rationale", "r")
        };
        let store = RecordStoreBuilder::new()
            .with(constraint("SPARK_Switch_level", "--level=2"))
            .with(constraint("Proof_Mode", "--mode=all"))
            .build()
            .unwrap();
        let mut diagnostics = Diagnostics::new();
        let table = NameTable::build(&store, &mut diagnostics).unwrap();

        assert_eq!(
            table.anchor_for(&store.records()[0]).unwrap().to_string(),
            "switch-spark-switch-level"
        );
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics
            .iter()
            .next()
            .unwrap()
            .message
            .contains("should be named 'SPARK_Switch_mode'"));
    }

    #[test]
    fn humanize_capitalizes_first_word_only() {
        assert_eq!(humanize("REVIEW_code"), "Review code");
        assert_eq!(humanize(""), "");
    }
}
