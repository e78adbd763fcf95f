//! Testing utilities for CPT workspace
//!
//! Shared record builders, a small sample handbook and its YAML form.

#![allow(missing_docs)]

use cpt_store::{Location, RawRecord, RawValue, RecordStore, RecordStoreBuilder};
use std::path::{Path, PathBuf};

pub const FIXTURE_FILE: &str = "fixture.yaml";

pub fn at(line: usize) -> Location {
    Location::new(FIXTURE_FILE, line)
}

pub fn step(name: &str) -> RawRecord {
    RawRecord::new("process_step", name, at(1))
}

pub fn step_tracing(name: &str, assumptions: &[&str]) -> RawRecord {
    step(name).with("assumptions", assumptions.to_vec())
}

pub fn assumption(name: &str, kind: &str) -> RawRecord {
    RawRecord::new("assumption", name, at(1))
        .with("kind", kind)
        .with("text", format!("Text of {name}."))
}

pub fn deferred_assumption(name: &str, kind: &str, targets: &[&str]) -> RawRecord {
    assumption(name, kind).with("deferred_to", targets.to_vec())
}

pub fn checklist_item(name: &str, priority: &str, scope: &str) -> RawRecord {
    RawRecord::new("checklist_item", name, at(1))
        .with("priority", priority)
        .with("scope", scope)
        .with("automatable", true)
        .with("manual", false)
        .with("ext_review", false)
        .with("step", "ALL")
        .with("text", format!("Check {name}."))
}

pub fn worklist_item(name: &str, section: &str, scope: &str) -> RawRecord {
    RawRecord::new("worklist_item", name, at(1))
        .with("section", section)
        .with("scope", scope)
        .with("text", format!("Do {name}."))
}

pub fn clause(name: &str, coordinate: &[i64]) -> RawRecord {
    RawRecord::new("clause", name, at(1)).with("ref", coordinate.to_vec())
}

pub fn constraint(name: &str, tool: &str, kind: &str, status: &str, switches: &[&str]) -> RawRecord {
    RawRecord::new("switch_constraint", name, at(1))
        .with("tool", tool)
        .with("kind", kind)
        .with("status", status)
        .with("switches", switches.to_vec())
        .with("rationale", format!("Why {name}."))
}

pub fn store_of(records: impl IntoIterator<Item = RawRecord>) -> RecordStore {
    let mut builder = RecordStoreBuilder::new();
    builder.extend(records);
    builder.build().unwrap()
}

pub fn raw_map(entries: &[(&str, RawValue)]) -> RawValue {
    RawValue::Map(
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect(),
    )
}

/// Process steps, assumptions and their traces
pub const STEPS_YAML: &str = "\
package: Steps
records:
  - category: process_step
    name: review_code
    section: \"4.2\"
    page: review
    assumptions: [Defs.no_alias]
  - category: process_step
    name: run_tests
    page: testing
";

pub const ASSUMPTIONS_YAML: &str = "\
package: Defs
records:
  - category: assumption
    name: no_alias
    kind: Part
    text: Objects are not aliased.
  - category: assumption
    name: umbrella
    kind: Part
    text: See [[Defs.no_alias]] for details.
    deferred_to: [no_alias, stack_bound]
  - category: assumption
    name: stack_bound
    kind: Modular
    text: Stack usage is bounded.
";

pub const CHECKLIST_YAML: &str = "\
records:
  - category: checklist_item
    name: item_3_2
    priority: Medium
    scope: All
    automatable: true
    manual: false
    ext_review: false
    step: review_code
    section: Reviews
    text: Check the code against :ref:`step-review-code`.
  - category: checklist_item
    name: item_3_3
    priority: Low
    scope: Automated
    automatable: true
    manual: true
    ext_review: true
    step: ALL
    text: Run ``gnatprove``.
";

/// Write the sample handbook into `dir`, returning the file paths in load order
pub fn write_fixture_files(dir: &Path) -> Vec<PathBuf> {
    [
        ("steps.yaml", STEPS_YAML),
        ("assumptions.yaml", ASSUMPTIONS_YAML),
        ("checklist.yaml", CHECKLIST_YAML),
    ]
    .into_iter()
    .map(|(name, content)| {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    })
    .collect()
}
