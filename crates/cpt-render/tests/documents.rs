//! Rendered documents over small hand-built stores

use cpt_render::prelude::*;
use cpt_render::{NOT_TRACED, PROCESS_ASSUMPTIONS};
use cpt_store::{RawRecord, RecordStore};
use cpt_test_utils::{
    assumption, checklist_item, clause, constraint, deferred_assumption, step, step_tracing,
    store_of, worklist_item,
};
use cpt_trace::{Diagnostics, NameTable, Resolver};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn render_with(
    store: &RecordStore,
    document: Document,
    filter: &RenderFilter,
    dialect: &dyn Dialect,
) -> (Vec<Artifact>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let names = NameTable::build(store, &mut diagnostics).unwrap();
    let resolver = Resolver::new(store);
    let config = RenderConfig::default();
    let artifacts =
        Renderer::new(&names, &resolver, &config).render(document, filter, dialect, &mut diagnostics);
    (artifacts, diagnostics)
}

fn main_text(store: &RecordStore, document: Document, dialect: &dyn Dialect) -> String {
    let (artifacts, diagnostics) = render_with(store, document, &RenderFilter::new(), dialect);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    artifacts
        .into_iter()
        .find(|a| a.kind == ArtifactKind::Main)
        .unwrap()
        .content
}

fn review_step() -> RawRecord {
    step("review_code").with("page", "review")
}

fn item_3_2() -> RawRecord {
    checklist_item("item_3_2", "Medium", "All")
        .with("step", "review_code")
        .with("text", "Check the code against :ref:`step-review-code`.")
}

#[test]
fn checklist_item_rst() {
    let store = store_of([review_step(), item_3_2()]);

    assert_eq!(
        main_text(&store, Document::Checklist, &Rst),
        "\
.. _checklist-item-3-2:

.. rubric:: :cl_all:`Checklist item 3.2` (automatable)

.. list-table::
   :widths: 1 3

   * - Priority
     - Medium
   * - External Review
     - No
   * - Step
     - :ref:`review_code <step-review-code>`
   * - Scope
     - Up to and including SPARK Platinum

Check the code against :ref:`Step Review code <step-review-code>`.
"
    );
}

#[test]
fn checklist_item_markdown() {
    let store = store_of([review_step(), item_3_2()]);

    assert_eq!(
        main_text(&store, Document::Checklist, &Markdown::default()),
        "\
<a id=\"checklist-item-3-2\"></a>

**Checklist item 3.2 (automatable)**

- Priority: Medium
- External Review: No
- Step: [review_code](review.html#step-review-code)
- Scope: Up to and including SPARK Platinum

Check the code against [Step Review code](review.html#step-review-code).
"
    );
}

#[test]
fn automated_items_omit_priority_and_review() {
    let store = store_of([
        review_step(),
        step("run_tests"),
        checklist_item("item_4", "High", "Automated")
            .with("manual", true)
            .with("step", "review_code")
            .with("step_to", "run_tests"),
    ]);
    let text = main_text(&store, Document::Checklist, &Rst);

    assert!(text.contains("(automatable/manual)"));
    assert!(!text.contains("Priority"));
    assert!(!text.contains("External Review"));
    assert!(text.contains(
        "     - :ref:`review_code <step-review-code>` .. :ref:`run_tests <step-run-tests>`"
    ));
    assert!(text.contains("     - N/A - Fully automated"));
}

#[test]
fn misnamed_checklist_items_are_skipped() {
    let store = store_of([
        checklist_item("item_1", "High", "All"),
        checklist_item("first", "High", "All"),
    ]);
    let (artifacts, diagnostics) =
        render_with(&store, Document::Checklist, &RenderFilter::new(), &Rst);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(artifacts[0].content.matches(".. rubric::").count(), 1);
}

#[test]
fn unresolved_reference_is_a_local_error() {
    let store = store_of([checklist_item("item_1", "High", "All")
        .with("text", "See :ref:`step-nowhere`.")]);
    let (artifacts, diagnostics) =
        render_with(&store, Document::Checklist, &RenderFilter::new(), &Rst);

    assert_eq!(diagnostics.count(cpt_trace::Severity::Error), 1);
    assert!(artifacts[0].content.contains("See :ref:`step-nowhere`."));
}

#[test]
fn worklist_numbering_ignores_filters() {
    let store = store_of([
        worklist_item("prepare", "Setup", "All"),
        worklist_item("configure", "Setup", "All").with("priority", "Low"),
        worklist_item("inspect", "Review", "Ada"),
    ]);
    let filter = RenderFilter::new().with_min_priority(Priority::All);
    let (artifacts, _) = render_with(&store, Document::Worklist, &filter, &Markdown::default());
    let text = &artifacts[0].content;
    assert!(text.contains("**Worklist item 1.2 (Setup)**"));

    let filter = RenderFilter::new().with_scope("Ada");
    let (artifacts, _) = render_with(&store, Document::Worklist, &filter, &Markdown::default());
    assert_eq!(
        artifacts[0].content,
        "\
<a id=\"worklist-inspect\"></a>

**Worklist item 2.1 (Review)**

Applies to: Interfaces and units containing Ada

Do inspect.
"
    );
}

#[test]
fn template_groups_by_section_then_file() {
    let store = store_of([
        checklist_item("item_3_2", "Medium", "All").with("section", "Reviews"),
        checklist_item("item_3_3", "Low", "Automated").with("ext_review", true),
    ]);
    let filter = RenderFilter::new().with_min_priority(Priority::Low);
    let (artifacts, _) =
        render_with(&store, Document::ChecklistTemplate, &filter, &Markdown::default());

    assert_eq!(
        artifacts[0].content,
        "\
# SPARK Process Checklist (LOW)

## Reviews

### Checklist item 3.2 (Up to and including SPARK Platinum, Medium Priority)

> Check item_3_2.

## fixture

### Checklist item 3.3 (N/A - Fully automated, Low Priority)

**EXTERNAL REVIEW REQUIRED**

> Check item_3_3.
"
    );

    let filter = RenderFilter::new().with_min_priority(Priority::Medium);
    let (artifacts, _) =
        render_with(&store, Document::ChecklistTemplate, &filter, &Markdown::default());
    assert!(artifacts[0].content.starts_with("# SPARK Process Checklist (MEDIUM)"));
    assert!(!artifacts[0].content.contains("## fixture"));
}

fn assumption_store() -> RecordStore {
    store_of([
        assumption("no_alias", "Part"),
        assumption("stack_bound", "Part"),
        deferred_assumption("umbrella", "Part", &["no_alias", "stack_bound"]),
        step_tracing("review_code", &["no_alias"]).with("page", "review"),
    ])
}

#[test]
fn assumptions_one_artifact_per_kind() {
    let (artifacts, _) = render_with(
        &assumption_store(),
        Document::Assumptions,
        &RenderFilter::new(),
        &Rst,
    );
    let kinds: Vec<_> = artifacts.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ArtifactKind::AssumptionKind("All"),
            ArtifactKind::AssumptionKind("Part"),
            ArtifactKind::AssumptionKind("Modular"),
            ArtifactKind::AssumptionKind("Compiler"),
        ]
    );
    assert_eq!(artifacts[0].content, "");
}

#[test]
fn assumptions_trace_defer_and_warn() {
    let (artifacts, _) = render_with(
        &assumption_store(),
        Document::Assumptions,
        &RenderFilter::new(),
        &Rst,
    );

    assert_eq!(
        artifacts[1].content,
        "\
.. _no-alias:

no_alias
^^^^^^^^

Description:

  Text of no_alias.

Applicable process step: :ref:`review_code <step-review-code>`

.. _stack-bound:

stack_bound
^^^^^^^^^^^

Description:

  Text of stack_bound.

.. warning::

   Assumption not traced in process.

.. _umbrella:

umbrella
^^^^^^^^

Description:

  Text of umbrella.

See entries for: :ref:`no_alias <no-alias>`, and :ref:`stack_bound <stack-bound>`
"
    );
    assert_eq!(artifacts[1].content.matches(NOT_TRACED).count(), 1);
}

#[test]
fn assumptions_list_several_tracing_steps() {
    let store = store_of([
        assumption("no_alias", "Compiler"),
        step_tracing("review_code", &["no_alias"]),
        step_tracing("run_tests", &["no_alias"]),
    ]);
    let (artifacts, _) = render_with(&store, Document::Assumptions, &RenderFilter::new(), &Rst);

    assert!(artifacts[3].content.contains(
        "Applicable process steps:\n\n* :ref:`review_code <step-review-code>`\n* :ref:`run_tests <step-run-tests>`"
    ));
}

#[test]
fn process_assumptions_page_is_a_trace() {
    let store = store_of([
        assumption("no_alias", "Modular").with("via_process_assumptions", true),
        assumption("stack_bound", "Modular").with("via_process_assumptions", true),
        step_tracing("review_code", &["stack_bound"]),
    ]);
    let (artifacts, diagnostics) =
        render_with(&store, Document::Assumptions, &RenderFilter::new(), &Rst);
    let text = &artifacts[2].content;

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert!(text.contains("Applicable process step: (Process Assumptions)\n"));
    assert!(text.contains(
        "Applicable process steps:\n\n* (Process Assumptions)\n* :ref:`review_code <step-review-code>`"
    ));
    assert_eq!(text.matches(PROCESS_ASSUMPTIONS).count(), 2);
    assert!(!text.contains(NOT_TRACED));
}

fn clause_store() -> RecordStore {
    store_of([
        clause("p6_8_4_1", &[6, 8, 4, 1]).with("text", "First."),
        clause("p6_8_4_2", &[6, 8, 4, 2]).with("text", "Second."),
    ])
}

#[test]
fn clauses_share_one_section_heading() {
    let (artifacts, _) = render_with(
        &clause_store(),
        Document::Clauses { emit_steps: false },
        &RenderFilter::new(),
        &Rst,
    );

    assert_eq!(
        artifacts[0].content,
        "\
Section 8.4
^^^^^^^^^^^

.. _iso-trace-p6-8-4-1:

.. topic:: Part 6 - Section 8.4.1:

  First.

.. _iso-trace-p6-8-4-2:

.. topic:: Part 6 - Section 8.4.2:

  Second.
"
    );
    assert_eq!(artifacts[1].kind, ArtifactKind::Sections);
    assert_eq!(
        artifacts[1].content,
        "Part 6 - Section 8.4.1\nPart 6 - Section 8.4.2\n"
    );
    assert_eq!(artifacts[2].kind, ArtifactKind::Verbatim);
    assert_eq!(artifacts[2].content, "First.\nSecond.\n");
}

#[test]
fn clause_steps_and_references() {
    let store = store_of([
        review_step(),
        clause("p6_9", &[6, 9, 1]).with("steps", vec!["review_code"]),
        clause("p6_9_2", &[6, 9, 2])
            .with("steps", vec!["review_code"])
            .with("ref_steps", vec!["p6_9"])
            .with("just", "Covered by review."),
        clause("p6_10", &[6, 10, 1]).with("same_as", "p6_9"),
    ]);
    let text = main_text(&store, Document::Clauses { emit_steps: true }, &Rst);

    assert!(text.contains("Process steps that apply: :ref:`review_code <step-review-code>`\n"));
    assert!(text.contains(
        "Process steps that apply:\n\n* :ref:`review_code <step-review-code>`\n* See :ref:`Part 6 - Section 9.1 <iso-trace-p6-9>`"
    ));
    assert!(text.contains("Justification:\n\n  Covered by review."));
    assert!(text.contains("Process steps that apply: N/A"));
    assert!(text.contains("Same as: :ref:`Part 6 - Section 9.1 <iso-trace-p6-9>`"));
}

#[test]
fn clause_row_builds_asil_table() {
    let store = store_of([
        clause("p6_5", &[6, 5, 1])
            .with("row", "1a Use of language subsets\n\nNote on subsets.")
            .with("applies", "abCD"),
        clause("p6_6", &[6, 6, 1]).with("row", "1b Two lines\n"),
    ]);
    let (artifacts, diagnostics) = render_with(
        &store,
        Document::Clauses { emit_steps: false },
        &RenderFilter::new(),
        &Rst,
    );

    assert!(artifacts[0].content.contains(
        "\
  .. list-table::
     :widths: 10 1 1 1 1
     :header-rows: 1

     * -
       - A
       - B
       - C
       - D
     * - 1a Use of language subsets
       - ``+``
       - ``+``
       - ``++``
       - ``++``

  Note on subsets."
    ));
    assert_eq!(diagnostics.len(), 0);
    assert!(artifacts[2].content.starts_with("1a Use of language subsets\n\nNote on subsets.\n"));
}

#[test]
fn two_line_row_is_a_local_error() {
    let store = store_of([clause("p6_6", &[6, 6, 1]).with("row", "1b Two lines\nstray")]);
    let (_, diagnostics) = render_with(
        &store,
        Document::Clauses { emit_steps: false },
        &RenderFilter::new(),
        &Rst,
    );
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn constraints_grouped_by_tool() {
    let store = store_of([constraint(
        "Compiler_Switch_gnata",
        "GNAT_Compiler",
        "Switch",
        "Required",
        &["-gnata enable assertions"],
    )]);

    assert_eq!(
        main_text(&store, Document::Constraints, &Markdown::default()),
        "\
## GNAT compiler

<a id=\"switch-compiler-switch-gnata\"></a>

**Compiler_Switch_gnata (required)**

- Tool: GNAT compiler
- Status: Required
- Switches: `-gnata` (enable assertions)

Why Compiler_Switch_gnata.
"
    );
}

#[test]
fn rendering_is_idempotent() {
    let store = assumption_store();
    let first = render_with(&store, Document::Assumptions, &RenderFilter::new(), &Rst).0;
    let second = render_with(&store, Document::Assumptions, &RenderFilter::new(), &Rst).0;
    assert_eq!(first, second);
}

const PRIORITIES: [&str; 4] = ["All", "Low", "Medium", "High"];

proptest! {
    /// Exactly the items at or above the threshold are rendered
    #[test]
    fn priority_filter_admits_threshold_and_above(
        ranks in proptest::collection::vec(0usize..4, 0..12),
        min in 0usize..4,
    ) {
        let store = store_of(ranks.iter().enumerate().map(|(i, rank)| {
            checklist_item(&format!("item_{i}"), PRIORITIES[*rank], "All")
        }));
        let filter = RenderFilter::new().with_min_priority(PRIORITIES[min].parse().unwrap());
        let (artifacts, _) = render_with(&store, Document::Checklist, &filter, &Rst);

        let expected = ranks.iter().filter(|rank| **rank >= min).count();
        prop_assert_eq!(artifacts[0].content.matches(".. rubric::").count(), expected);
    }
}
