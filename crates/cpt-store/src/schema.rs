//! Fixed record schema
//!
//! Every record file is validated against the tables in this module. The
//! schema is static: categories, their fields, enumerations and the relation
//! kind carried by each reference field.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Step of the certification process
    ProcessStep,
    /// Numbered review checklist entry
    ChecklistItem,
    /// Entry of the work list, numbered by section
    WorklistItem,
    /// Compiler, checker or prover switch/rule constraint
    SwitchConstraint,
    /// Regulatory assumption that must be traced or deferred
    Assumption,
    /// Tracing entry for a clause of the standard
    #[serde(rename = "clause")]
    ClauseTracing,
}

impl Category {
    /// All categories in canonical order
    pub const ALL: [Category; 6] = [
        Category::ProcessStep,
        Category::ChecklistItem,
        Category::WorklistItem,
        Category::SwitchConstraint,
        Category::Assumption,
        Category::ClauseTracing,
    ];

    /// Tag used in record files
    #[inline]
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::ProcessStep => "process_step",
            Self::ChecklistItem => "checklist_item",
            Self::WorklistItem => "worklist_item",
            Self::SwitchConstraint => "switch_constraint",
            Self::Assumption => "assumption",
            Self::ClauseTracing => "clause",
        }
    }

    /// Parse a record-file tag
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    /// Position in [`Category::ALL`]
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Schema for this category
    #[must_use]
    pub fn schema(self) -> &'static CategorySchema {
        match self {
            Self::ProcessStep => &PROCESS_STEP,
            Self::ChecklistItem => &CHECKLIST_ITEM,
            Self::WorklistItem => &WORKLIST_ITEM,
            Self::SwitchConstraint => &SWITCH_CONSTRAINT,
            Self::Assumption => &ASSUMPTION,
            Self::ClauseTracing => &CLAUSE,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Meaning of a reference edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    /// Source accounts for the target (steps and clauses trace assumptions)
    Traces,
    /// Source applies to a process step
    AppliesTo,
    /// Clause handled identically to another clause
    SameAs,
    /// Clause points to another clause for its steps
    SeeAlso,
    /// Assumption discharged by other assumptions
    DeferredTo,
}

impl RelationKind {
    /// All relation kinds
    pub const ALL: [RelationKind; 5] = [
        RelationKind::Traces,
        RelationKind::AppliesTo,
        RelationKind::SameAs,
        RelationKind::SeeAlso,
        RelationKind::DeferredTo,
    ];

    /// Textual name
    #[inline]
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Traces => "traces",
            Self::AppliesTo => "applies-to",
            Self::SameAs => "same-as",
            Self::SeeAlso => "see-also",
            Self::DeferredTo => "deferred-to",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.tag() == s)
            .ok_or_else(|| format!("unknown relation kind '{s}'"))
    }
}

/// Closed set of literals
#[derive(Debug, PartialEq, Eq)]
pub struct Enumeration {
    /// Type name, also accepted as a qualifier (`Priority.Medium`)
    pub name: &'static str,
    /// Literals in declaration order
    pub literals: &'static [&'static str],
}

impl Enumeration {
    /// Resolve a bare or qualified literal
    #[must_use]
    pub fn resolve(&self, text: &str) -> Option<&'static str> {
        let bare = match text.rsplit_once('.') {
            Some((qualifier, literal)) if qualifier.rsplit('.').next() == Some(self.name) => literal,
            Some(_) => return None,
            None => text,
        };
        self.literals.iter().copied().find(|l| *l == bare)
    }

    /// Ordinal of a literal
    #[must_use]
    pub fn position(&self, literal: &str) -> Option<usize> {
        self.literals.iter().position(|l| *l == literal)
    }
}

/// Review priority
pub static PRIORITY: Enumeration = Enumeration {
    name: "Priority",
    literals: &["All", "Low", "Medium", "High"],
};

/// Applicability scope
pub static SCOPE: Enumeration = Enumeration {
    name: "Scope",
    literals: &["All", "Not_Platinum", "Ada", "Automated"],
};

/// Assumption kind, one rendered document per literal
pub static ASSUMPTION_KIND: Enumeration = Enumeration {
    name: "Assumption_Kind",
    literals: &["All", "Part", "Modular", "Compiler"],
};

/// Tool a constraint applies to
pub static TOOL: Enumeration = Enumeration {
    name: "Tool",
    literals: &["GNAT_Compiler", "GNAT_Check", "SPARK"],
};

/// Whether a constraint is mandated, permitted or forbidden
pub static STATUS: Enumeration = Enumeration {
    name: "Status",
    literals: &["Required", "Allowed", "Banned"],
};

/// Switch or coding-standard rule
pub static CONSTRAINT_KIND: Enumeration = Enumeration {
    name: "Constraint_Kind",
    literals: &["Switch", "Rule"],
};

/// Placeholders accepted in place of a process step reference
pub const STEP_WILDCARDS: &[&str] = &["ALL", "VARIOUS"];

/// Member of a tuple field
#[derive(Debug)]
pub struct TupleMember {
    /// Member name
    pub name: &'static str,
    /// Scalar type of the member
    pub ty: FieldType,
    /// Absent members hold null
    pub optional: bool,
}

/// Type of a schema field
#[derive(Debug)]
pub enum FieldType {
    /// Free text
    String,
    /// Signed integer
    Integer,
    /// Boolean flag
    Boolean,
    /// Literal of an enumeration
    Enum(&'static Enumeration),
    /// Reference to a record of another (or the same) category
    Ref {
        /// Category of the referenced record
        target: Category,
        /// Meaning of the edge
        relation: RelationKind,
        /// Placeholder literals accepted instead of a name
        wildcards: &'static [&'static str],
    },
    /// Fixed set of named scalar members
    Tuple(&'static [TupleMember]),
    /// Ordered list of values of one type
    List(&'static FieldType),
}

impl FieldType {
    /// Target category and relation kind when this type carries references
    #[must_use]
    pub fn relation(&self) -> Option<(Category, RelationKind)> {
        match self {
            Self::Ref {
                target, relation, ..
            } => Some((*target, *relation)),
            Self::List(inner) => inner.relation(),
            _ => None,
        }
    }
}

/// Field declaration
#[derive(Debug)]
pub struct FieldSpec {
    /// Field name as written in record files
    pub name: &'static str,
    /// Value type
    pub ty: FieldType,
    /// Absent optional fields hold null
    pub optional: bool,
}

/// Field table for one category
#[derive(Debug)]
pub struct CategorySchema {
    /// Category described
    pub category: Category,
    /// Fields in declaration order
    pub fields: &'static [FieldSpec],
}

impl CategorySchema {
    /// Find a field declaration
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that hold references, with their target and relation kind
    pub fn reference_fields(
        &self,
    ) -> impl Iterator<Item = (&'static FieldSpec, Category, RelationKind)> {
        self.fields
            .iter()
            .filter_map(|f| f.ty.relation().map(|(target, relation)| (f, target, relation)))
    }
}

const fn required(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        ty,
        optional: false,
    }
}

const fn optional(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        ty,
        optional: true,
    }
}

const fn to_step(relation: RelationKind, wildcards: &'static [&'static str]) -> FieldType {
    FieldType::Ref {
        target: Category::ProcessStep,
        relation,
        wildcards,
    }
}

static STEP_REF: FieldType = to_step(RelationKind::AppliesTo, &[]);

static ASSUMPTION_TRACE: FieldType = FieldType::Ref {
    target: Category::Assumption,
    relation: RelationKind::Traces,
    wildcards: &[],
};

static ASSUMPTION_DEFERRAL: FieldType = FieldType::Ref {
    target: Category::Assumption,
    relation: RelationKind::DeferredTo,
    wildcards: &[],
};

static CLAUSE_SEE_ALSO: FieldType = FieldType::Ref {
    target: Category::ClauseTracing,
    relation: RelationKind::SeeAlso,
    wildcards: &[],
};

static TEXT: FieldType = FieldType::String;

static CLAUSE_COORDINATE: [TupleMember; 5] = [
    TupleMember {
        name: "part",
        ty: FieldType::Integer,
        optional: false,
    },
    TupleMember {
        name: "chapter",
        ty: FieldType::Integer,
        optional: false,
    },
    TupleMember {
        name: "sec",
        ty: FieldType::Integer,
        optional: true,
    },
    TupleMember {
        name: "subsec",
        ty: FieldType::Integer,
        optional: true,
    },
    TupleMember {
        name: "subsubsec",
        ty: FieldType::Integer,
        optional: true,
    },
];

static PROCESS_STEP: CategorySchema = CategorySchema {
    category: Category::ProcessStep,
    fields: &[
        optional("section", FieldType::String),
        optional("page", FieldType::String),
        optional("description", FieldType::String),
        optional("assumptions", FieldType::List(&ASSUMPTION_TRACE)),
    ],
};

static CHECKLIST_ITEM: CategorySchema = CategorySchema {
    category: Category::ChecklistItem,
    fields: &[
        optional("priority", FieldType::Enum(&PRIORITY)),
        required("scope", FieldType::Enum(&SCOPE)),
        required("automatable", FieldType::Boolean),
        required("manual", FieldType::Boolean),
        required("ext_review", FieldType::Boolean),
        required("step", to_step(RelationKind::AppliesTo, STEP_WILDCARDS)),
        optional("step_to", to_step(RelationKind::AppliesTo, &[])),
        optional("step_also", to_step(RelationKind::AppliesTo, &[])),
        optional("section", FieldType::String),
        required("text", FieldType::String),
    ],
};

static WORKLIST_ITEM: CategorySchema = CategorySchema {
    category: Category::WorklistItem,
    fields: &[
        required("section", FieldType::String),
        required("scope", FieldType::Enum(&SCOPE)),
        optional("priority", FieldType::Enum(&PRIORITY)),
        optional("step", to_step(RelationKind::AppliesTo, STEP_WILDCARDS)),
        required("text", FieldType::String),
    ],
};

static SWITCH_CONSTRAINT: CategorySchema = CategorySchema {
    category: Category::SwitchConstraint,
    fields: &[
        required("tool", FieldType::Enum(&TOOL)),
        required("kind", FieldType::Enum(&CONSTRAINT_KIND)),
        required("status", FieldType::Enum(&STATUS)),
        optional("warn_related", FieldType::Boolean),
        required("switches", FieldType::List(&TEXT)),
        required("rationale", FieldType::String),
        optional("steps", FieldType::List(&STEP_REF)),
    ],
};

static ASSUMPTION: CategorySchema = CategorySchema {
    category: Category::Assumption,
    fields: &[
        required("kind", FieldType::Enum(&ASSUMPTION_KIND)),
        required("text", FieldType::String),
        optional("deferred_to", FieldType::List(&ASSUMPTION_DEFERRAL)),
        optional("via_process_assumptions", FieldType::Boolean),
        optional("notes", FieldType::String),
    ],
};

static CLAUSE: CategorySchema = CategorySchema {
    category: Category::ClauseTracing,
    fields: &[
        required("ref", FieldType::Tuple(&CLAUSE_COORDINATE)),
        optional("subref", FieldType::String),
        optional("text", FieldType::String),
        optional("row", FieldType::String),
        optional("applies", FieldType::String),
        optional("steps", FieldType::List(&STEP_REF)),
        optional("ref_steps", FieldType::List(&CLAUSE_SEE_ALSO)),
        optional("alt_steps", FieldType::String),
        optional(
            "same_as",
            FieldType::Ref {
                target: Category::ClauseTracing,
                relation: RelationKind::SameAs,
                wildcards: &[],
            },
        ),
        optional("just", FieldType::String),
        optional("assumptions", FieldType::List(&ASSUMPTION_TRACE)),
    ],
};
