//! Identifier derivation for switch and rule constraints
//!
//! A constraint's identifier is computed from its tool, kind, status and
//! switch list:
//!
//! ```text
//! GNAT_Compiler, Switch, ["-gnatw.a"]       → Compiler_Switch_Warning_Lowercase_Dot_a
//! GNAT_Check,    Rule,   ["+RGoto_Statements"] → Check_Rule_Plus_RGoto_Statements
//! SPARK,         Switch, ["-j0", "--level"] → SPARK_Switch_Group_1
//! ```
//!
//! Group numbering is per tool and carried explicitly in [`GroupCounters`].

use std::fmt;

/// Tool a constraint applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// GNAT compiler
    GnatCompiler,
    /// GNATcheck coding standard checker
    GnatCheck,
    /// SPARK prover
    Spark,
}

impl Tool {
    /// Parse a `Tool` enumeration literal
    #[must_use]
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "GNAT_Compiler" => Some(Self::GnatCompiler),
            "GNAT_Check" => Some(Self::GnatCheck),
            "SPARK" => Some(Self::Spark),
            _ => None,
        }
    }

    /// Identifier prefix
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::GnatCompiler => "Compiler_",
            Self::GnatCheck => "Check_",
            Self::Spark => "SPARK_",
        }
    }

    /// Display name
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::GnatCompiler => "GNAT compiler",
            Self::GnatCheck => "GNATcheck",
            Self::Spark => "SPARK",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Switch or coding-standard rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Command-line switch
    Switch,
    /// Checker rule
    Rule,
}

impl ConstraintKind {
    /// Parse a `Constraint_Kind` literal
    #[must_use]
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "Switch" => Some(Self::Switch),
            "Rule" => Some(Self::Rule),
            _ => None,
        }
    }
}

/// Whether a constraint is mandated, permitted or forbidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Must be used
    Required,
    /// May be used
    Allowed,
    /// Must not be used
    Banned,
}

impl Status {
    /// Parse a `Status` literal
    #[must_use]
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "Required" => Some(Self::Required),
            "Allowed" => Some(Self::Allowed),
            "Banned" => Some(Self::Banned),
            _ => None,
        }
    }
}

/// Per-tool counters for multi-switch groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupCounters {
    counts: [u32; 3],
}

impl GroupCounters {
    /// Fresh counters, all at zero
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the tool's counter and return the new value (first is 1)
    pub fn next(&mut self, tool: Tool) -> u32 {
        let slot = &mut self.counts[tool.slot()];
        *slot += 1;
        *slot
    }
}

/// Inputs of identifier derivation
#[derive(Debug, Clone, Copy)]
pub struct ConstraintSpec<'a> {
    /// Tool
    pub tool: Tool,
    /// Switch or rule
    pub kind: ConstraintKind,
    /// Status
    pub status: Status,
    /// Switch entries; the first word of each entry is the switch, the rest a note
    pub switches: &'a [String],
}

struct Override {
    tool: Tool,
    kind: ConstraintKind,
    status: Option<Status>,
    stem: &'static str,
    identifier: &'static str,
}

const OVERRIDES: &[Override] = &[
    Override {
        tool: Tool::Spark,
        kind: ConstraintKind::Switch,
        status: None,
        stem: "u",
        identifier: "SPARK_Switch_Lowercase_U",
    },
    Override {
        tool: Tool::Spark,
        kind: ConstraintKind::Switch,
        status: None,
        stem: "U",
        identifier: "SPARK_Switch_Uppercase_U",
    },
    Override {
        tool: Tool::Spark,
        kind: ConstraintKind::Switch,
        status: Some(Status::Banned),
        stem: "prover",
        identifier: "SPARK_Switch_Banned_Provers",
    },
];

/// Literal substitutions, applied in order
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("-", "_"),
    (":", "_"),
    ("+", "Plus_"),
    ("-", "Minus_"),
    ("<", ""),
    (">", ""),
    (".", "_Dot_"),
];

/// Switch part of a switch entry (first word)
#[must_use]
pub fn switch_of(entry: &str) -> &str {
    entry.split_whitespace().next().unwrap_or("")
}

/// Note part of a switch entry (everything after the first word)
#[must_use]
pub fn note_of(entry: &str) -> Option<&str> {
    entry
        .trim()
        .split_once(char::is_whitespace)
        .map(|(_, note)| note.trim())
        .filter(|note| !note.is_empty())
}

/// Derive the identifier of a constraint
///
/// Multi-switch constraints consume a group number from `counters`.
pub fn derive_identifier(spec: &ConstraintSpec<'_>, counters: &mut GroupCounters) -> String {
    let mut id = String::from(spec.tool.prefix());
    id.push_str(match spec.kind {
        ConstraintKind::Switch => "Switch_",
        ConstraintKind::Rule => "Rule_",
    });

    let [entry] = spec.switches else {
        id.push_str(&format!("Group_{}", counters.next(spec.tool)));
        return id;
    };

    let stem = stem_of(switch_of(entry), spec.kind);
    if let Some(o) = OVERRIDES.iter().find(|o| {
        o.tool == spec.tool
            && o.kind == spec.kind
            && o.status.map_or(true, |s| s == spec.status)
            && o.stem == stem
    }) {
        return o.identifier.to_string();
    }

    id.push_str(&stem);
    if let Some((head, tail)) = id.split_once("gnatw") {
        let first = tail.trim_start_matches(['.', '_']).chars().next();
        let case = if first.is_some_and(char::is_uppercase) {
            "Warning_Uppercase"
        } else {
            "Warning_Lowercase"
        };
        id = format!("{head}{case}{}", tail.replace('_', "_Underscore_"));
    }
    for (from, to) in SUBSTITUTIONS {
        id = id.replace(from, to);
    }
    id
}

fn stem_of(switch: &str, kind: ConstraintKind) -> String {
    let stripped = switch.trim_start_matches(['-', '_']);
    match kind {
        ConstraintKind::Switch => stripped
            .split_once('=')
            .map_or(stripped, |(stem, _)| stem)
            .to_string(),
        ConstraintKind::Rule => stripped.replace("=>", "_"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn derive(tool: Tool, kind: ConstraintKind, status: Status, switches: &[&str]) -> String {
        let switches: Vec<String> = switches.iter().map(ToString::to_string).collect();
        derive_identifier(
            &ConstraintSpec {
                tool,
                kind,
                status,
                switches: &switches,
            },
            &mut GroupCounters::new(),
        )
    }

    #[test]
    fn single_switch_uses_stem() {
        assert_eq!(
            derive(Tool::Spark, ConstraintKind::Switch, Status::Required, &["--level=2"]),
            "SPARK_Switch_level"
        );
        assert_eq!(
            derive(Tool::GnatCompiler, ConstraintKind::Switch, Status::Required, &["-gnato13"]),
            "Compiler_Switch_gnato13"
        );
    }

    #[test]
    fn warning_switches_encode_case() {
        assert_eq!(
            derive(Tool::GnatCompiler, ConstraintKind::Switch, Status::Required, &["-gnatwa"]),
            "Compiler_Switch_Warning_Lowercasea"
        );
        assert_eq!(
            derive(Tool::GnatCompiler, ConstraintKind::Switch, Status::Banned, &["-gnatw.X"]),
            "Compiler_Switch_Warning_Uppercase_Dot_X"
        );
        assert_eq!(
            derive(Tool::GnatCompiler, ConstraintKind::Switch, Status::Allowed, &["-gnatw_a"]),
            "Compiler_Switch_Warning_Lowercase_Underscore_a"
        );
    }

    #[test]
    fn rules_rewrite_arrows_and_signs() {
        assert_eq!(
            derive(
                Tool::GnatCheck,
                ConstraintKind::Rule,
                Status::Required,
                &["+RMetrics_Cyclomatic_Complexity=>10"]
            ),
            "Check_Rule_Plus_RMetrics_Cyclomatic_Complexity_10"
        );
        assert_eq!(
            derive(Tool::GnatCheck, ConstraintKind::Rule, Status::Required, &["<x>:y"]),
            "Check_Rule_x_y"
        );
    }

    #[test]
    fn hyphen_folds_before_minus_rule() {
        assert_eq!(
            derive(Tool::Spark, ConstraintKind::Switch, Status::Allowed, &["--no-loop-unrolling"]),
            "SPARK_Switch_no_loop_unrolling"
        );
    }

    #[test]
    fn overrides_take_precedence() {
        assert_eq!(
            derive(Tool::Spark, ConstraintKind::Switch, Status::Allowed, &["-u"]),
            "SPARK_Switch_Lowercase_U"
        );
        assert_eq!(
            derive(Tool::Spark, ConstraintKind::Switch, Status::Allowed, &["-U"]),
            "SPARK_Switch_Uppercase_U"
        );
        assert_eq!(
            derive(Tool::Spark, ConstraintKind::Switch, Status::Banned, &["--prover=z3"]),
            "SPARK_Switch_Banned_Provers"
        );
        assert_eq!(
            derive(Tool::Spark, ConstraintKind::Switch, Status::Required, &["--prover=all"]),
            "SPARK_Switch_prover"
        );
    }

    #[test]
    fn groups_count_per_tool() {
        let switches: Vec<String> = vec!["-j0".into(), "--level".into()];
        let spec = |tool| ConstraintSpec {
            tool,
            kind: ConstraintKind::Switch,
            status: Status::Required,
            switches: &switches,
        };
        let mut counters = GroupCounters::new();
        assert_eq!(derive_identifier(&spec(Tool::Spark), &mut counters), "SPARK_Switch_Group_1");
        assert_eq!(
            derive_identifier(&spec(Tool::GnatCompiler), &mut counters),
            "Compiler_Switch_Group_1"
        );
        assert_eq!(derive_identifier(&spec(Tool::Spark), &mut counters), "SPARK_Switch_Group_2");
    }

    #[test]
    fn entries_split_switch_and_note() {
        assert_eq!(switch_of("-gnatwa  enables most warnings"), "-gnatwa");
        assert_eq!(note_of("-gnatwa  enables most warnings"), Some("enables most warnings"));
        assert_eq!(note_of("-gnatwa"), None);
    }

    proptest! {
        #[test]
        fn identifiers_are_plain_words(stem in "[a-zA-Z0-9_.:+<>-]{1,12}") {
            let id = derive(Tool::GnatCheck, ConstraintKind::Rule, Status::Required, &[stem.as_str()]);
            prop_assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        }
    }
}
