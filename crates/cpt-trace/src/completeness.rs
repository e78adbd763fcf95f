//! Traceability completeness checking
//!
//! An [`Obligation`] requires every record of a category to be the target of
//! at least one reference of a given relation kind. A record may instead be
//! exempt through its deferral field: a list field of references to its own
//! category with relation kind `deferred-to`. The exemption holds when that
//! list is non-empty and names only other records.
//!
//! An assumption covered by the process assumptions page (its
//! `via_process_assumptions` flag) counts as traced.
//!
//! Deferral chains are not followed. A cycle of deferrals (`a → b → a`)
//! exempts every member of the cycle.

use crate::diagnostics::Diagnostics;
use crate::index::Resolver;
use cpt_store::{Category, FieldType, Location, Record, RecordId, RelationKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// (category, relation) pair every record of the category must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Obligation {
    /// Category under obligation
    pub category: Category,
    /// Required inbound relation
    pub relation: RelationKind,
}

impl Obligation {
    /// Create obligation
    #[inline]
    #[must_use]
    pub const fn new(category: Category, relation: RelationKind) -> Self {
        Self { category, relation }
    }
}

impl Default for Obligation {
    /// Every assumption must be traced
    fn default() -> Self {
        Self::new(Category::Assumption, RelationKind::Traces)
    }
}

/// Record failing an obligation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Offending record
    pub record: RecordId,
    /// Its name
    pub name: String,
    /// Its declaration site
    pub location: Location,
    /// Obligation not met
    pub obligation: Obligation,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Obligation { category, relation } = self.obligation;
        match relation {
            RelationKind::Traces => write!(f, "{category} '{}' is not traced in process", self.name),
            other => write!(
                f,
                "{category} '{}' has no inbound {other} reference and is not deferred",
                self.name
            ),
        }
    }
}

/// Checks obligations against the reference index
#[derive(Debug, Clone, Copy)]
pub struct CompletenessChecker<'r, 's> {
    resolver: &'r Resolver<'s>,
}

impl<'r, 's> CompletenessChecker<'r, 's> {
    /// Create checker
    #[inline]
    #[must_use]
    pub fn new(resolver: &'r Resolver<'s>) -> Self {
        Self { resolver }
    }

    /// Records of `category` failing the (`category`, `relation`) obligation
    #[must_use]
    pub fn check(&self, category: Category, relation: RelationKind) -> Vec<Violation> {
        let obligation = Obligation::new(category, relation);
        self.resolver
            .store()
            .iterate(category)
            .filter(|record| !self.is_satisfied(record, relation))
            .map(|record| Violation {
                record: record.id,
                name: record.name.clone(),
                location: record.location.clone(),
                obligation,
            })
            .collect()
    }

    /// Every violation of every obligation, in obligation order
    #[must_use]
    pub fn check_all(&self, obligations: &[Obligation]) -> Vec<Violation> {
        obligations
            .iter()
            .flat_map(|o| self.check(o.category, o.relation))
            .collect()
    }

    /// Whether a record is referenced under `relation` or validly deferred
    #[must_use]
    pub fn is_satisfied(&self, record: &Record, relation: RelationKind) -> bool {
        self.resolver.inbound(record, relation).next().is_some()
            || (relation == RelationKind::Traces && record.flag(VIA_PROCESS_ASSUMPTIONS))
            || self.deferral(record).is_some()
    }

    /// Deferral targets, when the record carries a valid exemption
    #[must_use]
    pub fn deferral(&self, record: &Record) -> Option<Vec<&'s Record>> {
        let field = deferral_field(record.category)?;
        let targets: Vec<&'s Record> = self.resolver.outbound(record, field).ok()?.collect();
        if targets.is_empty() || targets.iter().any(|t| t.id == record.id) {
            return None;
        }
        Some(targets)
    }

    /// Report violations as warnings
    pub fn report(violations: &[Violation], diagnostics: &mut Diagnostics) {
        for violation in violations {
            tracing::warn!(record = %violation.name, "completeness violation");
            diagnostics.warning(Some(&violation.location), violation.to_string());
        }
    }
}

/// Flag marking an assumption as traced by the process assumptions page
pub const VIA_PROCESS_ASSUMPTIONS: &str = "via_process_assumptions";

/// Name of the category's deferral field, if it has one
#[must_use]
pub fn deferral_field(category: Category) -> Option<&'static str> {
    category
        .schema()
        .fields
        .iter()
        .find(|spec| {
            matches!(
                spec.ty,
                FieldType::List(FieldType::Ref {
                    target,
                    relation: RelationKind::DeferredTo,
                    ..
                }) if *target == category
            )
        })
        .map(|spec| spec.name)
}
