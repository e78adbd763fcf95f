//! Priority and scope filters for checklist-like documents

use cpt_store::Record;
use std::fmt;
use std::str::FromStr;

/// Checklist priority, ordered by rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    /// No priority; also the rank of records without one
    #[default]
    All,
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
}

impl Priority {
    /// Priority of a literal of the `Priority` enumeration
    #[must_use]
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "All" => Some(Self::All),
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }

    /// Priority carried by a record; absent means [`Priority::All`]
    #[must_use]
    pub fn of(record: &Record) -> Self {
        record
            .literal("priority")
            .and_then(Self::from_literal)
            .unwrap_or_default()
    }

    /// Numeric rank, 0 to 3
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "All",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err("minimum priority must be all, low, medium, or high".to_string()),
        }
    }
}

/// Which records a document admits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderFilter {
    /// Records ranked below are skipped
    pub min_priority: Priority,
    /// When set, only records of this scope literal
    pub scope: Option<String>,
}

impl RenderFilter {
    /// Filter admitting everything
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set minimum priority
    #[must_use]
    pub fn with_min_priority(mut self, priority: Priority) -> Self {
        self.min_priority = priority;
        self
    }

    /// Restrict to one scope literal
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Whether the record passes both filters
    #[must_use]
    pub fn admits(&self, record: &Record) -> bool {
        if Priority::of(record) < self.min_priority {
            return false;
        }
        match &self.scope {
            Some(scope) => record.literal("scope") == Some(scope.as_str()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpt_test_utils::{checklist_item, store_of};

    #[test]
    fn ranks_follow_declaration() {
        assert_eq!(Priority::All.rank(), 0);
        assert_eq!(Priority::High.rank(), 3);
        assert!(Priority::Low < Priority::Medium);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("MEDIUM".parse::<Priority>(), Ok(Priority::Medium));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn missing_priority_counts_as_all() {
        let store = store_of([checklist_item("item_1", "High", "All")
            .with("priority", cpt_store::RawValue::Null)]);
        let record = &store.records()[0];
        assert_eq!(Priority::of(record), Priority::All);
        assert!(RenderFilter::new().admits(record));
        assert!(!RenderFilter::new()
            .with_min_priority(Priority::Low)
            .admits(record));
    }

    #[test]
    fn scope_restriction() {
        let store = store_of([
            checklist_item("item_1", "High", "All"),
            checklist_item("item_2", "High", "Ada"),
        ]);
        let filter = RenderFilter::new().with_scope("Ada");
        let admitted: Vec<_> = store
            .records()
            .iter()
            .filter(|r| filter.admits(r))
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(admitted, vec!["item_2"]);
    }
}
