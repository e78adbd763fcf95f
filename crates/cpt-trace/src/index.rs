//! Bidirectional reference index
//!
//! Provides [`ReferenceIndex`] for inbound/outbound traversal of the record
//! graph and [`Resolver`], which builds the index lazily on first use.
//!
//! The index is built by a single scan of every record: each reference held
//! by a reference-typed field (including references inside lists and tuples)
//! becomes one [`Edge`].

use cpt_store::{Category, FieldError, Record, RecordId, RecordStore, RelationKind};
use once_cell::unsync::OnceCell;
use std::collections::HashMap;

/// One reference edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Record holding the reference
    pub source: RecordId,
    /// Referenced record
    pub target: RecordId,
    /// Field of the source holding the reference
    pub field: &'static str,
    /// Meaning of the edge
    pub relation: RelationKind,
}

/// Read-only index of every reference edge
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    edges: Vec<Edge>,
    /// (target, relation) -> distinct sources, declaration order
    inbound: HashMap<(RecordId, RelationKind), Vec<RecordId>>,
    /// source -> (field, target), field order
    outbound: HashMap<RecordId, Vec<(&'static str, RecordId)>>,
}

impl ReferenceIndex {
    /// Scan every record of the store once
    #[must_use]
    pub fn build(store: &RecordStore) -> Self {
        let mut index = Self::default();
        for record in store.records() {
            for (spec, _, relation) in record.category.schema().reference_fields() {
                for target in record.get(spec.name).references() {
                    index.insert(Edge {
                        source: record.id,
                        target,
                        field: spec.name,
                        relation,
                    });
                }
            }
        }
        tracing::debug!(edges = index.edges.len(), "reference index built");
        index
    }

    fn insert(&mut self, edge: Edge) {
        self.edges.push(edge);
        let sources = self.inbound.entry((edge.target, edge.relation)).or_default();
        // Sources are scanned in order, so a repeat is always the last entry.
        if sources.last() != Some(&edge.source) {
            sources.push(edge.source);
        }
        self.outbound
            .entry(edge.source)
            .or_default()
            .push((edge.field, edge.target));
    }

    /// Distinct sources referencing `target` under `relation`
    #[must_use]
    pub fn inbound(&self, target: RecordId, relation: RelationKind) -> &[RecordId] {
        self.inbound
            .get(&(target, relation))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Targets referenced by `field` of `source`
    #[must_use]
    pub fn outbound<'a>(
        &'a self,
        source: RecordId,
        field: &'a str,
    ) -> impl Iterator<Item = RecordId> + 'a {
        self.outbound
            .get(&source)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(|(_, target)| *target)
    }
}

/// Relation kind carried by a field, if it is reference-typed
#[must_use]
pub fn relation_of(category: Category, field: &str) -> Option<RelationKind> {
    category
        .schema()
        .field(field)
        .and_then(|spec| spec.ty.relation())
        .map(|(_, relation)| relation)
}

/// Lazily-indexed view of a store
#[derive(Debug)]
pub struct Resolver<'s> {
    store: &'s RecordStore,
    index: OnceCell<ReferenceIndex>,
}

impl<'s> Resolver<'s> {
    /// Create resolver; the index is built on first traversal
    #[inline]
    #[must_use]
    pub fn new(store: &'s RecordStore) -> Self {
        Self {
            store,
            index: OnceCell::new(),
        }
    }

    /// Underlying store
    #[must_use]
    pub fn store(&self) -> &'s RecordStore {
        self.store
    }

    /// The index, built on first call
    pub fn index(&self) -> &ReferenceIndex {
        self.index.get_or_init(|| ReferenceIndex::build(self.store))
    }

    /// Records referencing `record` under `relation`, in declaration order
    pub fn inbound(
        &self,
        record: &Record,
        relation: RelationKind,
    ) -> impl Iterator<Item = &'s Record> + '_ {
        let store = self.store;
        self.index()
            .inbound(record.id, relation)
            .iter()
            .map(move |id| store.record(*id))
    }

    /// Records referenced by `field` of `record`
    ///
    /// # Errors
    /// Returns [`FieldError::MissingField`] if the category has no such field.
    pub fn outbound<'a>(
        &'a self,
        record: &Record,
        field: &'a str,
    ) -> Result<impl Iterator<Item = &'s Record> + 'a, FieldError> {
        self.store.field(record, field)?;
        let store = self.store;
        Ok(self
            .index()
            .outbound(record.id, field)
            .map(move |id| store.record(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpt_store::{Location, RawRecord, RecordStoreBuilder};
    use proptest::prelude::*;

    fn assumption(name: &str) -> RawRecord {
        RawRecord::new("assumption", name, Location::new("a.yaml", 1))
            .with("kind", "All")
            .with("text", "t")
    }

    fn step(name: &str, traces: Vec<&str>) -> RawRecord {
        RawRecord::new("process_step", name, Location::new("s.yaml", 1)).with("assumptions", traces)
    }

    fn names<'a>(records: impl Iterator<Item = &'a Record>) -> Vec<&'a str> {
        records.map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn inbound_is_distinct_and_ordered() {
        let store = RecordStoreBuilder::new()
            .with(assumption("a"))
            .with(step("second", vec!["a", "a"]))
            .with(step("first", vec!["a"]))
            .build()
            .unwrap();
        let resolver = Resolver::new(&store);
        let a = store.lookup(Category::Assumption, "a").unwrap();

        assert_eq!(names(resolver.inbound(a, RelationKind::Traces)), vec!["second", "first"]);
        assert_eq!(resolver.inbound(a, RelationKind::DeferredTo).count(), 0);
        assert_eq!(resolver.index().edges.len(), 3);
    }

    #[test]
    fn outbound_follows_field() {
        let store = RecordStoreBuilder::new()
            .with(assumption("a"))
            .with(assumption("b"))
            .with(step("s", vec!["b", "a"]))
            .build()
            .unwrap();
        let resolver = Resolver::new(&store);
        let s = store.lookup(Category::ProcessStep, "s").unwrap();

        assert_eq!(names(resolver.outbound(s, "assumptions").unwrap()), vec!["b", "a"]);
        assert_eq!(resolver.outbound(s, "section").unwrap().count(), 0);
        assert!(resolver.outbound(s, "nope").is_err());
    }

    #[test]
    fn relation_of_reads_schema() {
        assert_eq!(
            relation_of(Category::ClauseTracing, "same_as"),
            Some(RelationKind::SameAs)
        );
        assert_eq!(relation_of(Category::ClauseTracing, "text"), None);
        assert_eq!(
            relation_of(Category::ChecklistItem, "step"),
            Some(RelationKind::AppliesTo)
        );
    }

    proptest! {
        #[test]
        fn resolution_is_symmetric(links in proptest::collection::vec(proptest::collection::vec(0usize..4, 0..5), 1..6)) {
            let mut builder = RecordStoreBuilder::new();
            for i in 0..4 {
                builder.push(assumption(&format!("a{i}")));
            }
            for (i, targets) in links.iter().enumerate() {
                let targets: Vec<String> = targets.iter().map(|t| format!("a{t}")).collect();
                builder.push(step(&format!("s{i}"), targets.iter().map(String::as_str).collect()));
            }
            let store = builder.build().unwrap();
            let resolver = Resolver::new(&store);

            for record in store.records() {
                for (spec, _, relation) in record.category.schema().reference_fields() {
                    for target in resolver.outbound(record, spec.name).unwrap() {
                        prop_assert!(resolver.inbound(target, relation).any(|r| r.id == record.id));
                    }
                }
            }
        }
    }
}
