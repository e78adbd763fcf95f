//! Read-only record store

use crate::builder::RecordStoreBuilder;
use crate::error::{FieldError, StoreError};
use crate::parsers::{default_parsers, ParserRegistry};
use crate::record::{FieldValue, Record, RecordId};
use crate::schema::Category;
use std::collections::HashMap;
use std::path::Path;

/// Validated, immutable set of records
///
/// Records keep declaration order: file order first, then position inside
/// the file. Nothing mutates a store after [`RecordStoreBuilder::build`].
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    by_category: [Vec<RecordId>; 6],
    by_name: HashMap<(Category, String), RecordId>,
}

impl RecordStore {
    pub(crate) fn from_records(records: Vec<Record>) -> Self {
        let mut by_category: [Vec<RecordId>; 6] = Default::default();
        let mut by_name = HashMap::with_capacity(records.len());
        for record in &records {
            by_category[record.category.index()].push(record.id);
            by_name.insert((record.category, record.name.clone()), record.id);
        }
        Self {
            records,
            by_category,
            by_name,
        }
    }

    /// Load record files in order with the built-in parsers
    ///
    /// # Errors
    /// Fails on unreadable or malformed files and on any schema violation.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, StoreError> {
        Self::load_with(&default_parsers(), paths)
    }

    /// Load record files in order with a custom parser registry
    ///
    /// # Errors
    /// Fails on unreadable or malformed files and on any schema violation.
    pub fn load_with<P: AsRef<Path>>(
        registry: &ParserRegistry,
        paths: &[P],
    ) -> Result<Self, StoreError> {
        let mut builder = RecordStoreBuilder::new();
        for path in paths {
            let path = path.as_ref();
            let records = registry.parse_file(path)?;
            tracing::info!(file = %path.display(), records = records.len(), "loaded record file");
            builder.extend(records);
        }
        builder.build()
    }

    /// Records of one category in declaration order
    ///
    /// Each call starts a fresh walk.
    pub fn iterate(&self, category: Category) -> impl Iterator<Item = &Record> + '_ {
        self.by_category[category.index()]
            .iter()
            .map(move |id| &self.records[id.index()])
    }

    /// All records in declaration order
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Record by key
    ///
    /// # Panics
    /// Panics if `id` was issued by another store.
    #[must_use]
    pub fn record(&self, id: RecordId) -> &Record {
        &self.records[id.index()]
    }

    /// Record by category and name
    #[must_use]
    pub fn lookup(&self, category: Category, name: &str) -> Option<&Record> {
        self.by_name
            .get(&(category, name.to_string()))
            .map(|id| self.record(*id))
    }

    /// Field of a record, checked against the category schema
    ///
    /// # Errors
    /// Returns [`FieldError::MissingField`] if the schema declares no such field.
    pub fn field<'r>(&self, record: &'r Record, name: &str) -> Result<&'r FieldValue, FieldError> {
        record
            .fields
            .get(name)
            .ok_or_else(|| FieldError::MissingField {
                category: record.category,
                field: name.to_string(),
            })
    }

    /// Follow a reference value
    ///
    /// # Errors
    /// Returns [`FieldError::NotAReference`] for any other value.
    pub fn dereference(&self, value: &FieldValue) -> Result<&Record, FieldError> {
        value
            .as_record()
            .map(|id| self.record(id))
            .ok_or(FieldError::NotAReference)
    }

    /// Number of records of one category
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.by_category[category.index()].len()
    }

    /// Total number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no record
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawRecord;
    use crate::record::Location;

    fn store() -> RecordStore {
        let at = |line| Location::new("s.yaml", line);
        RecordStoreBuilder::new()
            .with(RawRecord::new("process_step", "first", at(1)))
            .with(
                RawRecord::new("assumption", "a", at(2))
                    .with("kind", "All")
                    .with("text", "t"),
            )
            .with(RawRecord::new("process_step", "second", at(3)).with("section", "4.2"))
            .build()
            .unwrap()
    }

    #[test]
    fn iterate_is_restartable_and_ordered() {
        let store = store();
        let names = |s: &RecordStore| {
            s.iterate(Category::ProcessStep)
                .map(|r| r.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&store), vec!["first", "second"]);
        assert_eq!(names(&store), names(&store));
        assert_eq!(store.count(Category::ChecklistItem), 0);
    }

    #[test]
    fn field_checks_schema() {
        let store = store();
        let step = store.lookup(Category::ProcessStep, "second").unwrap();
        assert_eq!(store.field(step, "section").unwrap().as_str(), Some("4.2"));
        assert!(store.field(step, "page").unwrap().is_null());
        assert_eq!(
            store.field(step, "priority"),
            Err(FieldError::MissingField {
                category: Category::ProcessStep,
                field: "priority".into()
            })
        );
    }

    #[test]
    fn dereference_rejects_non_references() {
        let store = store();
        assert_eq!(
            store.dereference(&FieldValue::Int(1)).unwrap_err(),
            FieldError::NotAReference
        );
    }
}
