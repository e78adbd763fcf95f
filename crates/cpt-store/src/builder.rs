//! Schema validation of raw records into a [`RecordStore`]
//!
//! The builder is the only way to obtain a store. File loading feeds it
//! decoded records; tests feed it hand-written ones.

use crate::error::{SchemaViolation, StoreError};
use crate::raw::{RawRecord, RawValue};
use crate::record::{EnumLiteral, FieldValue, Record, RecordId};
use crate::schema::{Category, FieldType, TupleMember};
use crate::store::RecordStore;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static RECORD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("record name pattern is valid"));

/// Collects raw records and validates them in one pass
#[derive(Debug, Clone, Default)]
pub struct RecordStoreBuilder {
    raw: Vec<RawRecord>,
}

impl RecordStoreBuilder {
    /// Create empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; declaration order is push order
    pub fn push(&mut self, record: RawRecord) -> &mut Self {
        self.raw.push(record);
        self
    }

    /// Append records
    pub fn extend(&mut self, records: impl IntoIterator<Item = RawRecord>) -> &mut Self {
        self.raw.extend(records);
        self
    }

    /// Builder-style append
    #[must_use]
    pub fn with(mut self, record: RawRecord) -> Self {
        self.raw.push(record);
        self
    }

    /// Number of pending records
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether no record was pushed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Validate every record against the schema
    ///
    /// All violations are collected before failing.
    ///
    /// # Errors
    /// Returns [`StoreError::Invalid`] listing every schema violation.
    pub fn build(self) -> Result<RecordStore, StoreError> {
        let mut violations = Vec::new();

        // Names first, so references may point forward.
        let mut accepted: Vec<(Category, RawRecord)> = Vec::with_capacity(self.raw.len());
        let mut names: HashMap<(Category, String), RecordId> = HashMap::new();
        for raw in self.raw {
            let Some(category) = Category::from_tag(&raw.category) else {
                violations.push(SchemaViolation::new(
                    raw.location.clone(),
                    format!("unknown category '{}'", raw.category),
                ));
                continue;
            };
            if !RECORD_NAME.is_match(&raw.name) {
                violations.push(SchemaViolation::new(
                    raw.location.clone(),
                    format!("invalid record name '{}'", raw.name),
                ));
                continue;
            }
            let key = (category, raw.name.clone());
            if let Some(previous) = names.get(&key) {
                let first = &accepted[previous.index()].1.location;
                violations.push(SchemaViolation::new(
                    raw.location.clone(),
                    format!("duplicate {category} '{}' (first declared at {first})", raw.name),
                ));
                continue;
            }
            let id = RecordId(u32::try_from(accepted.len()).unwrap_or(u32::MAX));
            names.insert(key, id);
            accepted.push((category, raw));
        }

        let mut records = Vec::with_capacity(accepted.len());
        for (index, (category, raw)) in accepted.into_iter().enumerate() {
            let schema = category.schema();
            let mut problems = Vec::new();

            for key in raw.fields.keys() {
                if schema.field(key).is_none() {
                    problems.push(format!("{category} has no field '{key}'"));
                }
            }

            let mut fields = IndexMap::with_capacity(schema.fields.len());
            for spec in schema.fields {
                let value = match raw.fields.get(spec.name) {
                    None | Some(RawValue::Null) => {
                        if !spec.optional {
                            problems.push(format!("missing required field '{}'", spec.name));
                        }
                        FieldValue::Null
                    }
                    Some(raw_value) => match convert(&spec.ty, raw_value, &names) {
                        Ok(v) => v,
                        Err(message) => {
                            problems.push(format!("field '{}': {message}", spec.name));
                            FieldValue::Null
                        }
                    },
                };
                fields.insert(spec.name, value);
            }

            violations.extend(
                problems
                    .into_iter()
                    .map(|m| SchemaViolation::new(raw.location.clone(), m)),
            );

            records.push(Record {
                id: RecordId(u32::try_from(index).unwrap_or(u32::MAX)),
                category,
                name: raw.name,
                location: raw.location,
                fields,
            });
        }

        if !violations.is_empty() {
            tracing::warn!(count = violations.len(), "record store failed schema validation");
            return Err(StoreError::Invalid { violations });
        }

        tracing::debug!(records = records.len(), "record store validated");
        Ok(RecordStore::from_records(records))
    }
}

fn convert(
    ty: &FieldType,
    raw: &RawValue,
    names: &HashMap<(Category, String), RecordId>,
) -> Result<FieldValue, String> {
    match (ty, raw) {
        (FieldType::String, RawValue::Str(s)) => Ok(FieldValue::Str(s.clone())),
        (FieldType::String, RawValue::Int(i)) => Ok(FieldValue::Str(i.to_string())),
        (FieldType::Integer, RawValue::Int(i)) => Ok(FieldValue::Int(*i)),
        (FieldType::Integer, RawValue::Str(s)) => s
            .trim()
            .parse()
            .map(FieldValue::Int)
            .map_err(|_| format!("expected integer, found '{s}'")),
        (FieldType::Boolean, RawValue::Bool(b)) => Ok(FieldValue::Bool(*b)),
        (FieldType::Boolean, RawValue::Str(s)) if s.eq_ignore_ascii_case("true") => {
            Ok(FieldValue::Bool(true))
        }
        (FieldType::Boolean, RawValue::Str(s)) if s.eq_ignore_ascii_case("false") => {
            Ok(FieldValue::Bool(false))
        }
        (FieldType::Enum(enumeration), RawValue::Str(s)) => enumeration
            .resolve(s)
            .map(|literal| {
                FieldValue::Enum(EnumLiteral {
                    enumeration: enumeration.name,
                    literal,
                })
            })
            .ok_or_else(|| format!("'{s}' is not a literal of {}", enumeration.name)),
        (
            FieldType::Ref {
                target, wildcards, ..
            },
            RawValue::Str(s),
        ) => {
            if let Some(w) = wildcards.iter().copied().find(|w| *w == s.as_str()) {
                return Ok(FieldValue::Wildcard(w));
            }
            let bare = s.rsplit('.').next().unwrap_or(s);
            names
                .get(&(*target, bare.to_string()))
                .map(|id| FieldValue::Ref(*id))
                .ok_or_else(|| format!("reference to unknown {target} '{s}'"))
        }
        (FieldType::Tuple(members), RawValue::Map(map)) => convert_tuple(members, map, names),
        (FieldType::Tuple(members), RawValue::List(items)) => {
            if items.len() > members.len() {
                return Err(format!(
                    "expected at most {} tuple members, found {}",
                    members.len(),
                    items.len()
                ));
            }
            let map = members
                .iter()
                .zip(items)
                .map(|(m, v)| (m.name.to_string(), v.clone()))
                .collect();
            convert_tuple(members, &map, names)
        }
        (FieldType::List(inner), RawValue::List(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                RawValue::Null => Err(format!("item {i} is null")),
                other => convert(inner, other, names).map_err(|e| format!("item {i}: {e}")),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::List),
        (FieldType::List(inner), scalar) => {
            convert(inner, scalar, names).map(|v| FieldValue::List(vec![v]))
        }
        (ty, raw) => Err(format!("expected {}, found {}", type_name(ty), raw.kind())),
    }
}

fn convert_tuple(
    members: &[TupleMember],
    map: &IndexMap<String, RawValue>,
    names: &HashMap<(Category, String), RecordId>,
) -> Result<FieldValue, String> {
    if let Some(unknown) = map.keys().find(|k| !members.iter().any(|m| m.name == k.as_str())) {
        return Err(format!("unknown tuple member '{unknown}'"));
    }
    let mut out = IndexMap::with_capacity(members.len());
    for member in members {
        let value = match map.get(member.name) {
            None | Some(RawValue::Null) if member.optional => FieldValue::Null,
            None | Some(RawValue::Null) => {
                return Err(format!("missing tuple member '{}'", member.name))
            }
            Some(v) => convert(&member.ty, v, names)
                .map_err(|e| format!("member '{}': {e}", member.name))?,
        };
        out.insert(member.name, value);
    }
    Ok(FieldValue::Tuple(out))
}

fn type_name(ty: &FieldType) -> String {
    match ty {
        FieldType::String => "string".into(),
        FieldType::Integer => "integer".into(),
        FieldType::Boolean => "boolean".into(),
        FieldType::Enum(e) => format!("{} literal", e.name),
        FieldType::Ref { target, .. } => format!("{target} reference"),
        FieldType::Tuple(_) => "tuple".into(),
        FieldType::List(inner) => format!("list of {}", type_name(inner)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Location;
    use pretty_assertions::assert_eq;

    fn at(line: usize) -> Location {
        Location::new("test.yaml", line)
    }

    fn step(name: &str, line: usize) -> RawRecord {
        RawRecord::new("process_step", name, at(line))
    }

    fn assumption(name: &str, line: usize) -> RawRecord {
        RawRecord::new("assumption", name, at(line))
            .with("kind", "Part")
            .with("text", "Some assumption")
    }

    fn messages(err: &StoreError) -> Vec<String> {
        err.violations().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn absent_optional_fields_are_null() {
        let store = RecordStoreBuilder::new()
            .with(step("review_code", 1))
            .build()
            .unwrap();
        let record = store.iterate(Category::ProcessStep).next().unwrap();
        assert_eq!(record.fields.len(), 4);
        assert!(record.get("section").is_null());
    }

    #[test]
    fn forward_references_resolve() {
        let store = RecordStoreBuilder::new()
            .with(step("review_code", 1).with("assumptions", vec!["Defs.no_alias"]))
            .with(assumption("no_alias", 5))
            .build()
            .unwrap();
        let step = store.lookup(Category::ProcessStep, "review_code").unwrap();
        let target = store.dereference(&step.get("assumptions").items()[0]).unwrap();
        assert_eq!(target.name, "no_alias");
    }

    #[test]
    fn every_violation_is_reported() {
        let err = RecordStoreBuilder::new()
            .with(step("review_code", 1))
            .with(step("review_code", 3))
            .with(RawRecord::new("widget", "w", at(5)))
            .with(RawRecord::new("process_step", "9lives", at(7)))
            .with(step("other", 9).with("colour", "red"))
            .with(RawRecord::new("assumption", "a", at(11)).with("kind", "Sideways"))
            .with(step("linked", 13).with("assumptions", vec!["missing"]))
            .build()
            .unwrap_err();
        assert_eq!(
            messages(&err),
            vec![
                "test.yaml:3: duplicate process_step 'review_code' (first declared at test.yaml:1)",
                "test.yaml:5: unknown category 'widget'",
                "test.yaml:7: invalid record name '9lives'",
                "test.yaml:9: process_step has no field 'colour'",
                "test.yaml:11: field 'kind': 'Sideways' is not a literal of Assumption_Kind",
                "test.yaml:11: missing required field 'text'",
                "test.yaml:13: field 'assumptions': item 0: reference to unknown assumption 'missing'",
            ]
        );
    }

    #[test]
    fn step_wildcards_are_kept() {
        let store = RecordStoreBuilder::new()
            .with(
                RawRecord::new("checklist_item", "item_1_1", at(1))
                    .with("scope", "All")
                    .with("automatable", true)
                    .with("manual", false)
                    .with("ext_review", false)
                    .with("step", "VARIOUS")
                    .with("text", "Check it."),
            )
            .build()
            .unwrap();
        let item = store.iterate(Category::ChecklistItem).next().unwrap();
        assert_eq!(item.get("step").as_wildcard(), Some("VARIOUS"));
    }

    #[test]
    fn clause_coordinate_accepts_mapping_and_list() {
        let mut coordinate = IndexMap::new();
        coordinate.insert("part".to_string(), RawValue::Int(6));
        coordinate.insert("chapter".to_string(), RawValue::Int(8));
        coordinate.insert("sec".to_string(), RawValue::Int(4));
        let store = RecordStoreBuilder::new()
            .with(RawRecord::new("clause", "p6_8_4", at(1)).with("ref", RawValue::Map(coordinate)))
            .with(RawRecord::new("clause", "p6_9", at(2)).with("ref", vec![6_i64, 9]))
            .build()
            .unwrap();
        let clauses: Vec<_> = store.iterate(Category::ClauseTracing).collect();
        assert_eq!(clauses[0].get("ref").member("sec"), &FieldValue::Int(4));
        assert!(clauses[1].get("ref").member("sec").is_null());
        assert_eq!(clauses[1].get("ref").member("chapter"), &FieldValue::Int(9));
    }

    #[test]
    fn tuple_rejects_missing_and_unknown_members() {
        let mut coordinate = IndexMap::new();
        coordinate.insert("part".to_string(), RawValue::Int(6));
        coordinate.insert("clause".to_string(), RawValue::Int(1));
        let err = RecordStoreBuilder::new()
            .with(RawRecord::new("clause", "bad", at(4)).with("ref", RawValue::Map(coordinate)))
            .with(RawRecord::new("clause", "short", at(8)).with("ref", vec![6_i64]))
            .build()
            .unwrap_err();
        assert_eq!(
            messages(&err),
            vec![
                "test.yaml:4: field 'ref': unknown tuple member 'clause'",
                "test.yaml:8: field 'ref': missing tuple member 'chapter'",
            ]
        );
    }
}
