// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory store state: tables of records keyed by primary key.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use till_core::{IndexSpec, Record, RecordKey, SchemaDefinition};

/// How an insert treats an existing record with the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertMode {
    /// Replace any existing record
    Put,
    /// Fail if the key exists
    Add,
}

/// A named collection of records sharing a primary key field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRepr", into = "TableRepr")]
pub struct Table {
    spec: IndexSpec,
    /// Next key handed out by `++` primary keys
    next_id: i64,
    records: BTreeMap<RecordKey, Record>,
}

/// On-disk form of a table: records as a list, keys rebuilt on load.
#[derive(Serialize, Deserialize)]
struct TableRepr {
    spec: IndexSpec,
    next_id: i64,
    records: Vec<Record>,
}

impl TryFrom<TableRepr> for Table {
    type Error = String;

    fn try_from(repr: TableRepr) -> Result<Self, Self::Error> {
        let pk = repr.spec.primary_key().field.clone();
        let mut records = BTreeMap::new();
        for record in repr.records {
            let key = RecordKey::from_record(&record, &pk)
                .ok_or_else(|| format!("record without primary key '{pk}'"))?;
            records.insert(key, record);
        }
        Ok(Self {
            spec: repr.spec,
            next_id: repr.next_id,
            records,
        })
    }
}

impl From<Table> for TableRepr {
    fn from(table: Table) -> Self {
        Self {
            spec: table.spec,
            next_id: table.next_id,
            records: table.records.into_values().collect(),
        }
    }
}

fn constraint(table: &str, reason: impl Into<String>) -> StoreError {
    StoreError::Constraint {
        table: table.to_string(),
        reason: reason.into(),
    }
}

/// True if `candidate` (a stored field value) matches `value`, expanding
/// arrays for multi-entry indexes.
fn field_matches(candidate: Option<&Value>, value: &Value, multi_entry: bool) -> bool {
    match candidate {
        None | Some(Value::Null) => false,
        Some(Value::Array(items)) if multi_entry => items.iter().any(|item| item == value),
        Some(candidate) => candidate == value,
    }
}

impl Table {
    pub fn new(spec: IndexSpec) -> Self {
        Self {
            spec,
            next_id: 1,
            records: BTreeMap::new(),
        }
    }

    pub fn spec(&self) -> &IndexSpec {
        &self.spec
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &RecordKey) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn records(&self) -> impl Iterator<Item = (&RecordKey, &Record)> {
        self.records.iter()
    }

    /// Records whose indexed `field` equals `value`.
    pub(crate) fn where_equals(
        &self,
        name: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Record>, StoreError> {
        if self.spec.primary_key().field == field {
            return Ok(RecordKey::from_value(value)
                .and_then(|key| self.records.get(&key))
                .cloned()
                .into_iter()
                .collect());
        }
        let index = self.spec.index(field).ok_or_else(|| StoreError::NotIndexed {
            table: name.to_string(),
            field: field.to_string(),
        })?;
        Ok(self
            .records
            .values()
            .filter(|r| field_matches(r.get(field), value, index.multi_entry))
            .cloned()
            .collect())
    }

    /// Insert a record, assigning an auto-increment key when needed.
    pub(crate) fn insert(
        &mut self,
        name: &str,
        mut record: Record,
        mode: InsertMode,
    ) -> Result<RecordKey, StoreError> {
        let pk = self.spec.primary_key().clone();
        let key = match RecordKey::from_record(&record, &pk.field) {
            Some(key) => key,
            None if pk.auto_increment => {
                let key = RecordKey::Int(self.next_id);
                record.insert(pk.field.clone(), key.to_value());
                key
            }
            None => {
                return Err(constraint(
                    name,
                    format!("record has no usable primary key '{}'", pk.field),
                ))
            }
        };

        if mode == InsertMode::Add && self.records.contains_key(&key) {
            return Err(constraint(name, format!("key {key} already exists")));
        }
        self.check_unique(name, &key, &record)?;

        if let (true, RecordKey::Int(n)) = (pk.auto_increment, &key) {
            self.next_id = self.next_id.max(n.saturating_add(1));
        }
        self.records.insert(key.clone(), record);
        Ok(key)
    }

    fn check_unique(&self, name: &str, key: &RecordKey, record: &Record) -> Result<(), StoreError> {
        for index in self.spec.indexes().iter().filter(|i| i.unique) {
            let Some(value) = record.get(&index.field).filter(|v| !v.is_null()) else {
                continue;
            };
            let clash = self
                .records
                .iter()
                .any(|(k, r)| k != key && r.get(&index.field) == Some(value));
            if clash {
                return Err(constraint(
                    name,
                    format!("duplicate value {value} for unique index '{}'", index.field),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &RecordKey) -> Option<Record> {
        self.records.remove(key)
    }

    pub(crate) fn clear(&mut self) -> usize {
        let n = self.records.len();
        self.records.clear();
        n
    }

    /// Replace the index specification during an upgrade.
    ///
    /// Returns the reason when the change is not possible in place.
    fn redeclare(&mut self, spec: &IndexSpec) -> Result<(), String> {
        if self.spec.primary_key() != spec.primary_key() {
            return Err(format!(
                "primary key changed from '{}' to '{}'",
                self.spec.primary_key().field,
                spec.primary_key().field
            ));
        }
        let mut next = self.clone();
        next.spec = spec.clone();
        for (key, record) in &self.records {
            next.check_unique("", key, record)
                .map_err(|_| "existing records violate a new unique index".to_string())?;
        }
        *self = next;
        Ok(())
    }
}

/// Complete state of one store: its version and all tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    /// `0` until the first version has been applied
    version: u32,
    tables: BTreeMap<String, Table>,
}

impl StoreState {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    pub fn table(&self, name: &str) -> Result<&Table, StoreError> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    pub(crate) fn table_mut(&mut self, name: &str) -> Result<&mut Table, StoreError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    /// Current index specifications of every table.
    pub fn schema(&self) -> SchemaDefinition {
        let mut schema = SchemaDefinition::new();
        for (name, table) in &self.tables {
            // Names are unique map keys, so insert cannot fail here
            let _ = schema.insert(name, table.spec.clone());
        }
        schema
    }

    /// Bring tables in line with `schema` as part of upgrading to `version`.
    ///
    /// Missing tables are created and existing ones redeclared. Tables the
    /// schema does not mention are kept.
    pub(crate) fn apply_schema(
        &mut self,
        version: u32,
        schema: &SchemaDefinition,
    ) -> Result<(), StoreError> {
        for (name, spec) in schema.iter() {
            match self.tables.get_mut(name) {
                Some(table) => {
                    table
                        .redeclare(spec)
                        .map_err(|reason| StoreError::IncompatibleUpgrade {
                            table: name.to_string(),
                            version,
                            reason,
                        })?
                }
                None => {
                    self.tables.insert(name.to_string(), Table::new(spec.clone()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
