// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous access to a working copy of the store.
//!
//! A transaction never touches the published state directly. The caller
//! (`Database::transaction` or the upgrade path of `Database::open`) hands it
//! a clone and only publishes that clone once it has been persisted, so a
//! failure anywhere inside leaves the store exactly as it was.

use crate::state::{InsertMode, StoreState};
use crate::StoreError;
use serde_json::Value;
use till_core::{Record, RecordKey};

pub struct Transaction<'a> {
    state: &'a mut StoreState,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(state: &'a mut StoreState) -> Self {
        Self { state }
    }

    /// Version the working copy is at. During an upgrade this is the
    /// version being applied.
    pub fn version(&self) -> u32 {
        self.state.version()
    }

    pub fn table_names(&self) -> Vec<String> {
        self.state.table_names()
    }

    pub fn count(&self, table: &str) -> Result<usize, StoreError> {
        Ok(self.state.table(table)?.len())
    }

    pub fn get(&self, table: &str, key: &RecordKey) -> Result<Option<Record>, StoreError> {
        Ok(self.state.table(table)?.get(key).cloned())
    }

    /// All records of a table in key order.
    pub fn to_vec(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        Ok(self
            .state
            .table(table)?
            .records()
            .map(|(_, r)| r.clone())
            .collect())
    }

    pub fn where_equals(
        &self,
        table: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Record>, StoreError> {
        self.state.table(table)?.where_equals(table, field, value)
    }

    /// Insert or replace a record.
    pub fn put(&mut self, table: &str, record: Record) -> Result<RecordKey, StoreError> {
        self.state
            .table_mut(table)?
            .insert(table, record, InsertMode::Put)
    }

    /// Insert a record, failing if its key already exists.
    pub fn add(&mut self, table: &str, record: Record) -> Result<RecordKey, StoreError> {
        self.state
            .table_mut(table)?
            .insert(table, record, InsertMode::Add)
    }

    /// Returns whether a record was removed.
    pub fn delete(&mut self, table: &str, key: &RecordKey) -> Result<bool, StoreError> {
        Ok(self.state.table_mut(table)?.remove(key).is_some())
    }

    pub fn clear(&mut self, table: &str) -> Result<usize, StoreError> {
        Ok(self.state.table_mut(table)?.clear())
    }

    /// Rewrite records in place.
    ///
    /// `f` returns `true` when it changed the record. Changed records are
    /// written back through the same checks as `put`; the primary key must
    /// not change. Returns the number of records written.
    pub fn modify<F>(&mut self, table: &str, mut f: F) -> Result<usize, StoreError>
    where
        F: FnMut(&mut Record) -> bool,
    {
        let current = self.state.table(table)?;
        let pk = current.spec().primary_key().field.clone();

        let mut changed = Vec::new();
        for (key, record) in current.records() {
            let mut updated = record.clone();
            if !f(&mut updated) {
                continue;
            }
            if RecordKey::from_record(&updated, &pk).as_ref() != Some(key) {
                return Err(StoreError::Constraint {
                    table: table.to_string(),
                    reason: format!("modify changed the primary key of record {key}"),
                });
            }
            changed.push(updated);
        }

        let n = changed.len();
        let target = self.state.table_mut(table)?;
        for record in changed {
            target.insert(table, record, InsertMode::Put)?;
        }
        Ok(n)
    }
}

#[cfg(test)]
#[path = "transaction_tests.rs"]
mod tests;
