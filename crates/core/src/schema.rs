// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema definitions: the complete table layout at one version.

use crate::index_spec::{IndexSpec, IndexSpecError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors building a schema definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("table '{table}' has an invalid index specification '{spec}': {source}")]
    InvalidSpec {
        table: String,
        spec: String,
        #[source]
        source: IndexSpecError,
    },
    #[error("table '{0}' is declared twice")]
    DuplicateTable(String),
    #[error("table name must not be empty")]
    EmptyTableName,
}

/// Mapping from table name to index specification.
///
/// A definition lists every table that must exist at its version, including
/// tables carried over unchanged; it is never a diff against the previous
/// version. Tables keep their declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDefinition {
    tables: IndexMap<String, IndexSpec>,
}

impl SchemaDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a definition from `(table, specification)` pairs.
    pub fn from_specs(specs: &[(&str, &str)]) -> Result<Self, SchemaError> {
        let mut schema = Self::new();
        for (table, spec) in specs {
            schema.declare(table, spec)?;
        }
        Ok(schema)
    }

    /// Add a table, parsing its specification.
    pub fn declare(&mut self, table: &str, spec: &str) -> Result<(), SchemaError> {
        let parsed = IndexSpec::parse(spec).map_err(|source| SchemaError::InvalidSpec {
            table: table.to_string(),
            spec: spec.to_string(),
            source,
        })?;
        self.insert(table, parsed)
    }

    /// Add a table with an already-parsed specification.
    pub fn insert(&mut self, table: &str, spec: IndexSpec) -> Result<(), SchemaError> {
        if table.is_empty() {
            return Err(SchemaError::EmptyTableName);
        }
        if self.tables.contains_key(table) {
            return Err(SchemaError::DuplicateTable(table.to_string()));
        }
        self.tables.insert(table.to_string(), spec);
        Ok(())
    }

    /// Copy of this definition with `table` declared or redeclared.
    ///
    /// Used to derive version *v* from version *v-1*.
    /// Redeclared tables keep their position.
    pub fn with_table(&self, table: &str, spec: &str) -> Result<Self, SchemaError> {
        let mut next = self.clone();
        match next.tables.get_mut(table) {
            Some(existing) => {
                *existing = IndexSpec::parse(spec).map_err(|source| SchemaError::InvalidSpec {
                    table: table.to_string(),
                    spec: spec.to_string(),
                    source,
                })?;
            }
            None => next.declare(table, spec)?,
        }
        Ok(next)
    }

    pub fn get(&self, table: &str) -> Option<&IndexSpec> {
        self.tables.get(table)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table names in declaration order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn table_set(&self) -> BTreeSet<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSpec)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
