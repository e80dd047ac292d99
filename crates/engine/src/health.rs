// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only health report over the live store.

use std::collections::BTreeMap;

use serde::Serialize;
use till_storage::Database;

use crate::error::HandleError;
use crate::registry::SchemaRegistry;

/// Count recorded for a table that could not be read.
pub const UNREADABLE: i64 = -1;

/// Snapshot of store health
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// On-disk version matches the expected version
    pub healthy: bool,
    /// On-disk version, if a store is open
    pub version: Option<u32>,
    pub expected_version: u32,
    /// Record count per table of the latest schema (`-1` if unreadable)
    pub tables: BTreeMap<String, i64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub table_errors: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    /// Report for a store that has no usable handle.
    pub fn unavailable(expected_version: u32, err: &HandleError) -> Self {
        Self {
            healthy: false,
            version: None,
            expected_version,
            tables: BTreeMap::new(),
            table_errors: BTreeMap::new(),
            error: Some(err.to_string()),
        }
    }
}

/// Count every table of the latest schema.
pub async fn check(db: &Database, registry: &SchemaRegistry) -> HealthReport {
    let expected = registry.current_version().get();
    let version = db.verno();

    let mut tables = BTreeMap::new();
    let mut table_errors = BTreeMap::new();
    for table in registry.latest_schema().table_names() {
        match db.count(table).await {
            Ok(n) => {
                tables.insert(table.to_string(), n as i64);
            }
            Err(e) => {
                tables.insert(table.to_string(), UNREADABLE);
                table_errors.insert(table.to_string(), e.to_string());
            }
        }
    }

    HealthReport {
        healthy: version == expected,
        version: Some(version),
        expected_version: expected,
        tables,
        table_errors,
        error: None,
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
