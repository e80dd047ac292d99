// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Singleton defaults seeded after open.
//!
//! Each default is inserted only if a record with its id does not exist.
//! Existing records are never overwritten, so seeding is idempotent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use till_core::{Record, RecordKey};
use till_storage::{Database, StoreError};

/// A default singleton could not be seeded
#[derive(Debug, Error)]
#[error("failed to seed {table}/{id}: {source}")]
pub struct SeedError {
    pub table: &'static str,
    pub id: &'static str,
    #[source]
    pub source: StoreError,
}

/// One singleton record and how to build its default.
#[derive(Clone)]
pub struct SingletonDefault {
    pub table: &'static str,
    pub id: &'static str,
    build: fn(DateTime<Utc>) -> Value,
}

impl SingletonDefault {
    pub fn new(table: &'static str, id: &'static str, build: fn(DateTime<Utc>) -> Value) -> Self {
        Self { table, id, build }
    }

    /// Default record with its id set.
    pub fn record(&self, now: DateTime<Utc>) -> Record {
        let mut record = match (self.build)(now) {
            Value::Object(map) => map,
            _ => Record::new(),
        };
        record.insert("id".to_string(), Value::String(self.id.to_string()));
        record
    }

    fn label(&self) -> String {
        format!("{}/{}", self.table, self.id)
    }
}

impl std::fmt::Debug for SingletonDefault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

fn app_settings(now: DateTime<Utc>) -> Value {
    json!({
        "storeName": "My Store",
        "currency": "USD",
        "taxRate": 0,
        "lowStockThreshold": 5,
        "createdAt": now.to_rfc3339(),
    })
}

fn receipt_settings(now: DateTime<Utc>) -> Value {
    json!({
        "header": "Thank you for shopping with us!",
        "footer": "Please come again",
        "showLogo": false,
        "paperWidth": 80,
        "createdAt": now.to_rfc3339(),
    })
}

/// Outcome of one seeding pass
#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
    #[serde(skip)]
    pub failed: Vec<SeedError>,
}

impl SeedReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DefaultsSeeder {
    defaults: Vec<SingletonDefault>,
}

impl DefaultsSeeder {
    /// Seeder with no defaults.
    pub fn empty() -> Self {
        Self {
            defaults: Vec::new(),
        }
    }

    /// App settings and receipt settings.
    pub fn builtin() -> Self {
        Self::empty()
            .with(SingletonDefault::new("settings", "app", app_settings))
            .with(SingletonDefault::new(
                "receiptSettings",
                "receipt",
                receipt_settings,
            ))
    }

    pub fn with(mut self, default: SingletonDefault) -> Self {
        self.defaults.push(default);
        self
    }

    pub fn defaults(&self) -> &[SingletonDefault] {
        &self.defaults
    }

    /// Insert every missing default. Failures are collected, not returned.
    pub async fn seed(&self, db: &Database) -> SeedReport {
        let mut report = SeedReport::default();
        let now = Utc::now();

        for default in &self.defaults {
            let key = RecordKey::from(default.id);
            let result = match db.get(default.table, &key).await {
                Ok(Some(_)) => Ok(false),
                Ok(None) => db.add(default.table, default.record(now)).await.map(|_| true),
                Err(e) => Err(e),
            };

            match result {
                Ok(true) => {
                    tracing::info!(table = default.table, id = default.id, "seeded default");
                    report.created.push(default.label());
                }
                Ok(false) => report.existing.push(default.label()),
                Err(source) => report.failed.push(SeedError {
                    table: default.table,
                    id: default.id,
                    source,
                }),
            }
        }
        report
    }
}

impl Default for DefaultsSeeder {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "seed_tests.rs"]
mod tests;
