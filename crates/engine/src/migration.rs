// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Migration runner: per-version record transforms.
//!
//! A migration rewrites existing records when a version changes their shape.
//! Versions without a registered migration upgrade with schema changes only.

use std::collections::BTreeMap;

use thiserror::Error;
use till_core::Version;
use till_storage::{StoreError, Transaction};

use crate::migrations::ExtractEmployeeShiftFromNotes;

/// Errors that can occur during migration
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration {name} ({version}) failed: {source}")]
    Step {
        version: Version,
        name: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("more than one migration registered for {0}")]
    Duplicate(Version),
}

/// A record transform run inside the upgrade transaction of one version.
pub trait Migration: Send + Sync {
    /// Version whose upgrade runs this migration.
    fn version(&self) -> Version;

    fn name(&self) -> &'static str;

    /// Rewrite records in place. Returns the number of records changed.
    fn migrate(&self, tx: &mut Transaction<'_>) -> Result<usize, StoreError>;
}

/// Registry of migrations keyed by version.
pub struct MigrationRunner {
    migrations: BTreeMap<Version, Box<dyn Migration>>,
}

impl MigrationRunner {
    /// Create an empty runner.
    pub fn new() -> Self {
        Self {
            migrations: BTreeMap::new(),
        }
    }

    /// Runner with every migration the application ships.
    pub fn builtin() -> Self {
        let mut migrations: BTreeMap<Version, Box<dyn Migration>> = BTreeMap::new();
        let migration: Box<dyn Migration> = Box::new(ExtractEmployeeShiftFromNotes);
        migrations.insert(migration.version(), migration);
        Self { migrations }
    }

    /// Add a migration. At most one migration exists per version.
    pub fn register(&mut self, migration: Box<dyn Migration>) -> Result<(), MigrationError> {
        let version = migration.version();
        if self.migrations.contains_key(&version) {
            return Err(MigrationError::Duplicate(version));
        }
        self.migrations.insert(version, migration);
        Ok(())
    }

    pub fn with(mut self, migration: Box<dyn Migration>) -> Result<Self, MigrationError> {
        self.register(migration)?;
        Ok(self)
    }

    pub fn get(&self, version: Version) -> Option<&dyn Migration> {
        self.migrations.get(&version).map(|m| m.as_ref())
    }

    /// Registered migrations in version order.
    pub fn migrations(&self) -> impl Iterator<Item = &dyn Migration> {
        self.migrations.values().map(|m| m.as_ref())
    }

    /// Run the migration for `version`, if any.
    pub fn run_migration(
        &self,
        version: Version,
        tx: &mut Transaction<'_>,
    ) -> Result<(), MigrationError> {
        let Some(migration) = self.migrations.get(&version) else {
            return Ok(());
        };

        let changed = migration
            .migrate(tx)
            .map_err(|source| MigrationError::Step {
                version,
                name: migration.name(),
                source,
            })?;
        tracing::info!(
            version = version.get(),
            migration = migration.name(),
            changed,
            "migration applied"
        );
        Ok(())
    }
}

impl Default for MigrationRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
