// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned database handle.
//!
//! A database is opened against an ordered list of version declarations.
//! Opening replays every declaration newer than the on-disk version, in
//! order, inside one upgrade transaction:
//!
//! ```text
//! on-disk k ──► apply schema k+1 ──► hook k+1 ──► … ──► apply schema n ──► hook n ──► persist
//! ```
//!
//! Nothing is persisted until every step has succeeded, so a failing hook
//! leaves the store at version k. An undecodable store fails to open with
//! [`StoreError::Corrupt`] and is left in place.

use crate::backend::StoreBackend;
use crate::error::BoxError;
use crate::snapshot;
use crate::{StoreError, StoreState, Transaction};
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use till_core::{Record, RecordKey, SchemaDefinition, Version};
use tracing::{debug, info, warn};

/// Hook run inside the upgrade transaction for one version.
pub type UpgradeHook = Arc<dyn Fn(&mut Transaction<'_>) -> Result<(), BoxError> + Send + Sync>;

/// Schema and optional upgrade hook for one version.
#[derive(Clone)]
pub struct VersionDeclaration {
    pub version: Version,
    pub schema: SchemaDefinition,
    pub upgrade: Option<UpgradeHook>,
}

impl VersionDeclaration {
    pub fn new(version: Version, schema: SchemaDefinition) -> Self {
        Self {
            version,
            schema,
            upgrade: None,
        }
    }

    pub fn with_upgrade<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Transaction<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.upgrade = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for VersionDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionDeclaration")
            .field("version", &self.version)
            .field("schema", &self.schema)
            .field("upgrade", &self.upgrade.is_some())
            .finish()
    }
}

/// Declarations must start at 1 and have no gaps. Returns the last version.
fn validate_declarations(declarations: &[VersionDeclaration]) -> Result<Version, StoreError> {
    let mut expected = Version::FIRST;
    let mut last = None;
    for decl in declarations {
        if decl.version != expected {
            return Err(StoreError::InvalidDeclaration(format!(
                "expected {expected}, found {}",
                decl.version
            )));
        }
        last = Some(decl.version);
        expected = decl.version.next();
    }
    last.ok_or_else(|| StoreError::InvalidDeclaration("no versions declared".into()))
}

/// Apply every declaration newer than the state's version.
fn upgrade(
    mut state: StoreState,
    declarations: &[VersionDeclaration],
) -> Result<StoreState, StoreError> {
    let on_disk = state.version();
    for decl in declarations.iter().filter(|d| d.version > on_disk) {
        let version = decl.version.get();
        state.apply_schema(version, &decl.schema)?;
        state.set_version(version);

        if let Some(hook) = &decl.upgrade {
            let mut tx = Transaction::new(&mut state);
            hook(&mut tx).map_err(|source| StoreError::Upgrade { version, source })?;
        }
        debug!(version, "applied schema version");
    }
    Ok(state)
}

struct Inner {
    name: String,
    backend: Arc<dyn StoreBackend>,
    state: Mutex<StoreState>,
    /// Serializes writers across the persist await
    write_lock: tokio::sync::Mutex<()>,
    open: AtomicBool,
    upgraded_from: u32,
}

/// Handle to an open store. Clones share the same store.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.inner.name)
            .field("version", &self.verno())
            .field("open", &self.is_open())
            .finish()
    }
}

impl Database {
    /// Open (creating or upgrading as needed) the store `name`.
    pub async fn open(
        backend: Arc<dyn StoreBackend>,
        name: &str,
        declarations: &[VersionDeclaration],
    ) -> Result<Self, StoreError> {
        let target = validate_declarations(declarations)?;

        let state = match backend.read(name).await? {
            None => StoreState::default(),
            Some(bytes) => {
                snapshot::decode(&bytes)
                    .map_err(|e| StoreError::Corrupt {
                        store: name.to_string(),
                        reason: e.to_string(),
                    })?
                    .state
            }
        };

        let on_disk = state.version();
        if on_disk > target.get() {
            return Err(StoreError::VersionTooNew {
                on_disk,
                declared: target.get(),
            });
        }

        let state = if on_disk < target.get() {
            info!(store = name, from = on_disk, to = target.get(), "upgrading store");
            let upgraded = upgrade(state, declarations)?;
            let bytes = snapshot::encode(name, &upgraded)?;
            backend.write(name, &bytes).await?;
            upgraded
        } else {
            state
        };

        Ok(Self {
            inner: Arc::new(Inner {
                name: name.to_string(),
                backend,
                state: Mutex::new(state),
                write_lock: tokio::sync::Mutex::new(()),
                open: AtomicBool::new(true),
                upgraded_from: on_disk,
            }),
        })
    }

    /// Delete the store `name` from `backend`. Returns whether it existed.
    pub async fn delete_store(backend: &dyn StoreBackend, name: &str) -> Result<bool, StoreError> {
        let existed = backend.remove(name).await?;
        info!(store = name, existed, "deleted store");
        Ok(existed)
    }

    /// Move an undecodable store `name` aside. Returns whether it was moved.
    pub async fn set_aside_unreadable(
        backend: &dyn StoreBackend,
        name: &str,
    ) -> Result<bool, StoreError> {
        let Some(bytes) = backend.read(name).await? else {
            return Ok(false);
        };
        match snapshot::decode(&bytes) {
            Ok(_) => Ok(false),
            Err(e) => {
                warn!(store = name, error = %e, "setting aside unreadable store");
                backend.quarantine(name).await?;
                Ok(true)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Version the store is at.
    pub fn verno(&self) -> u32 {
        self.inner.state.lock().version()
    }

    /// On-disk version found when the store was opened (`0` if it was created).
    pub fn upgraded_from(&self) -> u32 {
        self.inner.upgraded_from
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::SeqCst)
    }

    /// Close this handle and all its clones. Later operations fail with
    /// [`StoreError::Closed`].
    pub fn close(&self) {
        if self.inner.open.swap(false, Ordering::SeqCst) {
            debug!(store = %self.inner.name, "closed store");
        }
    }

    pub fn table_names(&self) -> Vec<String> {
        self.inner.state.lock().table_names()
    }

    /// Current index specifications of every table.
    pub fn schema(&self) -> SchemaDefinition {
        self.inner.state.lock().schema()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(StoreError::Closed(self.inner.name.clone()))
        }
    }

    fn read<T>(&self, f: impl FnOnce(&StoreState) -> Result<T, StoreError>) -> Result<T, StoreError> {
        self.ensure_open()?;
        f(&self.inner.state.lock())
    }

    pub async fn count(&self, table: &str) -> Result<usize, StoreError> {
        self.read(|s| Ok(s.table(table)?.len()))
    }

    pub async fn get(&self, table: &str, key: &RecordKey) -> Result<Option<Record>, StoreError> {
        self.read(|s| Ok(s.table(table)?.get(key).cloned()))
    }

    pub async fn to_vec(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        self.read(|s| Ok(s.table(table)?.records().map(|(_, r)| r.clone()).collect()))
    }

    pub async fn where_equals(
        &self,
        table: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Record>, StoreError> {
        self.read(|s| s.table(table)?.where_equals(table, field, value))
    }

    /// Run `f` against a working copy and publish it once persisted.
    ///
    /// Either every change made by `f` becomes visible and durable, or none
    /// does.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T, StoreError>,
    {
        let _guard = self.inner.write_lock.lock().await;
        self.ensure_open()?;

        let mut working = self.inner.state.lock().clone();
        let out = f(&mut Transaction::new(&mut working))?;

        let bytes = snapshot::encode(&self.inner.name, &working)?;
        self.inner.backend.write(&self.inner.name, &bytes).await?;

        *self.inner.state.lock() = working;
        Ok(out)
    }

    pub async fn put(&self, table: &str, record: Record) -> Result<RecordKey, StoreError> {
        self.transaction(|tx| tx.put(table, record)).await
    }

    pub async fn add(&self, table: &str, record: Record) -> Result<RecordKey, StoreError> {
        self.transaction(|tx| tx.add(table, record)).await
    }

    pub async fn delete(&self, table: &str, key: &RecordKey) -> Result<bool, StoreError> {
        self.transaction(|tx| tx.delete(table, key)).await
    }
}

#[cfg(test)]
#[path = "database_tests.rs"]
mod tests;
