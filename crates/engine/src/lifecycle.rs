// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store lifecycle: open, upgrade, recover, seed and publish the handle.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use till_core::Version;
use till_storage::{Database, FsBackend, StoreBackend, VersionDeclaration};
use tracing::{error, info, warn};

use crate::env::StoreConfig;
use crate::error::{HandleError, LifecycleError};
use crate::health::{self, HealthReport};
use crate::migration::MigrationRunner;
use crate::readiness::{poll_until_ready, Readiness, ReadinessPolicy};
use crate::registry::SchemaRegistry;
use crate::seed::DefaultsSeeder;

/// Name of the on-disk store
pub const STORE_NAME: &str = "till-pos";

/// Table that exists in every version
const BASE_PROBE: &str = "products";
/// Probed once the store is at or past the version that introduced it
const SHIFTS_PROBE: &str = "shifts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Closed,
    Open,
    Deleting,
    Recreating,
    Failed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Closed => "closed",
            LifecycleState::Open => "open",
            LifecycleState::Deleting => "deleting",
            LifecycleState::Recreating => "recreating",
            LifecycleState::Failed => "failed",
        };
        f.write_str(s)
    }
}

struct Slot {
    state: LifecycleState,
    db: Option<Database>,
}

/// Owns the store handle for the process.
pub struct StoreManager {
    backend: Arc<dyn StoreBackend>,
    registry: Arc<SchemaRegistry>,
    runner: Arc<MigrationRunner>,
    seeder: DefaultsSeeder,
    readiness: ReadinessPolicy,
    slot: Mutex<Slot>,
    // Serializes initialize and reset
    init_lock: tokio::sync::Mutex<()>,
}

impl StoreManager {
    /// Manager over `backend` with the built-in registry, migrations and defaults.
    pub fn new(backend: Arc<dyn StoreBackend>) -> Result<Self, LifecycleError> {
        Ok(Self {
            backend,
            registry: Arc::new(SchemaRegistry::builtin()?),
            runner: Arc::new(MigrationRunner::builtin()),
            seeder: DefaultsSeeder::builtin(),
            readiness: ReadinessPolicy::default(),
            slot: Mutex::new(Slot {
                state: LifecycleState::Closed,
                db: None,
            }),
            init_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Manager over the file backend in the configured state directory.
    pub fn from_config(config: &StoreConfig) -> Result<Self, LifecycleError> {
        let backend = FsBackend::open(&config.state_dir).map_err(LifecycleError::Open)?;
        Ok(Self::new(Arc::new(backend))?.with_readiness(config.readiness))
    }

    pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn with_runner(mut self, runner: MigrationRunner) -> Self {
        self.runner = Arc::new(runner);
        self
    }

    pub fn with_seeder(mut self, seeder: DefaultsSeeder) -> Self {
        self.seeder = seeder;
        self
    }

    pub fn with_readiness(mut self, readiness: ReadinessPolicy) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn runner(&self) -> &MigrationRunner {
        &self.runner
    }

    pub fn state(&self) -> LifecycleState {
        self.slot.lock().state
    }

    /// Version this manager upgrades stores to.
    pub fn expected_version(&self) -> Version {
        self.registry.current_version()
    }

    fn transition(&self, to: LifecycleState) {
        let mut slot = self.slot.lock();
        if slot.state != to {
            info!(store = STORE_NAME, from = %slot.state, to = %to, "store lifecycle");
            slot.state = to;
        }
    }

    /// One declaration per registered version, each upgrade running that
    /// version's migration.
    pub fn declarations(&self) -> Vec<VersionDeclaration> {
        self.registry
            .descriptors()
            .iter()
            .map(|desc| {
                let decl = VersionDeclaration::new(desc.version, desc.schema.clone());
                if desc.version == Version::FIRST {
                    return decl;
                }
                let runner = Arc::clone(&self.runner);
                let version = desc.version;
                decl.with_upgrade(move |tx| runner.run_migration(version, tx).map_err(Into::into))
            })
            .collect()
    }

    /// Bring the store up and publish the handle.
    ///
    /// Idempotent: returns `true` at once if a handle is already open.
    /// Never fails; errors are logged and reported as `false`.
    pub async fn initialize_database(&self) -> bool {
        let _guard = self.init_lock.lock().await;
        if self.handle().is_ok() {
            return true;
        }
        self.initialize_locked().await
    }

    async fn initialize_locked(&self) -> bool {
        match self.bring_up().await {
            Ok(db) => {
                info!(store = STORE_NAME, version = db.verno(), "store ready");
                self.slot.lock().db = Some(db);
                self.transition(LifecycleState::Open);
                true
            }
            Err(e) => {
                error!(store = STORE_NAME, error = %e, "store initialization failed");
                self.slot.lock().db = None;
                self.transition(LifecycleState::Failed);
                false
            }
        }
    }

    async fn bring_up(&self) -> Result<Database, LifecycleError> {
        let db = match self.open().await {
            Ok(db) => db,
            Err(LifecycleError::VersionConflict(err)) => {
                warn!(store = STORE_NAME, error = %err, "version conflict, recreating store");
                self.recreate()
                    .await
                    .map_err(|e| LifecycleError::Recovery(Box::new(e)))?
            }
            Err(e) => return Err(e),
        };

        let expected = self.expected_version().get();
        if db.verno() != expected {
            warn!(
                store = STORE_NAME,
                version = db.verno(),
                expected,
                "opened store version differs from expected"
            );
        }

        self.wait_ready(&db).await;

        if !db.is_open() {
            return Err(LifecycleError::NotOpenAfterInit);
        }

        let report = self.seeder.seed(&db).await;
        for failure in &report.failed {
            warn!(store = STORE_NAME, error = %failure, "seeding default failed");
        }
        Ok(db)
    }

    async fn open(&self) -> Result<Database, LifecycleError> {
        let declarations = self.declarations();
        Database::open(Arc::clone(&self.backend), STORE_NAME, &declarations)
            .await
            .map_err(LifecycleError::from_open)
    }

    async fn recreate(&self) -> Result<Database, LifecycleError> {
        self.transition(LifecycleState::Deleting);
        Database::delete_store(self.backend.as_ref(), STORE_NAME)
            .await
            .map_err(LifecycleError::Open)?;
        self.transition(LifecycleState::Recreating);
        self.open().await
    }

    async fn wait_ready(&self, db: &Database) {
        let mut probes = vec![BASE_PROBE];
        let shifts_ready = self
            .registry
            .introduced_in(SHIFTS_PROBE)
            .is_some_and(|v| db.verno() >= v.get());
        if shifts_ready {
            probes.push(SHIFTS_PROBE);
        }

        match poll_until_ready(
            db,
            &probes,
            self.readiness.max_attempts,
            self.readiness.delay,
        )
        .await
        {
            Readiness::Ready { attempts } => {
                info!(store = STORE_NAME, attempts, "tables ready");
            }
            Readiness::TimedOut {
                attempts,
                last_error,
            } => {
                let error = last_error.map(|e| e.to_string()).unwrap_or_default();
                warn!(store = STORE_NAME, attempts, error = %error, "readiness poll timed out, continuing");
            }
        }
    }

    /// The published handle.
    pub fn handle(&self) -> Result<Database, HandleError> {
        let slot = self.slot.lock();
        match &slot.db {
            None => Err(HandleError::NotInitialized),
            Some(db) if !db.is_open() => Err(HandleError::NotOpen),
            Some(db) => Ok(db.clone()),
        }
    }

    /// Health of the published store. Read-only.
    pub async fn check_health(&self) -> HealthReport {
        match self.handle() {
            Ok(db) => health::check(&db, &self.registry).await,
            Err(e) => HealthReport::unavailable(self.expected_version().get(), &e),
        }
    }

    /// Close the handle, delete the on-disk store and bring it up fresh.
    pub async fn reset_store(&self) -> bool {
        let _guard = self.init_lock.lock().await;
        self.close_handle();

        self.transition(LifecycleState::Deleting);
        // An unreadable store is kept as a backup rather than deleted
        if let Err(e) = Database::set_aside_unreadable(self.backend.as_ref(), STORE_NAME).await {
            error!(store = STORE_NAME, error = %e, "failed to set aside unreadable store");
            self.transition(LifecycleState::Failed);
            return false;
        }
        match Database::delete_store(self.backend.as_ref(), STORE_NAME).await {
            Ok(existed) => info!(store = STORE_NAME, existed, "store deleted"),
            Err(e) => {
                error!(store = STORE_NAME, error = %e, "failed to delete store");
                self.transition(LifecycleState::Failed);
                return false;
            }
        }

        self.transition(LifecycleState::Recreating);
        self.initialize_locked().await
    }

    /// Close and drop the published handle.
    pub async fn close(&self) {
        let _guard = self.init_lock.lock().await;
        self.close_handle();
        self.transition(LifecycleState::Closed);
    }

    fn close_handle(&self) {
        if let Some(db) = self.slot.lock().db.take() {
            db.close();
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
