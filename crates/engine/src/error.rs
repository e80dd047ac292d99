// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle, handle and table access errors

use thiserror::Error;
use till_storage::{BoxError, StoreError};

use crate::registry::RegistryError;

/// Errors raised while bringing the store up.
///
/// `initialize_database` collapses these into a boolean; they surface in
/// logs and in the health report.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("schema registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to open store: {0}")]
    Open(#[source] StoreError),

    #[error("store version conflict: {0}")]
    VersionConflict(#[source] StoreError),

    #[error("migration to v{version} failed: {source}")]
    Migration {
        version: u32,
        #[source]
        source: BoxError,
    },

    #[error("recreating store after version conflict failed: {0}")]
    Recovery(#[source] Box<LifecycleError>),

    #[error("store is not open after initialization")]
    NotOpenAfterInit,
}

impl LifecycleError {
    /// Sort an open failure into conflict, migration or plain open error.
    pub fn from_open(err: StoreError) -> Self {
        if err.is_version_conflict() {
            return LifecycleError::VersionConflict(err);
        }
        match err {
            StoreError::Upgrade { version, source } => LifecycleError::Migration { version, source },
            other => LifecycleError::Open(other),
        }
    }
}

/// Errors from asking for the store handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error("database not initialized")]
    NotInitialized,
    #[error("database is not open")]
    NotOpen,
}

/// A table could not be counted
#[derive(Debug, Error)]
#[error("table '{table}' is not accessible: {source}")]
pub struct TableAccessError {
    pub table: String,
    #[source]
    pub source: StoreError,
}
