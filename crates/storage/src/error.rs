// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the document store

use thiserror::Error;

/// Boxed error returned by upgrade hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("compression error: {0}")]
    Compress(String),
    #[error("store '{store}' is unreadable: {reason}")]
    Corrupt { store: String, reason: String },
    #[error("store directory {0} is locked by another process")]
    Locked(String),
    #[error("store version {on_disk} is newer than the latest declared version {declared}")]
    VersionTooNew { on_disk: u32, declared: u32 },
    #[error("incompatible upgrade of table '{table}' at v{version}: {reason}")]
    IncompatibleUpgrade {
        table: String,
        version: u32,
        reason: String,
    },
    #[error("invalid version declarations: {0}")]
    InvalidDeclaration(String),
    #[error("upgrade to v{version} failed: {source}")]
    Upgrade {
        version: u32,
        #[source]
        source: BoxError,
    },
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("field '{field}' is not indexed on table '{table}'")]
    NotIndexed { table: String, field: String },
    #[error("constraint violation on table '{table}': {reason}")]
    Constraint { table: String, reason: String },
    #[error("database '{0}' is closed")]
    Closed(String),
}

impl StoreError {
    /// True for failures where the on-disk store cannot be reconciled with
    /// the declared versions by replaying them.
    pub fn is_version_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::VersionTooNew { .. } | StoreError::IncompatibleUpgrade { .. }
        )
    }
}
