// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence backends for stores.
//!
//! The `StoreBackend` trait abstracts where encoded snapshots live, enabling:
//! - `FsBackend` for on-disk stores with atomic replacement
//! - `MemoryBackend` for in-process stores and error injection in tests

mod fs;
mod memory;

pub use fs::FsBackend;
pub use memory::MemoryBackend;

use crate::StoreError;
use async_trait::async_trait;

/// Storage for encoded store snapshots, addressed by store name.
#[async_trait]
pub trait StoreBackend: Send + Sync + 'static {
    /// Read the snapshot for `name`, or `None` if the store does not exist.
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Atomically replace the snapshot for `name`.
    async fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Delete the store. Returns whether anything was removed.
    async fn remove(&self, name: &str) -> Result<bool, StoreError>;

    /// Move an unreadable snapshot out of the way, keeping it for inspection.
    async fn quarantine(&self, name: &str) -> Result<(), StoreError>;
}
