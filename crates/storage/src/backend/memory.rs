// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::StoreBackend;
use crate::StoreError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    stores: Mutex<HashMap<String, Vec<u8>>>,
    quarantined: Mutex<Vec<(String, Vec<u8>)>>,
    fail_read: AtomicBool,
    fail_write: AtomicBool,
    fail_remove: AtomicBool,
    write_count: AtomicU32,
}

/// In-process backend. Clones share the same stores.
///
/// Failures can be injected per operation to exercise open and recovery
/// paths without touching the filesystem.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

fn injected(op: &str) -> StoreError {
    StoreError::Io(std::io::Error::other(format!("injected {op} failure")))
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_read(&self, fail: bool) {
        self.inner.fail_read.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_write(&self, fail: bool) {
        self.inner.fail_write.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_remove(&self, fail: bool) {
        self.inner.fail_remove.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.stores.lock().contains_key(name)
    }

    /// Raw encoded bytes of a store.
    pub fn raw(&self, name: &str) -> Option<Vec<u8>> {
        self.inner.stores.lock().get(name).cloned()
    }

    /// Replace a store's bytes directly, bypassing encoding.
    pub fn put_raw(&self, name: &str, data: Vec<u8>) {
        self.inner.stores.lock().insert(name.to_string(), data);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u32 {
        self.inner.write_count.load(Ordering::SeqCst)
    }

    /// Names of quarantined snapshots, oldest first.
    pub fn quarantined(&self) -> Vec<String> {
        self.inner
            .quarantined
            .lock()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.inner.fail_read.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        Ok(self.raw(name))
    }

    async fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        if self.inner.fail_write.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }
        self.put_raw(name, data.to_vec());
        self.inner.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool, StoreError> {
        if self.inner.fail_remove.load(Ordering::SeqCst) {
            return Err(injected("remove"));
        }
        Ok(self.inner.stores.lock().remove(name).is_some())
    }

    async fn quarantine(&self, name: &str) -> Result<(), StoreError> {
        let data = self.inner.stores.lock().remove(name);
        if let Some(data) = data {
            self.inner
                .quarantined
                .lock()
                .push((name.to_string(), data));
        }
        Ok(())
    }
}
