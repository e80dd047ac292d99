// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem backend.
//!
//! Each store is one file, `<root>/<name>.db`. Writes go through a temp file
//! so a crash mid-write never leaves a torn snapshot:
//!
//! ```text
//! write <name>.tmp → fsync <name>.tmp → rename → <name>.db → fsync <root>
//! ```
//!
//! The backend holds an exclusive lock on `<root>/store.lock` for its whole
//! lifetime, so two processes never open stores in the same directory.

use super::StoreBackend;
use crate::StoreError;
use async_trait::async_trait;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::warn;

const LOCK_FILE: &str = "store.lock";

const MAX_BAK_FILES: u32 = 3;

pub struct FsBackend {
    root: PathBuf,
    // NOTE(lifetime): Held to maintain exclusive lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
}

impl FsBackend {
    /// Create the root directory if needed and take the directory lock.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(root.join(LOCK_FILE))?;
        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked(root.display().to_string()))?;

        Ok(Self { root, lock_file })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the snapshot file for `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.db"))
    }
}

#[async_trait]
impl StoreBackend for FsBackend {
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(self.path_for(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(name);
        let tmp_path = path.with_extension("tmp");

        // Write to temp file and sync
        {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
        }

        // Atomic rename
        tokio::fs::rename(&tmp_path, &path).await?;

        // Fsync directory so the rename itself is durable
        tokio::fs::File::open(&self.root).await?.sync_all().await?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.path_for(name);
        let _ = tokio::fs::remove_file(path.with_extension("tmp")).await;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn quarantine(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(());
        }
        let bak_path = rotate_bak_path(&path);
        warn!(
            path = %path.display(),
            bak = %bak_path.display(),
            "Moving unreadable store to .bak",
        );
        tokio::fs::rename(&path, &bak_path).await?;
        Ok(())
    }
}

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
/// The oldest backup is removed when the limit is reached.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    // Remove the oldest if at capacity
    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    // Shift existing backups up by one
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
