// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot encoding for persisted stores.
//!
//! A store is persisted as one zstd-compressed JSON document holding the
//! complete state. Every committed transaction rewrites the whole snapshot;
//! the backend makes the replacement atomic.

use crate::{StoreError, StoreState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// zstd level 3 is a good balance of speed and compression
pub const COMPRESSION_LEVEL: i32 = 3;

/// A persisted store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Store name the snapshot was written for
    pub name: String,
    /// When this snapshot was written
    pub saved_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: StoreState,
}

impl Snapshot {
    pub fn new(name: &str, state: StoreState) -> Self {
        Self {
            name: name.to_string(),
            saved_at: Utc::now(),
            state,
        }
    }
}

/// Serialize and compress a store state.
pub fn encode(name: &str, state: &StoreState) -> Result<Vec<u8>, StoreError> {
    let snapshot = Snapshot::new(name, state.clone());
    let json_bytes = serde_json::to_vec(&snapshot)?;
    zstd::encode_all(json_bytes.as_slice(), COMPRESSION_LEVEL)
        .map_err(|e| StoreError::Compress(e.to_string()))
}

/// Decompress and parse a snapshot.
pub fn decode(bytes: &[u8]) -> Result<Snapshot, StoreError> {
    let json_bytes = zstd::decode_all(bytes).map_err(|e| StoreError::Compress(e.to_string()))?;
    Ok(serde_json::from_slice(&json_bytes)?)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
