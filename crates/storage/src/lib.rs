// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Embedded versioned document store for Till

mod backend;
mod database;
mod error;
pub mod snapshot;
mod state;
mod transaction;

pub use backend::{FsBackend, MemoryBackend, StoreBackend};
pub use database::{Database, UpgradeHook, VersionDeclaration};
pub use error::{BoxError, StoreError};
pub use snapshot::Snapshot;
pub use state::{StoreState, Table};
pub use transaction::Transaction;
