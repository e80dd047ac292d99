// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Till schema versioning and store lifecycle engine

pub mod env;
mod error;
mod health;
mod lifecycle;
mod migration;
mod migrations;
mod readiness;
mod registry;
mod seed;

pub use env::StoreConfig;
pub use error::{HandleError, LifecycleError, TableAccessError};
pub use health::{HealthReport, UNREADABLE};
pub use lifecycle::{LifecycleState, StoreManager, STORE_NAME};
pub use migration::{Migration, MigrationError, MigrationRunner};
pub use migrations::ExtractEmployeeShiftFromNotes;
pub use readiness::{poll_until_ready, Readiness, ReadinessPolicy};
pub use registry::{RegistryError, SchemaRegistry, VersionDescriptor, CURRENT_VERSION};
pub use seed::{DefaultsSeeder, SeedError, SeedReport, SingletonDefault};
