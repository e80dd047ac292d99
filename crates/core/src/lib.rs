// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! till-core: schema and record types shared by the Till store crates

pub mod index_spec;
pub mod record;
pub mod schema;
pub mod version;

pub use index_spec::{IndexField, IndexSpec, IndexSpecError, PrimaryKey};
pub use record::{is_absent, Record, RecordKey};
pub use schema::{SchemaDefinition, SchemaError};
pub use version::{Version, ZeroVersion};
