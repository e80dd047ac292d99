// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema registry: the complete table layout at every version.
//!
//! The registry is the single source of truth for what must exist at any
//! point in the version history. Each version lists every table, including
//! the ones carried over unchanged, so version *v* can be declared without
//! looking at *v-1*.

use std::collections::BTreeSet;
use thiserror::Error;
use till_core::{SchemaDefinition, SchemaError, Version};

/// The version this build of the application expects stores to be at.
pub const CURRENT_VERSION: Version = match Version::new(5) {
    Some(v) => v,
    None => Version::FIRST,
};

/// Errors from building or querying the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown schema version {0}")]
    UnknownVersion(u32),
    #[error("schema registry is empty")]
    Empty,
    #[error("schema versions must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguous { expected: Version, found: Version },
    #[error("table '{table}' is dropped at {version}")]
    DroppedTable { table: String, version: Version },
    #[error("table '{table}' changes its primary key at {version}")]
    PrimaryKeyChanged { table: String, version: Version },
    #[error("{version}: {source}")]
    Schema {
        version: Version,
        #[source]
        source: SchemaError,
    },
}

/// Schema of one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    pub version: Version,
    pub schema: SchemaDefinition,
}

/// Ordered, validated list of version descriptors.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    versions: Vec<VersionDescriptor>,
}

fn version(n: u32) -> Result<Version, RegistryError> {
    Version::new(n).ok_or(RegistryError::UnknownVersion(n))
}

fn schema_err(v: Version) -> impl Fn(SchemaError) -> RegistryError {
    move |source| RegistryError::Schema { version: v, source }
}

impl SchemaRegistry {
    /// The application's schema history.
    pub fn builtin() -> Result<Self, RegistryError> {
        let v1 = SchemaDefinition::from_specs(&[
            ("products", "++id, name, sku, barcode, categoryId"),
            ("categories", "++id, name"),
            ("sales", "++id, createdAt, status, customerId"),
            ("settings", "id"),
        ])
        .map_err(schema_err(Version::FIRST))?;

        let v2 = v1
            .with_table("customers", "++id, name, phone, email")
            .map_err(schema_err(version(2)?))?;

        let v3 = v2
            .with_table("receiptSettings", "id")
            .map_err(schema_err(version(3)?))?;

        let v4 = v3
            .with_table("employees", "++id, name, pin, role")
            .and_then(|s| s.with_table("shifts", "++id, employeeId, status, openedAt"))
            .map_err(schema_err(version(4)?))?;

        // Sales gain structured employee and shift references
        let v5 = v4
            .with_table(
                "sales",
                "++id, createdAt, status, customerId, employeeId, shiftId",
            )
            .map_err(schema_err(version(5)?))?;

        Self::new(vec![v1, v2, v3, v4, v5])
    }

    /// Build a registry from consecutive schemas starting at version 1.
    pub fn new(schemas: Vec<SchemaDefinition>) -> Result<Self, RegistryError> {
        let versions = schemas
            .into_iter()
            .enumerate()
            .map(|(i, schema)| {
                Ok(VersionDescriptor {
                    version: version(i as u32 + 1)?,
                    schema,
                })
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;
        Self::from_descriptors(versions)
    }

    /// Build a registry from explicit descriptors, validating the history.
    pub fn from_descriptors(versions: Vec<VersionDescriptor>) -> Result<Self, RegistryError> {
        if versions.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut expected = Version::FIRST;
        let mut previous: Option<&VersionDescriptor> = None;
        for desc in &versions {
            if desc.version != expected {
                return Err(RegistryError::NonContiguous {
                    expected,
                    found: desc.version,
                });
            }
            if let Some(prev) = previous {
                for (table, prev_spec) in prev.schema.iter() {
                    let spec = desc.schema.get(table).ok_or_else(|| {
                        RegistryError::DroppedTable {
                            table: table.to_string(),
                            version: desc.version,
                        }
                    })?;
                    if spec.primary_key() != prev_spec.primary_key() {
                        return Err(RegistryError::PrimaryKeyChanged {
                            table: table.to_string(),
                            version: desc.version,
                        });
                    }
                }
            }
            previous = Some(desc);
            expected = desc.version.next();
        }

        Ok(Self { versions })
    }

    /// Registry as it stood at `version`, dropping everything newer.
    pub fn up_to(&self, version: Version) -> Result<Self, RegistryError> {
        if self.versions.iter().all(|d| d.version != version) {
            return Err(RegistryError::UnknownVersion(version.get()));
        }
        Ok(Self {
            versions: self
                .versions
                .iter()
                .filter(|d| d.version <= version)
                .cloned()
                .collect(),
        })
    }

    /// Newest registered version.
    pub fn current_version(&self) -> Version {
        self.versions
            .last()
            .map(|d| d.version)
            .unwrap_or(Version::FIRST)
    }

    /// Descriptors in ascending version order.
    pub fn descriptors(&self) -> &[VersionDescriptor] {
        &self.versions
    }

    pub fn schema_for_version(&self, version: Version) -> Result<&SchemaDefinition, RegistryError> {
        self.versions
            .get(version.get() as usize - 1)
            .map(|d| &d.schema)
            .ok_or(RegistryError::UnknownVersion(version.get()))
    }

    pub fn latest_schema(&self) -> &SchemaDefinition {
        // Construction guarantees at least one version
        &self.versions[self.versions.len() - 1].schema
    }

    pub fn tables_for_version(&self, version: Version) -> Result<BTreeSet<String>, RegistryError> {
        Ok(self.schema_for_version(version)?.table_set())
    }

    /// False for unknown versions.
    pub fn table_exists_in_version(&self, table: &str, version: Version) -> bool {
        self.schema_for_version(version)
            .map(|s| s.contains(table))
            .unwrap_or(false)
    }

    /// First version that lists `table`.
    pub fn introduced_in(&self, table: &str) -> Option<Version> {
        self.versions
            .iter()
            .find(|d| d.schema.contains(table))
            .map(|d| d.version)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
