// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `till schema` and `till migrations`

use anyhow::{anyhow, Result};
use clap::Args;
use serde::Serialize;
use till_core::{SchemaDefinition, Version};
use till_engine::{MigrationRunner, SchemaRegistry};

use crate::output::{emit, OutputFormat};
use crate::table::{Column, Table};

#[derive(Args)]
pub struct SchemaArgs {
    /// Schema version to show (default: latest)
    #[arg(long = "version", value_name = "N")]
    pub version: Option<u32>,
}

#[derive(Serialize)]
struct SchemaView<'a> {
    version: u32,
    tables: &'a SchemaDefinition,
}

#[derive(Serialize)]
struct MigrationView {
    version: u32,
    name: &'static str,
}

pub fn schema(args: SchemaArgs, format: OutputFormat) -> Result<()> {
    let registry = SchemaRegistry::builtin()?;
    let version = match args.version {
        Some(n) => Version::new(n).ok_or_else(|| anyhow!("unknown schema version {n}"))?,
        None => registry.current_version(),
    };
    let view = SchemaView {
        version: version.get(),
        tables: registry.schema_for_version(version)?,
    };
    emit(format, &view, || format_schema(version, view.tables))
}

pub fn migrations(format: OutputFormat) -> Result<()> {
    let runner = MigrationRunner::builtin();
    let views: Vec<MigrationView> = runner
        .migrations()
        .map(|m| MigrationView {
            version: m.version().get(),
            name: m.name(),
        })
        .collect();
    emit(format, &views, || format_migrations(&views))
}

pub(crate) fn format_schema(version: Version, schema: &SchemaDefinition) -> String {
    let mut table = Table::new(vec![Column::left("TABLE"), Column::left("INDEXES")]);
    for (name, spec) in schema.iter() {
        table.row(vec![name.to_string(), spec.to_string()]);
    }
    let mut buf = format!("Schema {version}\n\n").into_bytes();
    table.render(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn format_migrations(views: &[MigrationView]) -> String {
    let mut table = Table::new(vec![Column::right("VERSION"), Column::left("MIGRATION")]);
    for view in views {
        table.row(vec![format!("v{}", view.version), view.name.to_string()]);
    }
    let mut buf = Vec::new();
    table.render(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
