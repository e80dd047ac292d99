// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `till init`, `till health` and `till reset`

use std::fmt::Write;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use till_engine::{HealthReport, StoreConfig, StoreManager, STORE_NAME, UNREADABLE};

use crate::color;
use crate::exit_error::ExitError;
use crate::output::{emit, OutputFormat};
use crate::table::{Column, Table};

const UNAVAILABLE: &str = "storage unavailable";

#[derive(Args)]
pub struct ResetArgs {
    /// Confirm deleting every record in the store
    #[arg(long)]
    pub yes: bool,
}

#[derive(Serialize)]
struct Ready<'a> {
    ready: bool,
    store: &'a str,
    version: u32,
    state_dir: String,
}

fn ready(manager: &StoreManager, config: &StoreConfig) -> Result<Ready<'static>> {
    let db = manager
        .handle()
        .map_err(|_| ExitError::new(1, UNAVAILABLE))?;
    Ok(Ready {
        ready: true,
        store: STORE_NAME,
        version: db.verno(),
        state_dir: config.state_dir.display().to_string(),
    })
}

pub async fn init(manager: &StoreManager, config: &StoreConfig, format: OutputFormat) -> Result<()> {
    if !manager.initialize_database().await {
        return Err(ExitError::new(1, UNAVAILABLE).into());
    }
    let ready = ready(manager, config)?;
    emit(format, &ready, || {
        format!("Store {} ready at v{}", ready.store, ready.version)
    })
}

pub async fn health(manager: &StoreManager, format: OutputFormat) -> Result<()> {
    // Failure shows up in the report
    manager.initialize_database().await;
    let report = manager.check_health().await;
    emit(format, &report, || format_health(&report))?;
    if !report.healthy {
        return Err(ExitError::new(1, String::new()).into());
    }
    Ok(())
}

pub async fn reset(manager: &StoreManager, config: &StoreConfig, format: OutputFormat) -> Result<()> {
    if !manager.reset_store().await {
        return Err(ExitError::new(1, UNAVAILABLE).into());
    }
    let ready = ready(manager, config)?;
    emit(format, &ready, || {
        format!("Store {} reset at v{}", ready.store, ready.version)
    })
}

/// Text rendering of a health report.
pub(crate) fn format_health(report: &HealthReport) -> String {
    let mut out = String::new();
    let status = if report.healthy { "healthy" } else { "unhealthy" };
    let _ = writeln!(out, "{} {}", color::header("Store:"), STORE_NAME);
    let _ = writeln!(out, "{} {}", color::header("Status:"), color::health(status, report.healthy));
    let version = report
        .version
        .map_or_else(|| "-".to_string(), |v| format!("v{v}"));
    let _ = writeln!(
        out,
        "{} {} {}",
        color::header("Version:"),
        version,
        color::muted(&format!("(expected v{})", report.expected_version))
    );
    if let Some(error) = &report.error {
        let _ = writeln!(out, "{} {}", color::header("Error:"), error);
    }

    if !report.tables.is_empty() {
        out.push('\n');
        let mut table = Table::new(vec![Column::left("TABLE"), Column::right("RECORDS")]);
        for (name, count) in &report.tables {
            let cell = if *count == UNREADABLE {
                "-".to_string()
            } else {
                count.to_string()
            };
            table.row(vec![name.clone(), cell]);
        }
        let mut buf = Vec::new();
        table.render(&mut buf);
        out.push_str(&String::from_utf8_lossy(&buf));
    }

    for (name, error) in &report.table_errors {
        let _ = writeln!(out, "{}", color::muted(&format!("{name}: {error}")));
    }
    out
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
