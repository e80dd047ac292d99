// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File logging for store commands.

use anyhow::{anyhow, Result};
use till_engine::StoreConfig;

/// Log to `<state_dir>/till.log`. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn setup_logging(config: &StoreConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let dir = config
        .log_path
        .parent()
        .ok_or_else(|| anyhow!("invalid log path {}", config.log_path.display()))?;
    let file = config
        .log_path
        .file_name()
        .ok_or_else(|| anyhow!("invalid log path {}", config.log_path.display()))?;
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(guard)
}
