// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::LifecycleError;
use crate::readiness::ReadinessPolicy;

/// File the CLI writes logs to, inside the state directory
pub const LOG_FILE: &str = "till.log";

/// Store configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root state directory (e.g. ~/.local/state/till)
    pub state_dir: PathBuf,
    /// Path to the log file
    pub log_path: PathBuf,
    /// Readiness poll budget after open
    pub readiness: ReadinessPolicy,
}

impl StoreConfig {
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = state_dir()?;
        let mut readiness = ReadinessPolicy::default();
        if let Some(attempts) = ready_attempts() {
            readiness.max_attempts = attempts;
        }
        if let Some(delay) = ready_delay() {
            readiness.delay = delay;
        }

        Ok(Self {
            log_path: state_dir.join(LOG_FILE),
            state_dir,
            readiness,
        })
    }
}

/// Resolve state directory: TILL_STATE_DIR > XDG_STATE_HOME/till > ~/.local/state/till
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("TILL_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("till"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/till"))
}

/// Readiness attempt budget override
pub fn ready_attempts() -> Option<u32> {
    std::env::var("TILL_READY_ATTEMPTS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
}

/// Delay between readiness attempts override
pub fn ready_delay() -> Option<Duration> {
    std::env::var("TILL_READY_DELAY_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
