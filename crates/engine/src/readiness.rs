// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded readiness poll after the store opens.
//!
//! A freshly opened store is probed by counting a few tables. The poll stops
//! at the first attempt where every probe succeeds, or when the attempt
//! budget runs out. Running out is not an error: the caller logs it and
//! carries on.

use std::time::Duration;

use till_storage::Database;

use crate::error::TableAccessError;

/// Attempt budget for [`poll_until_ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_millis(100),
        }
    }
}

/// Outcome of a readiness poll.
#[derive(Debug)]
pub enum Readiness {
    /// Every probe counted successfully on attempt `attempts`.
    Ready { attempts: u32 },
    /// The budget ran out; `last_error` is the last failing probe.
    TimedOut {
        attempts: u32,
        last_error: Option<TableAccessError>,
    },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready { .. })
    }
}

/// Result of waiting for the next attempt.
enum Tick {
    Ready,
    Exhausted,
}

/// Counts attempts and sleeps between them (never before the first).
struct Poller {
    delay: Duration,
    remaining: u32,
    started: bool,
}

impl Poller {
    fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            delay,
            remaining: max_attempts.max(1),
            started: false,
        }
    }

    async fn tick(&mut self) -> Tick {
        if self.remaining == 0 {
            return Tick::Exhausted;
        }
        if self.started {
            tokio::time::sleep(self.delay).await;
        }
        self.started = true;
        self.remaining -= 1;
        Tick::Ready
    }
}

/// Count every probe table until all succeed or the budget is spent.
///
/// At least one attempt is always made.
pub async fn poll_until_ready(
    db: &Database,
    probes: &[&str],
    max_attempts: u32,
    delay: Duration,
) -> Readiness {
    let mut poller = Poller::new(max_attempts, delay);
    let mut attempts = 0;
    let mut last_error = None;

    while let Tick::Ready = poller.tick().await {
        attempts += 1;
        match probe_all(db, probes).await {
            Ok(()) => return Readiness::Ready { attempts },
            Err(e) => {
                tracing::debug!(attempts, table = %e.table, error = %e.source, "store not ready");
                last_error = Some(e);
            }
        }
    }

    Readiness::TimedOut {
        attempts,
        last_error,
    }
}

async fn probe_all(db: &Database, probes: &[&str]) -> Result<(), TableAccessError> {
    for table in probes {
        db.count(table).await.map_err(|source| TableAccessError {
            table: table.to_string(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
