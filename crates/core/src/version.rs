// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema version numbers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// `0` is not a declared version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("schema versions start at 1, found 0")]
pub struct ZeroVersion;

/// A schema version: a positive integer, 1-based and gapless.
///
/// On-disk stores report their version as a raw `u32` where `0` means the
/// store has never been created; declared versions always start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Version(u32);

impl Version {
    /// The first version of every schema history.
    pub const FIRST: Version = Version(1);

    /// Returns `None` for `0`, which is not a valid declared version.
    pub const fn new(n: u32) -> Option<Self> {
        if n == 0 {
            None
        } else {
            Some(Self(n))
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// The version before this one, or `None` for version 1.
    pub fn previous(self) -> Option<Self> {
        self.0.checked_sub(1).and_then(Self::new)
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl TryFrom<u32> for Version {
    type Error = ZeroVersion;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n).ok_or(ZeroVersion)
    }
}

impl From<Version> for u32 {
    fn from(v: Version) -> Self {
        v.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl PartialEq<u32> for Version {
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<u32> for Version {
    fn partial_cmp(&self, other: &u32) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
