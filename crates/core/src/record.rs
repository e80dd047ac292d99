// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stored records and their primary keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// An opaque stored document.
pub type Record = Map<String, Value>;

/// Primary key value of a stored record.
///
/// Integers sort before strings, matching the key ordering of the browser
/// stores this layout originates from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
    Int(i64),
    Text(String),
}

impl RecordKey {
    /// Interpret a JSON value as a key. Only integers and strings qualify.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordKey::Int),
            Value::String(s) => Some(RecordKey::Text(s.clone())),
            _ => None,
        }
    }

    /// Read the key stored under `field`, treating `null` as absent.
    pub fn from_record(record: &Record, field: &str) -> Option<Self> {
        record.get(field).and_then(Self::from_value)
    }

    pub fn to_value(&self) -> Value {
        match self {
            RecordKey::Int(n) => Value::from(*n),
            RecordKey::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Int(n) => write!(f, "{}", n),
            RecordKey::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordKey {
    fn from(n: i64) -> Self {
        RecordKey::Int(n)
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        RecordKey::Text(s.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(s: String) -> Self {
        RecordKey::Text(s)
    }
}

/// True if `field` is missing, `null` or the empty string.
pub fn is_absent(record: &Record, field: &str) -> bool {
    match record.get(field) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
