// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! v5: structured employee and shift references on sales.
//!
//! Before v5 the register wrote the cashier and shift into the free-text
//! `notes` field as `Employee: <id> | Shift: <id> | <other notes>`. This
//! migration lifts those tokens into `employeeId` and `shiftId` and leaves
//! only the remaining free text behind.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use till_core::{is_absent, Record, Version};
use till_storage::{StoreError, Transaction};

use crate::migration::Migration;

// Allow expect here as the patterns are constant
#[allow(clippy::expect_used)]
static EMPLOYEE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Employee:\s*([^\s|]+)").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static SHIFT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Shift:\s*([^\s|]+)").expect("constant regex pattern is valid"));

// `|` followed by optional whitespace and another `|`
#[allow(clippy::expect_used)]
static EMPTY_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*\|").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static EDGE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|\s*|\s*\|\s*$").expect("constant regex pattern is valid"));

const TABLE: &str = "sales";

const VERSION: Version = match Version::new(5) {
    Some(v) => v,
    None => Version::FIRST,
};

pub struct ExtractEmployeeShiftFromNotes;

impl Migration for ExtractEmployeeShiftFromNotes {
    fn version(&self) -> Version {
        VERSION
    }

    fn name(&self) -> &'static str {
        "ExtractEmployeeShiftFromNotes"
    }

    fn migrate(&self, tx: &mut Transaction<'_>) -> Result<usize, StoreError> {
        tx.modify(TABLE, extract)
    }
}

/// Rewrite one sale. Returns whether the record changed.
///
/// Only sales with neither `employeeId` nor `shiftId` set are touched. A
/// field holding the empty string counts as not set.
pub(crate) fn extract(sale: &mut Record) -> bool {
    if !is_absent(sale, "employeeId") || !is_absent(sale, "shiftId") {
        return false;
    }
    let Some(Value::String(notes)) = sale.get("notes") else {
        return false;
    };

    let employee = EMPLOYEE_PATTERN.captures(notes);
    let shift = SHIFT_PATTERN.captures(notes);
    if employee.is_none() && shift.is_none() {
        return false;
    }

    let mut remaining = notes.clone();
    let mut tokens = Vec::with_capacity(2);
    for (field, caps) in [("employeeId", employee), ("shiftId", shift)] {
        let Some(caps) = caps else { continue };
        if let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) {
            remaining = remaining.replacen(whole.as_str(), "", 1);
            tokens.push((field, token.as_str().to_string()));
        }
    }

    let remaining = clean_separators(&remaining);
    for (field, token) in tokens {
        sale.insert(field.to_string(), Value::String(token));
    }
    if remaining.is_empty() {
        sale.remove("notes");
    } else {
        sale.insert("notes".to_string(), Value::String(remaining));
    }
    true
}

fn clean_separators(notes: &str) -> String {
    let mut out = notes.to_string();
    loop {
        let collapsed = EMPTY_SEPARATOR.replace_all(&out, "|").into_owned();
        if collapsed == out {
            break;
        }
        out = collapsed;
    }
    EDGE_SEPARATOR.replace_all(&out, "").trim().to_string()
}

#[cfg(test)]
#[path = "employee_shift_tests.rs"]
mod tests;
