//! `till schema` and `till migrations` specs

use crate::prelude::*;
use serde_json::json;

#[test]
fn schema_of_first_version() {
    cli().args(&["schema", "--version", "1"]).passes().stdout_eq(
        "Schema v1

TABLE       INDEXES
products    ++id, name, sku, barcode, categoryId
categories  ++id, name
sales       ++id, createdAt, status, customerId
settings    id
",
    );
}

#[test]
fn latest_schema_json() {
    let out = cli().args(&["-o", "json", "schema"]).passes().json();
    assert_eq!(out["version"], json!(5));
    assert_eq!(out["tables"]["shifts"], json!("++id, employeeId, status, openedAt"));
    assert_eq!(
        out["tables"]["sales"],
        json!("++id, createdAt, status, customerId, employeeId, shiftId")
    );
}

#[test]
fn unknown_version_fails() {
    cli()
        .args(&["schema", "--version", "6"])
        .fails()
        .stderr_has("unknown schema version 6");
}

#[test]
fn migrations_are_listed_in_order() {
    cli().args(&["migrations"]).passes().stdout_eq(
        "VERSION  MIGRATION
     v5  ExtractEmployeeShiftFromNotes
",
    );
}
