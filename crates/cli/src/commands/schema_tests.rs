// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn latest_schema_text() {
    std::env::set_var("NO_COLOR", "1");
    let registry = SchemaRegistry::builtin().unwrap();
    let version = registry.current_version();
    let out = format_schema(version, registry.latest_schema());

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Schema v5");
    assert!(lines[2].starts_with("TABLE"));
    assert!(out.contains("sales            ++id, createdAt, status, customerId, employeeId, shiftId"));
    assert!(out.contains("settings         id\n"));
    // header, blank line, column header, eight tables
    assert_eq!(lines.len(), 11);
}

#[test]
#[serial]
fn migrations_text() {
    std::env::set_var("NO_COLOR", "1");
    let views = vec![
        MigrationView {
            version: 5,
            name: "ExtractEmployeeShiftFromNotes",
        },
        MigrationView {
            version: 12,
            name: "SplitCustomerName",
        },
    ];
    assert_eq!(
        format_migrations(&views),
        "VERSION  MIGRATION\n     v5  ExtractEmployeeShiftFromNotes\n    v12  SplitCustomerName\n"
    );
}

#[test]
fn schema_view_serializes_specs_as_strings() {
    let registry = SchemaRegistry::builtin().unwrap();
    let view = SchemaView {
        version: 1,
        tables: registry.schema_for_version(Version::FIRST).unwrap(),
    };
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["version"], 1);
    assert_eq!(json["tables"]["settings"], "id");
    assert_eq!(json["tables"]["products"], "++id, name, sku, barcode, categoryId");
}
