//! `till init` specs

use crate::prelude::*;
use serde_json::json;

#[test]
fn fresh_install_creates_current_store() {
    let store = Store::empty();
    store
        .till()
        .args(&["init"])
        .passes()
        .stdout_eq("Store till-pos ready at v5\n");

    let db = store.read_db();
    assert_eq!(db["name"], json!("till-pos"));
    assert_eq!(db["version"], json!(5));
    assert_eq!(
        db["tables"]["sales"]["spec"],
        json!("++id, createdAt, status, customerId, employeeId, shiftId")
    );
    assert_eq!(db["tables"]["settings"]["records"][0]["storeName"], json!("My Store"));
    assert_eq!(db["tables"]["receiptSettings"]["records"][0]["id"], json!("receipt"));
}

#[test]
fn init_json_output() {
    let store = Store::empty();
    let out = store.till().args(&["-o", "json", "init"]).passes().json();
    assert_eq!(out["ready"], json!(true));
    assert_eq!(out["version"], json!(5));
    assert_eq!(out["store"], json!("till-pos"));
}

#[test]
fn init_writes_log_file() {
    let store = Store::empty();
    store.till().args(&["init"]).passes();
    let log = std::fs::read_to_string(store.state_path().join("till.log")).unwrap();
    assert!(log.contains("store ready"), "log: {log}");
}

#[test]
fn second_init_keeps_settings() {
    let store = Store::empty();
    store.till().args(&["init"]).passes();
    let mut db = store.read_db();
    db["tables"]["settings"]["records"][0]["storeName"] = json!("Corner Shop");
    store.write_db(&db);

    store.till().args(&["init"]).passes();
    assert_eq!(
        store.read_db()["tables"]["settings"]["records"][0]["storeName"],
        json!("Corner Shop")
    );
}

#[test]
fn v4_store_is_upgraded_and_sales_migrated() {
    let store = Store::empty();
    store.write_db(&json!({
        "name": "till-pos",
        "saved_at": "2026-01-01T00:00:00Z",
        "version": 4,
        "tables": {
            "products": {
                "spec": "++id, name, sku, barcode, categoryId",
                "next_id": 2,
                "records": [{ "id": 1, "name": "Cola", "quantity": 24 }],
            },
            "sales": {
                "spec": "++id, createdAt, status, customerId",
                "next_id": 3,
                "records": [
                    { "id": 1, "status": "completed", "notes": "Employee: E1 | Shift: S9 | gift wrap requested" },
                    { "id": 2, "status": "completed", "notes": "Employee: E2 | Shift: S9" },
                ],
            },
        },
    }));

    store.till().args(&["init"]).passes();

    let db = store.read_db();
    assert_eq!(db["version"], json!(5));
    let sales = &db["tables"]["sales"]["records"];
    assert_eq!(
        sales[0],
        json!({
            "id": 1,
            "status": "completed",
            "employeeId": "E1",
            "shiftId": "S9",
            "notes": "gift wrap requested",
        })
    );
    assert_eq!(
        sales[1],
        json!({ "id": 2, "status": "completed", "employeeId": "E2", "shiftId": "S9" })
    );
    assert_eq!(
        db["tables"]["products"]["records"][0],
        json!({ "id": 1, "name": "Cola", "quantity": 24 })
    );
    assert!(db["tables"]["shifts"]["records"].is_array());
}

#[test]
fn newer_store_is_recreated() {
    let store = Store::empty();
    store.till().args(&["init"]).passes();
    let mut db = store.read_db();
    db["version"] = json!(99);
    db["tables"]["products"]["records"] = json!([{ "id": 1, "name": "Cola" }]);
    store.write_db(&db);

    store
        .till()
        .args(&["init"])
        .passes()
        .stdout_eq("Store till-pos ready at v5\n");

    let db = store.read_db();
    assert_eq!(db["version"], json!(5));
    assert_eq!(db["tables"]["products"]["records"], json!([]));
}

#[test]
fn corrupt_store_is_unavailable_until_reset() {
    let store = Store::empty();
    std::fs::write(store.db_path(), b"not a store").unwrap();

    store
        .till()
        .args(&["init"])
        .fails()
        .stderr_has("storage unavailable");
    assert_eq!(std::fs::read(store.db_path()).unwrap(), b"not a store");

    store.till().args(&["reset", "--yes"]).passes();

    assert_eq!(store.read_db()["version"], json!(5));
    let bak = store.state_path().join("till-pos.bak");
    assert_eq!(std::fs::read(bak).unwrap(), b"not a store");
}
