//! `till health` specs

use crate::prelude::*;
use serde_json::json;

#[test]
fn health_of_fresh_store() {
    let store = Store::empty();
    store.till().args(&["health"]).passes().stdout_eq(
        "Store: till-pos
Status: healthy
Version: v5 (expected v5)

TABLE            RECORDS
categories             0
customers              0
employees              0
products               0
receiptSettings        1
sales                  0
settings               1
shifts                 0
",
    );
}

#[test]
fn health_json_report() {
    let store = Store::empty();
    let report = store.till().args(&["-o", "json", "health"]).passes().json();

    assert_eq!(report["healthy"], json!(true));
    assert_eq!(report["version"], json!(5));
    assert_eq!(report["expected_version"], json!(5));
    assert_eq!(report["tables"]["settings"], json!(1));
    assert_eq!(report["tables"].as_object().unwrap().len(), 8);
    assert!(report.get("error").is_none());
}

#[test]
fn unavailable_store_is_unhealthy() {
    let store = Store::empty();
    let file = store.state_path().join("not-a-dir");
    std::fs::write(&file, "").unwrap();

    let run = cli()
        .env("TILL_STATE_DIR", &file)
        .args(&["health"])
        .fails();
    assert_eq!(run.code(), Some(1));
}
