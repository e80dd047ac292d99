//! `till reset` specs

use crate::prelude::*;
use serde_json::json;

#[test]
fn reset_clears_records_and_reseeds() {
    let store = Store::empty();
    store.till().args(&["init"]).passes();
    let mut db = store.read_db();
    db["tables"]["products"]["records"] = json!([{ "id": 1, "name": "Cola" }]);
    db["tables"]["settings"]["records"][0]["storeName"] = json!("Corner Shop");
    store.write_db(&db);

    store
        .till()
        .args(&["reset", "--yes"])
        .passes()
        .stdout_eq("Store till-pos reset at v5\n");

    let db = store.read_db();
    assert_eq!(db["tables"]["products"]["records"], json!([]));
    assert_eq!(db["tables"]["settings"]["records"][0]["storeName"], json!("My Store"));
}

#[test]
fn reset_without_store_creates_one() {
    let store = Store::empty();
    store.till().args(&["reset", "--yes"]).passes();
    assert_eq!(store.read_db()["version"], json!(5));
}
