//! CLI error handling specs

use crate::prelude::*;

#[test]
fn unknown_subcommand_fails() {
    cli()
        .args(&["migrate"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn reset_without_confirmation_is_refused() {
    let store = Store::empty();
    store
        .till()
        .args(&["reset"])
        .fails()
        .stderr_has("pass --yes to confirm");
    assert!(!store.db_path().exists());
}

#[test]
fn unusable_state_dir_reports_storage_unavailable() {
    let store = Store::empty();
    let file = store.state_path().join("not-a-dir");
    std::fs::write(&file, "").unwrap();

    cli()
        .env("TILL_STATE_DIR", &file)
        .args(&["init"])
        .fails();
}
