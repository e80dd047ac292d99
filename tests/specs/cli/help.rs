//! CLI help specs

use crate::prelude::*;

#[test]
fn no_subcommand_prints_help() {
    cli()
        .passes()
        .stdout_has("Usage: till")
        .stdout_has("health")
        .stdout_has("migrations");
}

#[test]
fn version_flag_prints_version() {
    cli()
        .args(&["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}
