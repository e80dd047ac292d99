// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::error::ErrorKind;
use clap::FromArgMatches;
use yare::parameterized;

use super::{cli_command, format_error, Cli, Commands, OutputFormat};

fn parse(args: &[&str]) -> Cli {
    let matches = cli_command().try_get_matches_from(args).unwrap();
    Cli::from_arg_matches(&matches).unwrap()
}

#[test]
fn version_flag() {
    let err = cli_command()
        .try_get_matches_from(["till", "--version"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
}

#[parameterized(
    default_text = { &["till", "init"], OutputFormat::Text },
    json_before = { &["till", "-o", "json", "health"], OutputFormat::Json },
    json_after = { &["till", "migrations", "--output", "json"], OutputFormat::Json },
)]
fn output_format_is_global(args: &[&str], expected: OutputFormat) {
    assert_eq!(parse(args).output, expected);
}

#[test]
fn schema_version_flag_belongs_to_subcommand() {
    match parse(&["till", "schema", "--version", "3"]).command {
        Some(Commands::Schema(args)) => assert_eq!(args.version, Some(3)),
        _ => panic!("expected schema command"),
    }
}

#[test]
fn reset_requires_explicit_flag_to_confirm() {
    match parse(&["till", "reset"]).command {
        Some(Commands::Reset(args)) => assert!(!args.yes),
        _ => panic!("expected reset command"),
    }
    match parse(&["till", "reset", "--yes"]).command {
        Some(Commands::Reset(args)) => assert!(args.yes),
        _ => panic!("expected reset command"),
    }
}

#[test]
fn unknown_subcommand_is_rejected() {
    let err = cli_command()
        .try_get_matches_from(["till", "migrate"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
}

#[test]
fn format_error_skips_redundant_causes() {
    let inner = std::io::Error::other("disk full");
    let err = anyhow::Error::new(inner).context("write failed: disk full");
    assert_eq!(format_error(&err), "write failed: disk full");
}

#[test]
fn format_error_renders_new_causes() {
    let inner = std::io::Error::other("disk full");
    let err = anyhow::Error::new(inner).context("write failed");
    assert_eq!(
        format_error(&err),
        "write failed\n\nCaused by:\n    0: disk full"
    );
}
