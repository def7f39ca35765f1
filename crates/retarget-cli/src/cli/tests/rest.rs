//! Tests for replay, normalize and the global --config flag.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_replay() {
    match parse(&["retarget", "replay", "session.har"]) {
        CliCommand::Replay { path, export } => {
            assert_eq!(path, PathBuf::from("session.har"));
            assert!(export.is_none());
        }
        _ => panic!("expected Replay"),
    }
}

#[test]
fn cli_parse_replay_export() {
    match parse(&["retarget", "replay", "session.har", "--export", "found.json"]) {
        CliCommand::Replay { export, .. } => {
            assert_eq!(export, Some(PathBuf::from("found.json")));
        }
        _ => panic!("expected Replay --export"),
    }
}

#[test]
fn cli_parse_normalize() {
    match parse(&["retarget", "normalize", "HTTP://Example.COM/a#b", "http://x/"]) {
        CliCommand::Normalize { urls } => {
            assert_eq!(urls, vec!["HTTP://Example.COM/a#b", "http://x/"]);
        }
        _ => panic!("expected Normalize"),
    }
}

#[test]
fn cli_parse_normalize_requires_url() {
    assert!(Cli::try_parse_from(["retarget", "normalize"]).is_err());
}

#[test]
fn cli_parse_global_config() {
    let cli = Cli::try_parse_from(["retarget", "replay", "s.har", "--config", "/tmp/r.toml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/r.toml")));

    let cli = Cli::try_parse_from(["retarget", "--config", "c.toml", "normalize", "http://x/"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
}

#[test]
fn cli_parse_unknown_subcommand_fails() {
    assert!(Cli::try_parse_from(["retarget", "proxy"]).is_err());
}
