//! Integration tests for the `outlet` CLI binary.
//!
//! Argument parsing, help output, settings handling and connection errors,
//! all without a running backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `outlet` binary with env isolation.
fn outlet_cmd(config_home: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("outlet");
    cmd.env("HOME", config_home)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("OUTLET_HOST")
        .env_remove("OUTLET_PORT")
        .env_remove("OUTLET_OUTPUT")
        .env_remove("OUTLET_CONNECT_TIMEOUT")
        .env_remove("OUTLET_CONNECTION__MODE")
        .env_remove("OUTLET_CONNECTION__HOST")
        .env_remove("RUST_LOG");
    cmd
}

fn isolated() -> assert_cmd::Command {
    outlet_cmd("/tmp/outlet-cli-test-nonexistent")
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = isolated().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    isolated().arg("--help").assert().success().stdout(
        predicate::str::contains("devices")
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("node")),
    );
}

#[test]
fn test_version_flag() {
    isolated()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("outlet"));
}

#[test]
fn test_config_subcommands_exist() {
    isolated()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("get").and(predicate::str::contains("put")));
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = isolated().arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("foobar"));
}

#[test]
fn test_invalid_output_format() {
    let output = isolated()
        .args(["--output", "xml", "devices"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("possible values"));
}

#[test]
fn test_node_requires_device() {
    isolated().args(["node", "42"]).assert().code(2);
}

#[test]
fn test_bad_connection_mode_is_usage_error() {
    isolated()
        .env("OUTLET_CONNECTION__MODE", "carrier-pigeon")
        .arg("devices")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("connection.mode"));
}

// ── Connection ──────────────────────────────────────────────────────

#[test]
fn test_no_server_is_connection_error() {
    isolated()
        .args([
            "--host",
            "127.0.0.1",
            "--port",
            "1",
            "--connect-timeout",
            "1",
            "devices",
        ])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not reach the backend"));
}

// ── Settings ────────────────────────────────────────────────────────

#[test]
fn test_settings_show_without_file() {
    isolated()
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[connection]"));
}

#[test]
fn test_settings_init_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().to_str().unwrap();

    outlet_cmd(home)
        .args(["--host", "10.0.0.9", "settings", "init"])
        .assert()
        .success();

    outlet_cmd(home)
        .args(["--output", "plain", "settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.0.0.9:50051"));
}
