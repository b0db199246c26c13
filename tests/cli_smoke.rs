//! Behavioural smoke test for the CLI entrypoint.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn cli_without_arguments_prints_usage() {
    let mut cmd = cargo_bin_cmd!("velero-plugin-scaleway");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_every_subcommand() {
    let mut cmd = cargo_bin_cmd!("velero-plugin-scaleway");
    let help = cmd.arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&help.get_output().stdout).into_owned();
    for subcommand in [
        "check-config",
        "volume-info",
        "create-snapshot",
        "delete-snapshot",
        "restore-volume",
    ] {
        assert!(stdout.contains(subcommand), "help should mention {subcommand}: {stdout}");
    }
}

#[test]
fn snapshot_commands_without_region_fail() {
    let mut cmd = cargo_bin_cmd!("velero-plugin-scaleway");
    cmd.args(["delete-snapshot", "snap-1"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("missing region"));
}
