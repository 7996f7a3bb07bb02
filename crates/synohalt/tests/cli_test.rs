#![allow(clippy::unwrap_used)]
// Black-box tests for the `synohalt` binary: argument parsing, config
// validation, and confirmation behavior. Nothing here touches a network.

use assert_cmd::Command;
use predicates::prelude::*;

/// A command with a clean environment: no ambient SYNOHALT_* variables,
/// and a config path that cannot exist.
fn synohalt() -> Command {
    let mut cmd = Command::cargo_bin("synohalt").unwrap();
    cmd.env_clear()
        .env("SYNOHALT_CONFIG", "/nonexistent/synohalt-test/config.json");
    cmd
}

#[test]
fn help_lists_subcommands() {
    synohalt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("shutdown"))
        .stdout(predicate::str::contains("bundles"));
}

#[test]
fn missing_credentials_name_every_absent_field() {
    synohalt()
        .args(["bundles", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("host"))
        .stderr(predicate::str::contains("username"))
        .stderr(predicate::str::contains("password"));
}

#[test]
fn partial_credentials_name_only_missing_fields() {
    synohalt()
        .args(["bundles", "list"])
        .env("SYNOHALT_HOST", "nas.local")
        .env("SYNOHALT_USERNAME", "admin")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("password"))
        .stderr(predicate::str::contains("host").not());
}

#[test]
fn declined_confirmation_aborts_shutdown_cleanly() {
    synohalt()
        .arg("shutdown")
        .env("SYNOHALT_HOST", "nas.local")
        .env("SYNOHALT_USERNAME", "admin")
        .env("SYNOHALT_PASSWORD", "pw")
        .write_stdin("n\n")
        .assert()
        .success();
}

#[test]
fn ssh_flags_are_mutually_exclusive() {
    synohalt()
        .args(["shutdown", "--ssh", "--ssh-only"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn bundle_status_requires_a_name() {
    synohalt()
        .args(["bundles", "status"])
        .assert()
        .failure()
        .code(2);
}
