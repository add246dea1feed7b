use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn exit_code_for_unknown_subcommand() {
    let mut cmd = Command::cargo_bin("papergraph").expect("binary");
    cmd.arg("not-a-real-command");
    cmd.assert().failure().code(predicate::eq(2));
}

#[test]
fn exit_code_for_missing_subcommand() {
    let mut cmd = Command::cargo_bin("papergraph").expect("binary");
    cmd.assert().failure().code(predicate::eq(2));
}

#[test]
fn help_exits_cleanly() {
    let mut cmd = Command::cargo_bin("papergraph").expect("binary");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("papers"))
        .stdout(predicate::str::contains("grobid"));
}

#[test]
fn exit_code_for_missing_password() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cmd = Command::cargo_bin("papergraph").expect("binary");
    cmd.current_dir(dir.path())
        .env_remove("NEO4J_PASSWORD")
        .arg("basic");
    cmd.assert()
        .failure()
        .code(predicate::eq(1))
        .stderr(predicate::str::contains("NEO4J_PASSWORD"));
}
