mod common;

use assert_cmd::Command;
use common::cli::{Workspace, run};
use predicates::prelude::*;
use std::fs;

#[test]
fn e2e_completions_stdout_and_file() {
    let _log = common::test_log("e2e_completions_stdout_and_file");
    let workspace = Workspace::new();

    let out = run(&workspace, ["completions", "bash"], "completions_bash");
    assert!(out.status.success(), "completions failed: {}", out.stderr);
    assert!(out.stdout.contains("gtest-report"));
    assert!(out.stdout.contains("generate"));

    let out = run(
        &workspace,
        ["completions", "fish", "-o", "gtest-report.fish"],
        "completions_fish_file",
    );
    assert!(out.status.success(), "completions failed: {}", out.stderr);
    assert!(out.stderr.contains("Generated fish completions"));
    let script = fs::read_to_string(workspace.path("gtest-report.fish")).expect("script");
    assert!(script.contains("complete -c gtest-report"));
}

#[test]
fn e2e_completions_ignore_broken_config() {
    let _log = common::test_log("e2e_completions_ignore_broken_config");
    let workspace = Workspace::new();

    let out = run(
        &workspace,
        ["--config", "missing.yaml", "completions", "zsh"],
        "completions_no_config",
    );
    assert!(out.status.success(), "completions failed: {}", out.stderr);
    assert!(out.stdout.contains("#compdef gtest-report"));
}

#[test]
fn e2e_help_and_version() {
    let _log = common::test_log("e2e_help_and_version");
    Command::new(assert_cmd::cargo::cargo_bin!("gtest-report"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate").and(predicate::str::contains("summary")));

    Command::new(assert_cmd::cargo::cargo_bin!("gtest-report"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("gtest-report "));

    Command::new(assert_cmd::cargo::cargo_bin!("gtest-report"))
        .args(["report", "a.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--project"));
}
