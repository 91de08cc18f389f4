//! CLI surface tests: help, version, and flag validation.

use predicates::prelude::*;

use super::plandex;

#[test]
fn help_lists_commands() {
    plandex()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("agent"))
        .stdout(predicate::str::contains("upgrade"));
}

#[test]
fn version_matches_crate() {
    plandex()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn agent_without_prompt_is_a_friendly_noop() {
    plandex()
        .args(["agent", "--local-mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No prompt to send"));
}

#[test]
fn conflicting_mode_flags_are_rejected() {
    plandex()
        .args(["agent", "task", "--full-mode", "--local-mode"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn conflicting_verbosity_flags_are_rejected() {
    plandex().args(["--verbose", "--quiet", "agent", "task"]).assert().failure();
}

#[test]
fn unknown_subcommands_are_rejected() {
    plandex().arg("frobnicate").assert().failure();
}
