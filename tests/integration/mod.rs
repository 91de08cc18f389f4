//! Integration test suite for the Plandex CLI.
//!
//! Drives the built `plandex` binary end to end. Every invocation sets
//! `PLANDEX_SKIP_UPGRADE` so no test ever reaches the release endpoint.
//!
//! Test organization:
//! - **cli**: argument parsing, help/version output, flag validation
//! - **agent**: agent-mode runs, event streams, prompt acquisition

mod agent;
mod cli;

use assert_cmd::Command;

/// The binary under test with upgrade checks disabled.
pub fn plandex() -> Command {
    let mut cmd = Command::cargo_bin("plandex").expect("plandex binary builds");
    cmd.env("PLANDEX_SKIP_UPGRADE", "1");
    cmd
}
