//! The `plandex upgrade` command and the automatic startup check.
//!
//! Two entry points share the pipeline in [`crate::upgrade`]:
//!
//! - [`UpgradeArgs::execute`] backs the explicit `plandex upgrade` command,
//!   where check failures are surfaced to the user;
//! - [`startup_check`] runs before every other command and must never get in
//!   the way: all pre-confirmation failures are logged at debug level and
//!   swallowed, and the current binary carries on untouched.
//!
//! Once the user has confirmed an upgrade, failures become fatal in both
//! paths: aborting halfway through an apply is the one thing worse than not
//! upgrading at all.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use semver::Version;
use tracing::debug;

use super::common;
use crate::config;
use crate::upgrade::{self, ReleaseResolver, UpgradeCheck};

/// Command-line arguments for the upgrade command.
#[derive(Parser, Debug)]
pub struct UpgradeArgs {
    /// Check for updates without installing.
    #[arg(long)]
    pub check: bool,

    /// Apply an available upgrade without prompting.
    #[arg(short, long)]
    pub yes: bool,
}

impl UpgradeArgs {
    /// Execute the upgrade command.
    pub async fn execute(self) -> Result<()> {
        let resolver = ReleaseResolver::new();
        let client = upgrade::http_client()?;

        println!("{}", "Checking for updates...".cyan());
        let check =
            resolver.check(&client).await.context("failed to check for updates")?;

        let target = match check {
            UpgradeCheck::NoUpgrade => {
                println!(
                    "{}",
                    format!("You are on the latest version ({})", resolver.current_version())
                        .green()
                );
                return Ok(());
            }
            UpgradeCheck::UpgradeAvailable(target) => target,
        };

        println!(
            "{}",
            format!("Update available: {} -> {}", resolver.current_version(), target).green()
        );

        if self.check {
            println!("Run `plandex upgrade` to install the latest version");
            return Ok(());
        }

        let confirmed =
            self.yes || common::confirm_yes_no("Upgrade to the latest version?").await?;
        if !confirmed {
            println!("Upgrade cancelled");
            return Ok(());
        }

        apply_and_restart(&target).await
    }
}

/// Automatic upgrade check run before command dispatch.
///
/// Skipped entirely when [`config::SKIP_UPGRADE_VAR`] is set or for
/// development builds. Any failure before the user confirms is logged and
/// ignored; the invoking command proceeds on the current binary.
pub async fn startup_check() -> Result<()> {
    if config::upgrade_checks_disabled() {
        debug!("upgrade check disabled via {}", config::SKIP_UPGRADE_VAR);
        return Ok(());
    }
    if config::current_version() == config::DEVELOPMENT_VERSION {
        return Ok(());
    }

    let resolver = ReleaseResolver::new();
    let client = match upgrade::http_client() {
        Ok(client) => client,
        Err(err) => {
            debug!("upgrade check skipped: {err}");
            return Ok(());
        }
    };

    let target = match resolver.check(&client).await {
        Ok(UpgradeCheck::UpgradeAvailable(target)) => target,
        Ok(UpgradeCheck::NoUpgrade) => return Ok(()),
        Err(err) => {
            debug!("upgrade check skipped: {err}");
            return Ok(());
        }
    };

    println!(
        "A new version of Plandex is available: {}",
        target.to_string().green().bold()
    );
    println!("Current version: {}", resolver.current_version().cyan().bold());

    let confirmed = match common::confirm_yes_no("Upgrade to the latest version?").await {
        Ok(confirmed) => confirmed,
        Err(err) => {
            debug!("could not read confirmation: {err}");
            return Ok(());
        }
    };

    if !confirmed {
        println!("Note: set {}=1 to stop upgrade prompts", config::SKIP_UPGRADE_VAR);
        return Ok(());
    }

    // The user said yes: from here on failures are fatal.
    apply_and_restart(&target).await
}

async fn apply_and_restart(target: &Version) -> Result<()> {
    upgrade::perform_upgrade(target)
        .await
        .with_context(|| format!("failed to upgrade to {target}"))?;

    println!("{}", "Upgrade complete, restarting...".green());
    upgrade::restart::restart_in_place().await
}
