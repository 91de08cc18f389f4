//! Command-line interface for the Plandex CLI.
//!
//! Each command lives in its own module with an args struct and an
//! `execute()` entry point; this module owns the root [`Cli`] parser,
//! global flags, and dispatch. Before any command other than `upgrade`
//! runs, the automatic upgrade check in [`upgrade::startup_check`] gets a
//! chance to offer (never force) a newer binary.

pub mod agent;
pub mod common;
pub mod upgrade;


use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Root command-line parser.
#[derive(Parser)]
#[command(
    name = "plandex",
    about = "Plandex - terminal-based AI coding agent",
    version,
    author,
    long_about = "Plandex is a terminal-based AI coding agent. It keeps itself up to date by \
                  checking for new releases on startup and can run autonomous agent jobs that \
                  execute commands on your behalf under full process supervision."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run Plandex in autonomous agent mode (local mode by default).
    Agent(agent::AgentArgs),

    /// Check for and install a newer release of the CLI.
    Upgrade(upgrade::UpgradeArgs),
}

impl Cli {
    /// Tracing filter derived from the verbosity flags.
    ///
    /// `None` means logging stays uninitialized (quiet mode). Otherwise
    /// `--verbose` forces debug and the default honors `RUST_LOG`, falling
    /// back to warnings from this crate only.
    pub fn log_filter(&self) -> Option<EnvFilter> {
        if self.quiet {
            return None;
        }
        if self.verbose {
            return Some(EnvFilter::new("debug"));
        }
        Some(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("plandex_cli=warn")),
        )
    }

    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        // Offer an upgrade before doing anything else; `upgrade` itself
        // performs its own, interactive check.
        if !matches!(self.command, Commands::Upgrade(_)) {
            upgrade::startup_check().await?;
        }

        match self.command {
            Commands::Agent(cmd) => cmd.execute().await,
            Commands::Upgrade(cmd) => cmd.execute().await,
        }
    }
}
