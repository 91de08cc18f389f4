//! Plandex CLI entry point
//!
//! Parses command-line arguments, initializes logging, and dispatches to
//! the selected command. Errors are rendered through the user-friendly
//! reporter so fatal failures carry actionable suggestions.

use anyhow::Result;
use clap::Parser;
use plandex_cli::cli;
use plandex_cli::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if let Some(filter) = cli.log_filter() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
