//! Common utilities for CLI commands.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Ask the user a yes/no question, defaulting to yes on an empty answer.
///
/// Non-interactive sessions (stdin is not a TTY) decline without blocking,
/// so scripts and CI never hang on a prompt or accidentally accept one.
pub async fn confirm_yes_no(question: &str) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }

    print!("{} ", format!("{question} [Y/n]:").green());
    io::stdout().flush()?;

    // Async stdin keeps the prompt integrated with the Tokio runtime.
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut response = String::new();
    reader.read_line(&mut response).await?;
    let response = response.trim().to_lowercase();

    Ok(response.is_empty() || response == "y" || response == "yes")
}
