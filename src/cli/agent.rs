//! The `plandex agent` command.
//!
//! Runs Plandex in autonomous agent mode. The prompt can arrive as a
//! positional argument, from a file via `--file`, or through piped stdin;
//! when both an explicit prompt and piped data are present they are joined
//! with a `---` separator, matching what automation around the CLI expects.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncReadExt;

use crate::agent::{self, AgentConfig};

/// Command-line arguments for agent mode.
///
/// By default agent mode is standalone: it detects whether a server is
/// reachable and falls back to local execution otherwise. `--full-mode` and
/// `--local-mode` force either behavior.
#[derive(Parser, Debug)]
pub struct AgentArgs {
    /// Task prompt. May also come from `--file` or piped stdin.
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Read the prompt from a file.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Append JSON event lines to a file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Work without local plan context.
    #[arg(long)]
    pub no_plan: bool,

    /// Do not execute commands yielded by the task result.
    #[arg(long)]
    pub no_exec: bool,

    /// Emit JSON instead of human-readable progress.
    #[arg(long)]
    pub json: bool,

    /// Force full mode (requires a reachable server).
    #[arg(long, conflicts_with = "local_mode")]
    pub full_mode: bool,

    /// Force local mode (standalone, no server required).
    #[arg(long)]
    pub local_mode: bool,
}

impl AgentArgs {
    /// Execute the agent command.
    pub async fn execute(self) -> Result<()> {
        let Some(prompt) = self.resolve_prompt().await? else {
            println!("No prompt to send");
            return Ok(());
        };

        let mut config = AgentConfig::new(agent::generate_job_id());
        config.output_file = self.output;
        config.no_plan = self.no_plan;
        config.auto_exec = !self.no_exec;
        config.json = self.json;
        config.full_mode = self.full_mode;
        config.local_mode = self.local_mode;
        config.workdir =
            std::env::current_dir().context("failed to determine working directory")?;

        agent::run_agent_mode(config, &prompt).await
    }

    /// Gather the prompt from argument/file and piped stdin.
    async fn resolve_prompt(&self) -> Result<Option<String>> {
        let explicit = match (&self.prompt, &self.file) {
            (Some(prompt), _) => Some(prompt.clone()),
            (None, Some(path)) => Some(
                tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("failed to read prompt file {}", path.display()))?,
            ),
            (None, None) => None,
        };

        let piped = if std::io::stdin().is_terminal() {
            None
        } else {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("failed to read piped input")?;
            Some(buffer)
        };

        Ok(combine_prompt(explicit, piped))
    }
}

/// Join the explicit prompt with piped data.
///
/// Both present: joined with a `---` separator. Either alone: used as-is.
/// Whitespace-only input counts as absent.
pub(crate) fn combine_prompt(explicit: Option<String>, piped: Option<String>) -> Option<String> {
    let piped = piped.filter(|p| !p.trim().is_empty());

    let combined = match (explicit, piped) {
        (Some(prompt), Some(piped)) => Some(format!("{prompt}\n\n---\n\n{piped}")),
        (Some(prompt), None) => Some(prompt),
        (None, Some(piped)) => Some(piped),
        (None, None) => None,
    };

    combined.filter(|p| !p.trim().is_empty())
}
