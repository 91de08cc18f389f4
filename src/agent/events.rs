//! Agent-mode event records and rendering.
//!
//! Every step of an agent job is reported as an [`AgentResponse`]. The same
//! record has two renderings: a machine-readable JSON line (the wire format
//! consumers script against) and a human-readable status line. When an
//! output file is configured, the JSON form is appended there in both modes
//! so a human-readable session still leaves a machine-readable trace.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

/// Coarse lifecycle state of an agent job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Started,
    Processing,
    Completed,
    Aborted,
    Error,
}

/// Progress/status payload attached to most events.
#[derive(Debug, Clone, Serialize)]
pub struct AgentJobStatus {
    pub job_id: String,
    pub status: JobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentJobStatus {
    /// Status payload with just a state and message.
    pub fn new(job_id: impl Into<String>, status: JobState, message: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            progress: None,
            message: Some(message.into()),
            result: None,
            error: None,
        }
    }

    /// Attach a progress percentage.
    #[must_use]
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// File-change payload for build events.
#[derive(Debug, Clone, Serialize)]
pub struct AgentBuildInfo {
    pub job_id: String,
    pub path: String,
    pub tokens: u32,
    pub finished: bool,
    pub removed: bool,
}

/// Streamed model-reply chunk.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    pub job_id: String,
    pub chunk: String,
}

/// One agent-mode event, tagged for the JSON wire format
/// (`{"type":"job_started",...}`).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentResponse {
    JobStarted { job_id: String, data: AgentJobStatus },
    JobStatus { job_id: String, data: AgentJobStatus },
    AgentReply { job_id: String, message: String, data: AgentReply },
    BuildInfo { job_id: String, message: String, data: AgentBuildInfo },
    JobCompleted { job_id: String, data: AgentJobStatus },
    JobError { job_id: String, error: String, data: AgentJobStatus },
}

/// Destination for agent events: stdout (JSON or human) plus an optional
/// JSON-lines file.
#[derive(Debug, Clone)]
pub struct AgentSink {
    json: bool,
    output_file: Option<PathBuf>,
}

impl AgentSink {
    pub fn new(json: bool, output_file: Option<PathBuf>) -> Self {
        Self { json, output_file }
    }

    /// Report one event.
    ///
    /// JSON mode writes the JSON line to the output file when one is set,
    /// otherwise to stdout. Human mode always renders to stdout and appends
    /// the JSON line to the output file when one is set.
    pub fn emit(&self, response: &AgentResponse) -> Result<()> {
        let line = serde_json::to_string(response).context("failed to encode agent event")?;

        if self.json {
            match &self.output_file {
                Some(path) => self.append(path, &line)?,
                None => println!("{line}"),
            }
        } else {
            render_human(response);
            if let Some(path) = &self.output_file {
                self.append(path, &line)?;
            }
        }

        Ok(())
    }

    fn append(&self, path: &Path, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .with_context(|| format!("failed to open output file {}", path.display()))?;
        writeln!(file, "{line}")
            .with_context(|| format!("failed to write output file {}", path.display()))?;
        Ok(())
    }
}

fn render_human(response: &AgentResponse) {
    match response {
        AgentResponse::JobStarted { job_id, data } => {
            let message = data.message.as_deref().unwrap_or("job initialized");
            println!("{} {}", format!("Job {job_id} started:").cyan().bold(), message);
        }
        AgentResponse::JobStatus { data, .. } => {
            let message = data.message.as_deref().unwrap_or("");
            match data.progress {
                Some(progress) => println!("{} {message}", format!("[{progress:>3}%]").dimmed()),
                None => println!("{} {message}", "[ .. ]".dimmed()),
            }
        }
        AgentResponse::AgentReply { message, .. } => {
            println!("{} {message}", "Agent:".cyan());
        }
        AgentResponse::BuildInfo { data, .. } => {
            if data.finished {
                println!("{}", format!("Created {} ({} tokens)", data.path, data.tokens).green());
            } else {
                println!("Creating {}", data.path);
            }
        }
        AgentResponse::JobCompleted { job_id, data } => {
            let message = data.message.as_deref().unwrap_or("done");
            println!("{} {}", format!("Job {job_id} completed:").green().bold(), message);
        }
        AgentResponse::JobError { error, .. } => {
            println!("{} {error}", "Error:".red().bold());
        }
    }
}
