//! Autonomous agent mode.
//!
//! Agent mode runs a single prompt-driven job and reports progress as a
//! stream of typed events (see [`events`]). By default it works standalone
//! ("local mode"); when an API server answers a health probe it switches to
//! "full mode". The remote task-execution API is still a stub, so both modes
//! currently drive the scripted local backend, but the surrounding
//! plumbing (mode detection, event stream, output files, auto-exec) is
//! real.
//!
//! Commands yielded by a task result are executed through the process-group
//! supervisor in [`crate::exec`], so interrupting the CLI mid-run tears
//! down the whole command tree rather than orphaning it.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config;
use crate::exec::{self, ExecOutcome};

pub mod events;


pub use events::{AgentBuildInfo, AgentJobStatus, AgentReply, AgentResponse, AgentSink, JobState};

/// Configuration for one agent-mode job.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Identifier attached to every event of this job.
    pub job_id: String,
    /// Append JSON event lines to this file.
    pub output_file: Option<PathBuf>,
    /// Work without local plan context.
    pub no_plan: bool,
    /// Execute commands yielded by the task result.
    pub auto_exec: bool,
    /// Emit JSON instead of human-readable output.
    pub json: bool,
    /// Force full mode (server required).
    pub full_mode: bool,
    /// Force local mode (standalone).
    pub local_mode: bool,
    /// Directory task artifacts are written to and commands run in.
    pub workdir: PathBuf,
}

impl AgentConfig {
    /// Configuration with defaults matching the CLI's: local-capable,
    /// auto-exec on, human-readable, current directory.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            output_file: None,
            no_plan: false,
            auto_exec: true,
            json: false,
            full_mode: false,
            local_mode: false,
            workdir: PathBuf::from("."),
        }
    }

    fn sink(&self) -> AgentSink {
        AgentSink::new(self.json, self.output_file.clone())
    }

    fn status(&self, state: JobState, message: impl Into<String>) -> AgentJobStatus {
        AgentJobStatus::new(&self.job_id, state, message)
    }
}

/// Result of executing a task through the (stubbed) backend.
#[derive(Debug, Default)]
pub struct TaskOutcome {
    /// Shell commands the task wants run on the user's behalf.
    pub commands: Vec<String>,
}

/// Job id for this invocation, derived from the process id.
pub fn generate_job_id() -> String {
    format!("agent-{}", std::process::id())
}

/// Probe the API health endpoints to decide whether full mode is available.
///
/// Each probe is bounded at five seconds; any 200 answer wins.
pub async fn detect_full_mode() -> bool {
    let client = match reqwest::Client::builder().timeout(Duration::from_secs(5)).build() {
        Ok(client) => client,
        Err(err) => {
            warn!("could not build health-probe client: {err}");
            return false;
        }
    };

    for endpoint in config::HEALTH_ENDPOINTS.iter().copied() {
        match client.get(endpoint).send().await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                debug!(endpoint, "health probe succeeded");
                return true;
            }
            Ok(response) => debug!(endpoint, status = %response.status(), "health probe refused"),
            Err(err) => debug!(endpoint, "health probe failed: {err}"),
        }
    }

    false
}

/// Run one agent job to completion.
pub async fn run_agent_mode(mut config: AgentConfig, prompt: &str) -> Result<()> {
    let sink = config.sink();

    sink.emit(&AgentResponse::JobStarted {
        job_id: config.job_id.clone(),
        data: config.status(JobState::Started, "Agent job initialized"),
    })?;

    // Auto-detect mode unless the user forced one.
    if !config.full_mode && !config.local_mode {
        if detect_full_mode().await {
            config.full_mode = true;
            sink.emit(&AgentResponse::JobStatus {
                job_id: config.job_id.clone(),
                data: config
                    .status(JobState::Processing, "Full mode detected - connecting to server")
                    .with_progress(10),
            })?;
        } else {
            config.local_mode = true;
            sink.emit(&AgentResponse::JobStatus {
                job_id: config.job_id.clone(),
                data: config
                    .status(JobState::Processing, "Local mode - working standalone")
                    .with_progress(10),
            })?;
        }
    }

    let plan_id = if config.full_mode {
        if config.no_plan { "agent-no-plan" } else { "agent-plan" }
    } else {
        "local-agent"
    };

    sink.emit(&AgentResponse::JobStatus {
        job_id: config.job_id.clone(),
        data: config
            .status(JobState::Processing, format!("Analyzing project context (plan {plan_id})"))
            .with_progress(20),
    })?;

    let outcome = execute_task(&config, &sink, prompt).await?;

    if config.auto_exec && !outcome.commands.is_empty() {
        execute_commands(&config, &sink, &outcome.commands).await?;
    }

    sink.emit(&AgentResponse::JobCompleted {
        job_id: config.job_id.clone(),
        data: {
            let mut status = config
                .status(JobState::Completed, "Agent task completed successfully")
                .with_progress(100);
            status.result = Some("Task execution finished".to_string());
            status
        },
    })?;

    Ok(())
}

/// Execute the agent task through the configured backend.
///
/// The server-backed execution path is not wired up yet; full mode reports
/// its connection and then falls through to the local backend like the
/// standalone path does.
async fn execute_task(config: &AgentConfig, sink: &AgentSink, prompt: &str) -> Result<TaskOutcome> {
    sink.emit(&AgentResponse::JobStatus {
        job_id: config.job_id.clone(),
        data: config.status(JobState::Processing, "Executing agent task").with_progress(30),
    })?;

    let mode_message = if config.full_mode {
        "Executing plan with server"
    } else {
        "Executing locally without server"
    };
    sink.emit(&AgentResponse::JobStatus {
        job_id: config.job_id.clone(),
        data: config.status(JobState::Processing, mode_message).with_progress(50),
    })?;

    local_task(config, sink, prompt).await
}

/// Scripted local backend: writes a demo artifact and narrates the steps.
async fn local_task(config: &AgentConfig, sink: &AgentSink, prompt: &str) -> Result<TaskOutcome> {
    debug!(prompt_len = prompt.len(), "running local task backend");

    let reply = "I'll create a hello world Python file for this task.";
    sink.emit(&AgentResponse::AgentReply {
        job_id: config.job_id.clone(),
        message: reply.to_string(),
        data: AgentReply { job_id: config.job_id.clone(), chunk: reply.to_string() },
    })?;

    let artifact = "hello.py";
    sink.emit(&AgentResponse::BuildInfo {
        job_id: config.job_id.clone(),
        message: format!("Creating {artifact}"),
        data: AgentBuildInfo {
            job_id: config.job_id.clone(),
            path: artifact.to_string(),
            tokens: 25,
            finished: false,
            removed: false,
        },
    })?;

    let contents = "#!/usr/bin/env python3\n\nprint(\"Hello, World!\")\n";
    let path = config.workdir.join(artifact);
    tokio::fs::write(&path, contents)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;

    sink.emit(&AgentResponse::BuildInfo {
        job_id: config.job_id.clone(),
        message: format!("Created {artifact}"),
        data: AgentBuildInfo {
            job_id: config.job_id.clone(),
            path: artifact.to_string(),
            tokens: 25,
            finished: true,
            removed: false,
        },
    })?;

    Ok(TaskOutcome::default())
}

/// Run task-yielded commands under the process-group supervisor.
///
/// Stops at the first command that is interrupted or killed; later commands
/// are not attempted once the user has signalled the session.
pub async fn execute_commands(
    config: &AgentConfig,
    sink: &AgentSink,
    commands: &[String],
) -> Result<()> {
    for command in commands {
        sink.emit(&AgentResponse::JobStatus {
            job_id: config.job_id.clone(),
            data: config.status(JobState::Processing, format!("Running `{command}`")),
        })?;

        let mut cmd = shell_command(command);
        cmd.current_dir(&config.workdir);

        match exec::run_supervised(cmd).await? {
            ExecOutcome::Completed(status) if status.success() => {
                sink.emit(&AgentResponse::JobStatus {
                    job_id: config.job_id.clone(),
                    data: config.status(JobState::Processing, format!("`{command}` succeeded")),
                })?;
            }
            ExecOutcome::Completed(status) => {
                sink.emit(&AgentResponse::JobError {
                    job_id: config.job_id.clone(),
                    error: format!("`{command}` exited with {status}"),
                    data: config.status(JobState::Error, format!("`{command}` failed")),
                })?;
            }
            ExecOutcome::Signaled { .. } | ExecOutcome::Killed => {
                sink.emit(&AgentResponse::JobStatus {
                    job_id: config.job_id.clone(),
                    data: config.status(JobState::Aborted, format!("`{command}` interrupted")),
                })?;
                break;
            }
        }
    }

    Ok(())
}

fn shell_command(command: &str) -> tokio::process::Command {
    #[cfg(unix)]
    {
        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }

    #[cfg(windows)]
    {
        let mut cmd = tokio::process::Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
}
