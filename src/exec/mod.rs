//! Supervised execution of child commands.
//!
//! When the CLI shells out on the user's behalf, the child must not be left
//! orphaned (nor leave its own descendants orphaned) if the user interrupts
//! the parent. The supervisor owns that lifecycle:
//!
//! - the child is spawned into its own process group (where the platform
//!   supports one), so terminal-originated signals aimed at the foreground
//!   group do not reach it directly;
//! - while the child runs, the parent's default interrupt reaction is
//!   suppressed; a concurrent listener receives `SIGINT`/`SIGTERM` and
//!   forwards the matching signal to the *entire* group, reaching
//!   grandchildren too;
//! - signal forwarding always happens before the parent itself terminates.
//!
//! The state machine is `Running → {Completed, Signaled, Killed}`:
//! `Completed` for a normal exit, `Signaled` when a forwarded signal ended
//! the group, and `Killed` on platforms without group-kill semantics where
//! only the direct child could be terminated (a documented limitation, not
//! a bug).
//!
//! Platform differences live entirely in the `platform` module selected at
//! compile time; callers never branch on the operating system.

use anyhow::Result;
use std::process::ExitStatus;
use tokio::process::{Child, Command};
use tracing::debug;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix as platform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use windows as platform;


/// The signals the supervisor reacts to, abstracted from their OS-level
/// encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    /// Ctrl-C / `SIGINT`.
    Interrupt,
    /// Termination request / `SIGTERM`.
    Terminate,
}

/// Handle to a spawned child command.
///
/// Created by [`spawn_supervised`]; destroyed once the child has been waited
/// on to completion or forcibly terminated. `group_id` is populated only on
/// platforms where the process group is distinct from the pid-only handle.
pub struct SupervisedChild {
    pub(crate) child: Child,
    /// Process id of the direct child.
    pub pid: u32,
    /// Process group id, when the platform supports group semantics.
    pub group_id: Option<i32>,
}

/// Terminal state of a supervised command.
#[derive(Debug)]
pub enum ExecOutcome {
    /// The child exited on its own.
    Completed(ExitStatus),
    /// A signal was forwarded to the child's group and the child exited.
    Signaled {
        /// The event that was forwarded.
        signal: SignalEvent,
        /// The child's resulting exit status (platform-conventional).
        status: ExitStatus,
    },
    /// Group propagation was unavailable; only the direct child was
    /// terminated. Grandchildren may survive.
    Killed,
}

impl ExecOutcome {
    /// Whether the command ran to completion successfully.
    pub fn success(&self) -> bool {
        matches!(self, Self::Completed(status) if status.success())
    }
}

/// Spawn `cmd` in its own process group under supervision.
///
/// The supervisor only ever forwards signals to groups it created here,
/// never to a group it merely observed.
pub fn spawn_supervised(cmd: Command) -> Result<SupervisedChild> {
    let handle = platform::spawn_supervised(cmd)?;
    debug!(pid = handle.pid, group = ?handle.group_id, "spawned supervised child");
    Ok(handle)
}

/// Forward a signal to the child's whole process group (or, on platforms
/// without group-kill semantics, to the direct child only).
pub async fn forward_signal(handle: &mut SupervisedChild, event: SignalEvent) -> Result<()> {
    platform::forward_signal(handle, event).await
}

/// Forcibly terminate the child's group (direct child only where groups are
/// unsupported).
pub async fn kill_group(handle: &mut SupervisedChild) -> Result<()> {
    platform::kill_group(handle).await
}

/// Run `cmd` under full supervision: spawn it in its own group, race child
/// completion against incoming interrupt/terminate signals, and forward the
/// first signal received to the whole group.
///
/// Returns once the child has been reaped. Signal forwarding is guaranteed
/// to happen before this function returns, hence before the parent can
/// terminate along the supervised-command path.
pub async fn run_supervised(cmd: Command) -> Result<ExecOutcome> {
    let mut handle = spawn_supervised(cmd)?;
    supervise(&mut handle).await
}

#[cfg(unix)]
async fn supervise(handle: &mut SupervisedChild) -> Result<ExecOutcome> {
    use tokio::signal::unix::{SignalKind, signal};

    // Installing these listeners replaces the parent's default
    // die-on-interrupt disposition for the duration of the child's run.
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut forwarded: Option<SignalEvent> = None;

    loop {
        tokio::select! {
            status = handle.child.wait() => {
                let status = status?;
                return Ok(match forwarded {
                    Some(signal) => {
                        debug!(pid = handle.pid, ?signal, "supervised child ended after signal");
                        ExecOutcome::Signaled { signal, status }
                    }
                    None => ExecOutcome::Completed(status),
                });
            }
            _ = interrupt.recv(), if forwarded.is_none() => {
                forward_signal(handle, SignalEvent::Interrupt).await?;
                forwarded = Some(SignalEvent::Interrupt);
            }
            _ = terminate.recv(), if forwarded.is_none() => {
                forward_signal(handle, SignalEvent::Terminate).await?;
                forwarded = Some(SignalEvent::Terminate);
            }
        }
    }
}

#[cfg(windows)]
async fn supervise(handle: &mut SupervisedChild) -> Result<ExecOutcome> {
    tokio::select! {
        status = handle.child.wait() => Ok(ExecOutcome::Completed(status?)),
        _ = tokio::signal::ctrl_c() => {
            // No group-kill primitive here: terminate the direct child and
            // accept that grandchildren may be orphaned.
            kill_group(handle).await?;
            let _ = handle.child.wait().await;
            Ok(ExecOutcome::Killed)
        }
    }
}
