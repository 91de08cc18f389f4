//! Unix implementation of the supervisor's platform capabilities.
//!
//! Children are moved into a fresh process group (`setpgid(0, 0)`) between
//! fork and exec, so the group id equals the child pid and a
//! `killpg`-style broadcast reaches every descendant that has not detached
//! itself into yet another group.

use anyhow::{Context, Result, bail};
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use std::io;
use tokio::process::Command;

use super::{SignalEvent, SupervisedChild};

impl SignalEvent {
    fn as_unix(self) -> Signal {
        match self {
            Self::Interrupt => Signal::SIGINT,
            Self::Terminate => Signal::SIGTERM,
        }
    }
}

pub(super) fn spawn_supervised(mut cmd: Command) -> Result<SupervisedChild> {
    // Safety: setpgid is async-signal-safe; nothing else runs in the child
    // before exec.
    unsafe {
        cmd.pre_exec(|| {
            nix::unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0))
                .map_err(|errno| io::Error::from_raw_os_error(errno as i32))?;
            Ok(())
        });
    }

    let child = cmd.spawn().context("failed to spawn supervised command")?;
    let pid = child.id().context("supervised child has no pid")?;

    Ok(SupervisedChild { child, pid, group_id: Some(pid as i32) })
}

pub(super) async fn forward_signal(
    handle: &mut SupervisedChild,
    event: SignalEvent,
) -> Result<()> {
    let Some(group) = handle.group_id else {
        bail!("no process group recorded for pid {}", handle.pid);
    };

    // Negative-pid-style broadcast: the whole group, grandchildren included.
    killpg(Pid::from_raw(group), event.as_unix())
        .with_context(|| format!("failed to signal process group {group}"))?;
    Ok(())
}

pub(super) async fn kill_group(handle: &mut SupervisedChild) -> Result<()> {
    let Some(group) = handle.group_id else {
        bail!("no process group recorded for pid {}", handle.pid);
    };

    killpg(Pid::from_raw(group), Signal::SIGKILL)
        .with_context(|| format!("failed to kill process group {group}"))?;
    Ok(())
}
