//! Windows implementation of the supervisor's platform capabilities.
//!
//! The child gets its own console process group so Ctrl-C from the parent's
//! console does not reach it directly, but there is no reliable group-kill
//! primitive: forwarding terminates the direct child only, and grandchildren
//! may be orphaned. This is an accepted, documented limitation.

use anyhow::{Context, Result};
use tokio::process::Command;

use super::{SignalEvent, SupervisedChild};

/// `CREATE_NEW_PROCESS_GROUP` from the Win32 process-creation flags.
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

pub(super) fn spawn_supervised(mut cmd: Command) -> Result<SupervisedChild> {
    cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);

    let child = cmd.spawn().context("failed to spawn supervised command")?;
    let pid = child.id().context("supervised child has no pid")?;

    // No distinct group handle to broadcast to; only the direct child can
    // be terminated.
    Ok(SupervisedChild { child, pid, group_id: None })
}

pub(super) async fn forward_signal(
    handle: &mut SupervisedChild,
    _event: SignalEvent,
) -> Result<()> {
    kill_group(handle).await
}

pub(super) async fn kill_group(handle: &mut SupervisedChild) -> Result<()> {
    handle.child.kill().await.context("failed to terminate supervised child")?;
    Ok(())
}
