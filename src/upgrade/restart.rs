//! Process restart after a successful binary swap.
//!
//! The freshly written image is launched with the exact argument vector the
//! current process was invoked with (minus the program name) and the
//! parent's standard streams. The wrapper then waits and exits with the
//! child's exact status, so callers and shells observe the new binary as if
//! it had been the one invoked. There is no fallback: if the new image
//! cannot be spawned, the wrapper dies loudly rather than continuing on
//! stale code.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::info;

use super::UpgradeError;

/// Re-exec the (now updated) current executable and exit with its status.
///
/// Returns only on spawn failure; on success this function never returns
/// because the process terminates with the child's exit code.
pub async fn restart_in_place() -> Result<()> {
    let exe = std::env::current_exe().context("failed to determine executable path")?;
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    info!(exe = %exe.display(), "restarting with new binary");
    let code = relaunch(&exe, &args).await.context("failed to restart after upgrade")?;
    std::process::exit(code);
}

/// Spawn `exe` with `args`, wiring the current process's standard streams
/// through, wait for completion, and report the exit code to mirror.
pub(crate) async fn relaunch(exe: &Path, args: &[OsString]) -> Result<i32, UpgradeError> {
    let status = Command::new(exe)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await?;

    Ok(mirrored_exit_code(status))
}

/// Exit code the wrapper should terminate with for a child status.
///
/// Unix children killed by a signal have no code; the conventional
/// `128 + signal` shell encoding is reported instead.
fn mirrored_exit_code(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
