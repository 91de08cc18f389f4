//! Atomic replacement of the running executable's on-disk image.
//!
//! The running process keeps executing its in-memory image and its open
//! file handle stays valid; only the path is repointed. To guarantee that
//! any process launched from the path sees either fully the old or fully
//! the new image, the new bytes are staged to a temp file in the target's
//! own directory (same filesystem) and renamed over the target in one step.
//!
//! Windows refuses to rename over an executable that is currently running,
//! so there the old image is first moved aside to `<target>.old` and the
//! staged file renamed into the now-free path.

use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use super::UpgradeError;

/// Replace the executable at `target` with the bytes of `new_image`.
///
/// The entire stream is staged before anything at `target` changes; a
/// failure mid-stream leaves the old image untouched.
///
/// # Errors
///
/// [`UpgradeError::PermissionDenied`] when the target or its directory is
/// not writable (the CLI layer turns this into an elevation hint); any
/// other I/O failure as [`UpgradeError::Io`].
pub fn apply_binary<R: Read>(mut new_image: R, target: &Path) -> Result<(), UpgradeError> {
    let dir = target.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "executable path has no parent directory")
    })?;

    let mut staged = tempfile::Builder::new()
        .prefix(".plandex-new-")
        .tempfile_in(dir)
        .map_err(|e| classify_io(e, target))?;

    io::copy(&mut new_image, staged.as_file_mut())?;
    staged.as_file_mut().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Carry over the old mode so installs outside the default 0755
        // keep their permissions across upgrades.
        let mode = std::fs::metadata(target).map(|m| m.permissions().mode()).unwrap_or(0o755);
        std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(mode))?;
    }

    #[cfg(windows)]
    {
        // The running image cannot be renamed over; park it next to the
        // target instead. The stale `.old` file is best-effort cleanup.
        let parked = target.with_extension("old");
        let _ = std::fs::remove_file(&parked);
        if target.exists() {
            std::fs::rename(target, &parked).map_err(|e| classify_io(e, target))?;
        }
    }

    staged.persist(target).map_err(|e| classify_io(e.error, target))?;

    debug!(path = %target.display(), "new binary image in place");
    Ok(())
}

fn classify_io(err: io::Error, target: &Path) -> UpgradeError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        UpgradeError::PermissionDenied { path: target.to_path_buf() }
    } else {
        UpgradeError::Io(err)
    }
}
