//! Self-update subsystem for the Plandex binary.
//!
//! Upgrades replace the running executable's on-disk image with a newer
//! release and restart the process in place. The pipeline is strictly
//! sequential and runs at most once per process lifetime:
//!
//! ```text
//! 1. Resolve      - fetch the latest release descriptor (bounded, 5s),
//!                   strip the `cli/v` tag prefix, compare semver strictly
//! 2. Confirm      - the caller prompts the user before anything is touched
//! 3. Fetch        - stream the platform archive into a session temp file
//! 4. Extract      - scan the archive lazily for the binary entry
//! 5. Apply        - atomically swap the on-disk executable image
//! 6. Restart      - re-exec with the original argv, mirror the exit code
//! ```
//!
//! Failures before the user confirms are never fatal: the check logs and the
//! current binary carries on. Once an apply has begun, failures are fatal
//! because continuing could leave an inconsistent binary on disk.
//!
//! The session temp file is removed on every exit path, success or failure,
//! including unwinds: cleanup rides on [`UpgradeSession`]'s ownership of a
//! [`tempfile::NamedTempFile`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use semver::Version;
use thiserror::Error;
use tracing::{debug, info};

pub mod apply;
pub mod extract;
pub mod fetch;
pub mod release;
pub mod restart;
pub mod session;

#[cfg(test)]
mod tests;

pub use release::{ReleaseDescriptor, ReleaseResolver, UpgradeCheck};
pub use session::{ArchiveFormat, Platform, UpgradeSession};

/// Errors produced by the upgrade pipeline.
///
/// Pre-confirmation callers treat every variant as a logged skip; once the
/// user has confirmed, the variants map onto the fatal-error taxonomy:
/// [`PermissionDenied`](Self::PermissionDenied) carries an elevation hint,
/// everything else is a wrapped fatal error.
#[derive(Error, Debug)]
pub enum UpgradeError {
    /// HTTP request failed (connect, timeout, or body decode).
    #[error("update request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Release tag did not carry the expected `cli/v` prefix.
    #[error("release tag `{tag}` does not follow the `cli/v<version>` convention")]
    TagConvention { tag: String },

    /// A version string on either side of the comparison failed to parse.
    #[error("failed to parse version `{value}`: {source}")]
    Version { value: String, source: semver::Error },

    /// The archive download endpoint answered with a non-success status.
    #[error("release download failed with HTTP {status}")]
    DownloadStatus { status: reqwest::StatusCode },

    /// The archive was scanned to the end without finding the binary entry.
    #[error("executable `{name}` not found in the release archive")]
    BinaryNotInArchive { name: String },

    /// Zip archives (Windows releases) cannot be extracted yet.
    #[error("zip extraction is not implemented for self-upgrade")]
    ZipUnsupported,

    /// The on-disk binary could not be replaced due to permissions.
    #[error("insufficient permissions to replace `{path}`")]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure along the pipeline.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shared HTTP client for all upgrade traffic.
///
/// The version-check request applies its own 5 second bound per request; the
/// archive download deliberately does not (see `fetch`).
pub(crate) fn http_client() -> Result<reqwest::Client, UpgradeError> {
    let client = reqwest::Client::builder()
        .user_agent(format!("plandex/{}", crate::config::current_version()))
        .build()?;
    Ok(client)
}

/// Download, extract, and apply the given release version over the running
/// executable.
///
/// Owns the single [`UpgradeSession`] for this process. On success the
/// on-disk image at the current executable path is the new version; the
/// in-memory image of the running process is untouched. The caller is
/// expected to follow up with [`restart::restart_in_place`].
///
/// # Errors
///
/// Any [`UpgradeError`] from the fetch/extract/apply stages. The session's
/// temp archive is removed regardless of the outcome.
pub async fn perform_upgrade(target: &Version) -> Result<()> {
    let mut session = UpgradeSession::new(target.clone())?;
    info!(
        version = %session.target_version,
        url = %session.download_url,
        "starting self-upgrade"
    );

    let client = http_client()?;
    fetch::download_archive(&client, &mut session).await?;

    let archive = session.reopen()?;
    let current_exe =
        std::env::current_exe().context("failed to determine current executable path")?;

    extract::extract_binary(archive, session.format, crate::config::binary_name(), &current_exe)?;

    debug!(path = %current_exe.display(), "binary image replaced");
    Ok(())
    // session drops here; the temp archive is deleted on all paths
}
