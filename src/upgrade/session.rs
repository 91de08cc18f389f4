//! Upgrade session state and temp-archive lifecycle.
//!
//! An [`UpgradeSession`] is created at the start of an upgrade attempt and
//! owns everything the attempt touches on disk. At most one session exists
//! per process lifetime (the pipeline is invoked once, before command
//! dispatch). Dropping the session removes the temp archive, so cleanup
//! holds on success, error, and panic unwinds alike.

use std::fs::File;
use std::io;
use std::path::Path;

use semver::Version;
use tempfile::NamedTempFile;

use super::{UpgradeError, fetch};

/// Operating system and CPU architecture of the running binary, as encoded
/// in release asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// `std::env::consts::OS` style name (`linux`, `macos`, `windows`).
    pub os: &'static str,
    /// `std::env::consts::ARCH` style name (`x86_64`, `aarch64`).
    pub arch: &'static str,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn host() -> Self {
        Self { os: std::env::consts::OS, arch: std::env::consts::ARCH }
    }
}

/// Container format of a release archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// `.tar.gz`, used everywhere except Windows.
    TarGzip,
    /// `.zip`, used by the Windows platform family.
    Zip,
}

impl ArchiveFormat {
    /// Format used by releases for the given platform.
    pub fn for_platform(platform: &Platform) -> Self {
        if platform.os == "windows" { Self::Zip } else { Self::TarGzip }
    }

    /// File extension as it appears in asset names (without leading dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::TarGzip => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

/// All state owned by a single upgrade attempt.
///
/// The temp archive lives in the system temp directory with the extension
/// matching the platform's archive format, mirroring the name the asset has
/// upstream. The file is removed when the session drops.
pub struct UpgradeSession {
    /// Version being installed.
    pub target_version: Version,
    /// Platform the archive is fetched for.
    pub platform: Platform,
    /// Container format selected from the platform.
    pub format: ArchiveFormat,
    /// Fully templated download URL for the release asset.
    pub download_url: String,
    archive: NamedTempFile,
}

impl UpgradeSession {
    /// Open a session for the given target version on the host platform.
    pub fn new(target_version: Version) -> Result<Self, UpgradeError> {
        let platform = Platform::host();
        let format = ArchiveFormat::for_platform(&platform);
        let download_url = fetch::download_url(&target_version, &platform, format);

        let archive = tempfile::Builder::new()
            .prefix("plandex-upgrade-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile()?;

        Ok(Self { target_version, platform, format, download_url, archive })
    }

    /// Path of the temp archive on disk.
    pub fn archive_path(&self) -> &Path {
        self.archive.path()
    }

    /// Writable handle used by the fetcher while streaming the download.
    pub(crate) fn archive_file(&mut self) -> &mut File {
        self.archive.as_file_mut()
    }

    /// Fresh read handle over the fully downloaded archive, positioned at
    /// the start.
    pub fn reopen(&self) -> io::Result<File> {
        self.archive.reopen()
    }
}
