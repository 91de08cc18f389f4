//! Archive extraction: locate the release binary and hand it to the
//! applier.
//!
//! The tar path never materializes the archive. Entries are pulled one at a
//! time from the decompressing reader; scanning stops at the first regular
//! file whose name equals the platform binary name exactly, and that entry's
//! byte stream is passed straight to [`apply::apply_binary`]. Entries after
//! the match are never read.

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use super::session::ArchiveFormat;
use super::{UpgradeError, apply};

/// Extract the binary entry from a release archive and apply it over
/// `target`.
///
/// The archive `reader` must cover the complete downloaded file, positioned
/// at the start.
///
/// # Errors
///
/// - [`UpgradeError::BinaryNotInArchive`] when the scan completes without a
///   matching entry; silently applying nothing would mask a malformed
///   release.
/// - [`UpgradeError::ZipUnsupported`] for zip archives.
/// - Any applier error once a matching entry is found.
pub fn extract_binary<R: Read>(
    reader: R,
    format: ArchiveFormat,
    binary_name: &str,
    target: &Path,
) -> Result<(), UpgradeError> {
    match format {
        ArchiveFormat::TarGzip => extract_from_tar_gz(reader, binary_name, target),
        ArchiveFormat::Zip => Err(UpgradeError::ZipUnsupported),
    }
}

fn extract_from_tar_gz<R: Read>(
    reader: R,
    binary_name: &str,
    target: &Path,
) -> Result<(), UpgradeError> {
    let decoder = GzDecoder::new(reader);
    let mut archive = Archive::new(decoder);

    for entry in archive.entries()? {
        let entry = entry?;

        if !entry.header().entry_type().is_file() {
            continue;
        }

        let matches = {
            let path = entry.path()?;
            path.as_os_str() == std::ffi::OsStr::new(binary_name)
        };

        if matches {
            debug!(entry = binary_name, "found binary entry, applying");
            // The entry reader yields exactly this entry's bytes; the
            // applier consumes it to EOF before swapping anything on disk.
            apply::apply_binary(entry, target)?;
            return Ok(());
        }
    }

    Err(UpgradeError::BinaryNotInArchive { name: binary_name.to_string() })
}
