//! Release-archive download.
//!
//! The download URL is fully deterministic from the target version and host
//! platform; the body is streamed chunk-by-chunk into the session's temp
//! file so large archives never sit in memory.

use std::io::Write;

use futures::StreamExt;
use semver::Version;
use tracing::debug;

use super::session::{ArchiveFormat, Platform, UpgradeSession};
use super::UpgradeError;
use crate::config;

/// Release tag for a CLI version (`cli/v<version>`).
pub fn release_tag(version: &Version) -> String {
    format!("{}{}", config::RELEASE_TAG_PREFIX, version)
}

/// Percent-escape a tag for use as a URL path segment.
///
/// Release tags contain a `/`, which must not read as a path separator in
/// the download URL. Unreserved characters (RFC 3986) pass through.
fn escape_tag(tag: &str) -> String {
    let mut escaped = String::with_capacity(tag.len());
    for byte in tag.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                escaped.push(byte as char);
            }
            _ => escaped.push_str(&format!("%{byte:02X}")),
        }
    }
    escaped
}

/// Deterministic download URL for a release asset:
/// `<base>/<urlencoded tag>/plandex_<version>_<os>_<arch>.<ext>`.
pub fn download_url(version: &Version, platform: &Platform, format: ArchiveFormat) -> String {
    format!(
        "{base}/{tag}/plandex_{version}_{os}_{arch}.{ext}",
        base = config::DOWNLOAD_BASE_URL,
        tag = escape_tag(&release_tag(version)),
        os = platform.os,
        arch = platform.arch,
        ext = format.extension(),
    )
}

/// Stream the release archive into the session's temp file.
///
/// A non-2xx response or any I/O failure aborts the upgrade; the partial
/// file is only ever referenced through the session, whose teardown removes
/// it.
///
/// Unlike the version check, the download carries no request timeout: a
/// large archive on a slow link may legitimately take longer than any fixed
/// bound. The asymmetry is inherited behavior, documented in DESIGN.md.
pub async fn download_archive(
    client: &reqwest::Client,
    session: &mut UpgradeSession,
) -> Result<(), UpgradeError> {
    debug!(url = %session.download_url, "downloading release archive");

    let response = client.get(&session.download_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(UpgradeError::DownloadStatus { status });
    }

    let mut stream = response.bytes_stream();
    let file = session.archive_file();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
    }
    file.flush()?;

    debug!(bytes = downloaded, path = %session.archive_path().display(), "archive saved");
    Ok(())
}
