//! Build-time and environment configuration for the Plandex CLI.
//!
//! The upgrade subsystem never reads ambient globals directly: the running
//! version is injected here at build time from the crate manifest, and every
//! remote endpoint the binary talks to is a named constant in this module.
//! Tests override the injected values through the builder surfaces on
//! [`ReleaseResolver`](crate::upgrade::ReleaseResolver) rather than mutating
//! process state.

use std::env;

/// GitHub repository that publishes CLI releases, in `owner/name` form.
pub const RELEASE_REPO: &str = "datagram1/plandex";

/// Release-metadata endpoint returning the latest published release as JSON.
pub const LATEST_RELEASE_URL: &str =
    "https://api.github.com/repos/datagram1/plandex/releases/latest";

/// Base URL for release asset downloads. The full asset URL is
/// `{DOWNLOAD_BASE_URL}/<urlencoded tag>/plandex_<version>_<os>_<arch>.<ext>`.
pub const DOWNLOAD_BASE_URL: &str = "https://github.com/datagram1/plandex/releases/download";

/// Release tags follow the `cli/v<semver>` convention; this prefix is
/// stripped before parsing the remainder as a semantic version.
pub const RELEASE_TAG_PREFIX: &str = "cli/v";

/// Environment variable that disables the automatic upgrade check entirely
/// when set to any non-empty value.
pub const SKIP_UPGRADE_VAR: &str = "PLANDEX_SKIP_UPGRADE";

/// Version string used by local development builds; such builds never
/// self-update.
pub const DEVELOPMENT_VERSION: &str = "development";

/// Health endpoints probed (in order) to decide whether full mode, backed by
/// a reachable API server, is available to agent mode.
pub const HEALTH_ENDPOINTS: &[&str] =
    &["http://localhost:8099/health", "https://api-v2.plandex.ai/health"];

/// The version of the currently running binary, injected at build time.
pub fn current_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Name of the release binary for the current platform.
pub fn binary_name() -> &'static str {
    if cfg!(windows) { "plandex.exe" } else { "plandex" }
}

/// Whether the user has opted out of upgrade checks via
/// [`SKIP_UPGRADE_VAR`].
pub fn upgrade_checks_disabled() -> bool {
    env::var_os(SKIP_UPGRADE_VAR).is_some_and(|value| !value.is_empty())
}
