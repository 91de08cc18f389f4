//! Version resolution against the release-metadata endpoint.
//!
//! The resolver answers one question: is there a published release strictly
//! newer than the running binary? Everything that can go wrong (network
//! failure, malformed JSON, a tag that does not follow the `cli/v`
//! convention, an unparsable version on either side) invalidates the whole
//! check; callers on the automatic path log and move on.

use std::time::Duration;

use semver::Version;
use serde::Deserialize;
use tracing::debug;

use super::UpgradeError;
use crate::config;

/// Upper bound on the release-metadata request. Keeps a dead network from
/// hanging every CLI invocation.
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Metadata describing the latest published release.
#[derive(Debug, Clone)]
pub struct ReleaseDescriptor {
    /// Raw tag as published (e.g. `cli/v2.1.0`).
    pub tag_name: String,
    /// Semantic version parsed from the tag remainder.
    pub version: Version,
}

impl ReleaseDescriptor {
    /// Derive a descriptor from a raw release tag.
    ///
    /// The literal [`config::RELEASE_TAG_PREFIX`] is stripped and the
    /// remainder parsed as a semantic version. Tags not matching the
    /// convention are a resolver error, not a panic.
    pub fn from_tag(tag: &str) -> Result<Self, UpgradeError> {
        let remainder = tag
            .strip_prefix(config::RELEASE_TAG_PREFIX)
            .ok_or_else(|| UpgradeError::TagConvention { tag: tag.to_string() })?
            .trim();

        let version = Version::parse(remainder).map_err(|source| UpgradeError::Version {
            value: remainder.to_string(),
            source,
        })?;

        Ok(Self { tag_name: tag.to_string(), version })
    }
}

/// Outcome of an upgrade check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeCheck {
    /// A strictly newer release exists.
    UpgradeAvailable(Version),
    /// The remote version is equal to or older than the running one.
    NoUpgrade,
}

impl UpgradeCheck {
    /// Strict comparison: only a remote version greater than the current
    /// one signals an upgrade. Equal versions never trigger.
    pub fn from_versions(current: &Version, latest: &Version) -> Self {
        if latest > current {
            Self::UpgradeAvailable(latest.clone())
        } else {
            Self::NoUpgrade
        }
    }
}

/// JSON body of the release-metadata endpoint; only `tag_name` matters.
#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// Compares the running binary's version against the latest published
/// release.
///
/// The current version is injected at construction (build-time value by
/// default) rather than read from ambient state, so tests can exercise the
/// comparison directly.
pub struct ReleaseResolver {
    endpoint: String,
    current_version: String,
}

impl Default for ReleaseResolver {
    fn default() -> Self {
        Self {
            endpoint: config::LATEST_RELEASE_URL.to_string(),
            current_version: config::current_version().to_string(),
        }
    }
}

impl ReleaseResolver {
    /// Resolver for the official release endpoint and the build-time
    /// version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the running version (tests, forced re-checks).
    #[must_use]
    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    /// Override the metadata endpoint (tests).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The version string this resolver compares against.
    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Fetch the latest release descriptor and compare it to the running
    /// version.
    ///
    /// Strict semantic-version greater-than: an equal or older remote
    /// version yields [`UpgradeCheck::NoUpgrade`].
    ///
    /// # Errors
    ///
    /// Request construction/transport failures, a non-decodable body, a tag
    /// without the `cli/v` prefix, or an unparsable version on either side.
    pub async fn check(&self, client: &reqwest::Client) -> Result<UpgradeCheck, UpgradeError> {
        let current =
            Version::parse(&self.current_version).map_err(|source| UpgradeError::Version {
                value: self.current_version.clone(),
                source,
            })?;

        debug!(endpoint = %self.endpoint, "checking for a newer release");

        let release: LatestRelease = client
            .get(&self.endpoint)
            .header("Accept", "application/vnd.github.v3+json")
            .timeout(CHECK_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        let descriptor = ReleaseDescriptor::from_tag(&release.tag_name)?;
        debug!(tag = %descriptor.tag_name, version = %descriptor.version, "latest release");

        Ok(UpgradeCheck::from_versions(&current, &descriptor.version))
    }
}
