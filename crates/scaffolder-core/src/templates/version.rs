//! Latest companion tool version lookup

use crate::config::NetworkOptions;
use reqwest::StatusCode;
use semver::Version;
use serde::Deserialize;
use tracing::debug;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("release metadata request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("release metadata request returned HTTP {status}")]
    Status { status: u16 },

    #[error("release metadata is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("release tag '{tag}' is not a semantic version: {source}")]
    InvalidTag {
        tag: String,
        #[source]
        source: semver::Error,
    },
}

/// The part of the release metadata we care about
#[derive(Debug, Deserialize)]
struct ReleaseMetadata {
    tag_name: String,
}

/// Resolves the latest published release of the companion build tool
pub struct VersionResolver {
    client: reqwest::Client,
    releases_url: Url,
    options: NetworkOptions,
}

impl VersionResolver {
    pub fn new(client: reqwest::Client, releases_url: Url, options: NetworkOptions) -> Self {
        Self {
            client,
            releases_url,
            options,
        }
    }

    /// Fetch the latest release tag and return it as a caret range (`^1.2.3`)
    pub async fn resolve_latest_version(&self) -> Result<String, VersionError> {
        let response = self
            .client
            .get(self.releases_url.clone())
            .timeout(self.options.version_timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(VersionError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let metadata: ReleaseMetadata = serde_json::from_str(&body)?;
        let version = parse_version(&metadata.tag_name)?;

        debug!(tag = %metadata.tag_name, %version, "resolved latest release");
        Ok(caret_range(&version))
    }
}

/// Parse version string, handling various formats
pub fn parse_version(version_str: &str) -> Result<Version, VersionError> {
    // Remove leading 'v' if present
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).map_err(|source| VersionError::InvalidTag {
        tag: version_str.to_string(),
        source,
    })
}

/// Caret range admitting compatible updates of `version`
pub fn caret_range(version: &Version) -> String {
    format!("^{}", version)
}
