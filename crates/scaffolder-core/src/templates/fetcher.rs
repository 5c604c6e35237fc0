//! Remote template archive fetching
//!
//! Redirects are followed by hand so the chain length is bounded and every hop
//! is logged; the client itself never follows them.

use crate::config::NetworkOptions;
use reqwest::header::LOCATION;
use reqwest::{redirect, Response, StatusCode};
use tracing::debug;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch template archive from {url}: HTTP {status}")]
    Status { url: Url, status: u16 },

    #[error("redirect from {url} (HTTP {status}) has no Location header")]
    MissingLocation { url: Url, status: u16 },

    #[error("redirect from {url} points to an invalid location '{location}'")]
    InvalidLocation {
        url: Url,
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("gave up after {limit} redirects")]
    TooManyRedirects { limit: usize },
}

impl FetchError {
    /// HTTP status that caused the failure, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } | FetchError::MissingLocation { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Client settings shared by the network stages
///
/// Redirect following is disabled; callers handle 3xx responses themselves.
pub fn http_client_builder(user_agent: &str, options: &NetworkOptions) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .connect_timeout(options.connect_timeout)
        .redirect(redirect::Policy::none())
}

/// Build the HTTP client shared by the network stages
pub fn http_client(
    user_agent: &str,
    options: &NetworkOptions,
) -> reqwest::Result<reqwest::Client> {
    http_client_builder(user_agent, options).build()
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Archive fetcher - performs the GET and hands back the unread response
pub struct ArchiveFetcher {
    client: reqwest::Client,
    options: NetworkOptions,
}

impl ArchiveFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(user_agent: &str, options: NetworkOptions) -> reqwest::Result<Self> {
        Ok(Self::with_client(http_client(user_agent, &options)?, options))
    }

    /// Create a fetcher around an existing client
    pub fn with_client(client: reqwest::Client, options: NetworkOptions) -> Self {
        Self { client, options }
    }

    /// GET `url`, following at most `max_redirects` redirects
    ///
    /// On success returns the final URL and the response with its body unread,
    /// so the caller can stream it.
    pub async fn fetch(&self, url: &Url) -> Result<(Url, Response), FetchError> {
        let mut current = url.clone();

        for _ in 0..=self.options.max_redirects {
            let response = self
                .client
                .get(current.clone())
                .timeout(self.options.fetch_timeout)
                .send()
                .await
                .map_err(|source| FetchError::Transport {
                    url: current.clone(),
                    source,
                })?;

            let status = response.status();
            if status.is_success() {
                debug!(url = %current, status = status.as_u16(), "template archive response");
                return Ok((current, response));
            }

            if !is_redirect(status) {
                return Err(FetchError::Status {
                    url: current,
                    status: status.as_u16(),
                });
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| FetchError::MissingLocation {
                    url: current.clone(),
                    status: status.as_u16(),
                })?;

            let next = current
                .join(location)
                .map_err(|source| FetchError::InvalidLocation {
                    url: current.clone(),
                    location: location.to_string(),
                    source,
                })?;

            debug!(from = %current, to = %next, status = status.as_u16(), "following redirect");
            current = next;
        }

        Err(FetchError::TooManyRedirects {
            limit: self.options.max_redirects,
        })
    }
}
