use std::time::Duration;

use tracing::{debug, error, instrument, trace};

use crate::error::CheckmateError;
use crate::response::BlockResponse;
use crate::url::clean_url;

// Checkmate answers fast or not at all; a hung check must not stall the
// caller's own request handling.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// A client for the Checkmate URL testing service.
///
/// Holds the service location, the optional API key and a pooled HTTP
/// client. Build one per process and share it; cloning is cheap.
#[derive(Debug, Clone)]
pub struct CheckmateClient {
    host: String,            // Service base URL, trailing slashes trimmed
    api_key: Option<String>, // Basic auth username when present
    http: reqwest::Client,
}

impl CheckmateClient {
    /// Creates a client for the Checkmate service at `host`.
    ///
    /// # Arguments
    /// * `host` - Base URL of the service, including the scheme
    /// * `api_key` - API key for the service; `None` or empty disables auth
    pub fn new(host: &str, api_key: Option<&str>) -> Result<Self, CheckmateError> {
        Self::with_timeout(host, api_key, DEFAULT_TIMEOUT)
    }

    /// Same as [`CheckmateClient::new`], with an explicit request timeout.
    pub fn with_timeout(
        host: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, CheckmateError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CheckmateError::ServiceError)?;

        Ok(CheckmateClient {
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.is_empty()).map(String::from),
            http,
        })
    }

    /// Checks a URL for reasons to block it.
    ///
    /// The URL is canonicalized and its host validated first, so a malformed
    /// or non-public URL fails fast without anything touching the network.
    /// Only the canonical form is ever sent to the service.
    ///
    /// # Arguments
    /// * `url` - URL to check
    /// * `allow_all` - If true, bypass Checkmate's allow-list
    /// * `blocked_for` - Context for the blocked-page layout and content
    /// * `ignore_reasons` - Comma-separated reason codes to ignore
    ///
    /// # Returns
    /// * `Result<Option<BlockResponse>>` - `None` when the URL is fine, or
    ///   the reasons to block it
    #[instrument(level = "debug", skip_all, fields(url = %url))]
    pub async fn check_url(
        &self,
        url: &str,
        allow_all: bool,
        blocked_for: Option<&str>,
        ignore_reasons: Option<&str>,
    ) -> Result<Option<BlockResponse>, CheckmateError> {
        let canonical = clean_url(url)?;
        trace!("Checking canonical URL {}", canonical);

        let mut request = self
            .http
            .get(format!("{}/api/check", self.host))
            .query(&[("url", canonical.as_str())]);

        if allow_all {
            request = request.query(&[("allow_all", "true")]);
        }
        if let Some(blocked_for) = blocked_for {
            request = request.query(&[("blocked_for", blocked_for)]);
        }
        if let Some(ignore_reasons) = ignore_reasons {
            request = request.query(&[("ignore_reasons", ignore_reasons)]);
        }
        if let Some(api_key) = &self.api_key {
            request = request.basic_auth(api_key, Some(""));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                error!("Request to Checkmate failed: {}", err);
                return Err(err.into());
            }
        };
        let response = response.error_for_status()?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            debug!("Checkmate found no reason to block");
            return Ok(None);
        }

        let blocked = response.json::<BlockResponse>().await?;
        debug!("Checkmate blocked the URL: {:?}", blocked.reason_codes());
        Ok(Some(blocked))
    }
}
