//! URL canonicalization and public-host validation.

use std::fmt;

use tracing::{debug, warn};

use crate::error::CheckmateError;

mod canonicalize;
mod domain;

#[cfg(test)]
mod tests;

pub use canonicalize::{canonical_join, canonical_split, UrlParts, MAX_URL_LENGTH};
pub use domain::Domain;

/// A URL in canonical form whose host passed the public check.
///
/// Only [`clean_url`] produces one, so holding a `CanonicalUrl` is proof the
/// whole pipeline ran: the string is normalized and its host is not a
/// loopback, private, reserved or special-use location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// The canonical URL string, ready to go on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and hands back the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Runs the pre-flight pipeline over an untrusted URL string.
///
/// This function performs the following steps:
/// 1. Splits the input into normalized parts (truncating it first)
/// 2. Classifies the resulting host, never the raw input
/// 3. Rejects with `NonPublicHost` before any canonical string exists
/// 4. Joins the parts into the canonical form
///
/// # Arguments
/// * `raw` - The URL to canonicalize and validate
///
/// # Returns
/// * `Result<CanonicalUrl>` - The canonical URL, or `MalformedUrl` /
///   `NonPublicHost` when the input cannot be made safe
pub fn clean_url(raw: &str) -> Result<CanonicalUrl, CheckmateError> {
    let parts = canonical_split(raw, MAX_URL_LENGTH)?;

    let domain = Domain::classify(&parts.host)?;
    if !domain.is_public() {
        warn!("Rejecting URL with non-public host {}", domain);
        return Err(CheckmateError::NonPublicHost(domain.to_string()));
    }

    let canonical = canonical_join(&parts);
    debug!("Canonicalized URL to {}", canonical);
    Ok(CanonicalUrl(canonical))
}
