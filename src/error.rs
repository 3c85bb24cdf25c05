use thiserror::Error;

/// Everything that can go wrong while checking a URL.
///
/// The first two variants are raised before any network access and are pure
/// functions of the input string; retrying them cannot change the outcome.
/// The last two wrap failures talking to the Checkmate service itself.
#[derive(Debug, Error)]
pub enum CheckmateError {
    /// The URL cannot be tokenized into scheme, host and path, or the host
    /// is not a domain name or IP literal at all.
    #[error("invalid URL: {0}")]
    MalformedUrl(String),

    /// The host is loopback, private, reserved or otherwise not a publicly
    /// routable location. Raised before any request is made.
    #[error("The domain '{0}' does not look publicly accessible")]
    NonPublicHost(String),

    /// The Checkmate service could not be reached, timed out, or answered
    /// with a failure status.
    #[error("Unable to complete request with Checkmate")]
    ServiceError(#[source] reqwest::Error),

    /// The service answered with a success status, but the body could not be
    /// read as a block response.
    #[error("Unprocessable JSON response")]
    UnprocessableResponse(#[source] reqwest::Error),
}

impl From<reqwest::Error> for CheckmateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            // The request never left the process; the URL we built from the
            // configured host was not usable.
            CheckmateError::MalformedUrl(err.to_string())
        } else if err.is_decode() {
            CheckmateError::UnprocessableResponse(err)
        } else {
            CheckmateError::ServiceError(err)
        }
    }
}
