// API error taxonomy.
//
// The collector never retries; these kinds exist so a caller-supplied
// policy can tell a dead API key from a drained quota from a flaky
// connection, and react differently to each.

use thiserror::Error;

/// A failed request against the YouTube Data API, classified by cause.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credentials rejected (HTTP 401, or 403 without a quota reason).
    /// Fatal — retrying with the same key cannot succeed.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Quota or rate ceiling hit (HTTP 429, or 403 citing quota).
    #[error("rate limit or quota exhausted: {0}")]
    RateLimit(String),

    /// Transport-level failure or a 5xx from the API.
    #[error("network failure: {0}")]
    Network(String),

    /// The API answered but the payload was not what we asked for
    /// (other 4xx, or a body that fails to deserialize).
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// True for errors where no caller policy should bother retrying.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Malformed(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
