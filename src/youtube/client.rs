// YouTube Data API v3 client — keyed GET over HTTPS.
//
// A thin reqwest wrapper with a generic GET helper. The interesting part
// is failure classification: the API reports quota exhaustion as a 403
// with a quota reason in the body, which we must separate from a real
// credential rejection so callers can tell "wait" from "give up".

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;

/// Default base URL for the YouTube Data API v3.
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Provider maximum for `maxResults` on the listing endpoints we use.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Keyed HTTP client for YouTube Data API listing endpoints.
pub struct YouTubeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    /// Create a new client pointing at the given base URL.
    ///
    /// Defaults to [`DEFAULT_API_URL`] — pass a different URL for tests
    /// or a proxy.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent("ringside/0.1 (comment-mining)")
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Make a GET request to a listing resource and deserialize the response.
    ///
    /// `resource` is the API resource name (e.g. "search", "videos",
    /// "commentThreads"). `params` are query string key-value pairs; the
    /// API key is appended automatically.
    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, resource);

        debug!(resource = resource, "YouTube API GET");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Map a non-success HTTP status to an [`ApiError`] kind.
///
/// 403 is ambiguous on this API: it covers both bad credentials and an
/// exhausted daily quota. The error body carries a reason string
/// ("quotaExceeded", "rateLimitExceeded", ...) that disambiguates.
fn classify_failure(status: StatusCode, body: &str) -> ApiError {
    let summary = summarize_body(status, body);
    match status.as_u16() {
        401 => ApiError::Auth(summary),
        403 if mentions_quota(body) => ApiError::RateLimit(summary),
        403 => ApiError::Auth(summary),
        429 => ApiError::RateLimit(summary),
        code if code >= 500 => ApiError::Network(summary),
        _ => ApiError::Malformed(summary),
    }
}

fn mentions_quota(body: &str) -> bool {
    body.contains("quotaExceeded")
        || body.contains("rateLimitExceeded")
        || body.contains("userRateLimitExceeded")
}

fn summarize_body(status: StatusCode, body: &str) -> String {
    // Error bodies can be multi-KB JSON documents; one line is enough.
    let line = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut line: String = line.chars().take(200).collect();
    if line.is_empty() {
        line = "<empty body>".to_string();
    }
    format!("HTTP {status}: {line}")
}
