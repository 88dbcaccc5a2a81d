/// City Air-Quality Monitoring API Client
///
/// Retrieves monitoring-post data from the municipal air-quality service.
/// The upstream exposes two read-only JSON documents:
///
///   GET /posts/posts.json      -> array of post summaries
///   GET /posts/post-{id}.json  -> array containing exactly one post detail
///
/// The client performs no retries of its own; retry policy belongs to the
/// refresh scheduler, whose fixed interval re-attempts failed cycles.

use std::time::Duration;

use crate::model::{ApiError, PostDetail, PostSummary};

/// Production base URL of the upstream service.
pub const API_BASE_URL: &str = "https://improvement-pl.gov.ua";

/// Request timeout. A stuck upstream must never block the refresh loop
/// past one missed tick, so every request is bounded by this.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// URL construction
// ============================================================================

/// Builds the post-list URL for a given base.
pub fn posts_url(base_url: &str) -> String {
    format!("{}/posts/posts.json", base_url.trim_end_matches('/'))
}

/// Builds the per-post detail URL for a given base and post id.
pub fn post_detail_url(base_url: &str, post_id: i64) -> String {
    format!("{}/posts/post-{}.json", base_url.trim_end_matches('/'), post_id)
}

// ============================================================================
// Response parsing
// ============================================================================

/// Parses the post-list response body (a JSON array of summaries).
pub fn parse_posts(body: &str) -> Result<Vec<PostSummary>, ApiError> {
    serde_json::from_str(body)
        .map_err(|e| ApiError::Unexpected(format!("malformed posts list: {}", e)))
}

/// Parses a post-detail response body.
///
/// The upstream wraps the detail document in a single-element array.
/// An empty array is a real upstream glitch seen in the wild and is
/// reported as `ApiError::Unexpected`, distinct from transport failures,
/// so the scheduler can log it for diagnosis while still retrying.
pub fn parse_post_detail(body: &str, post_id: i64) -> Result<PostDetail, ApiError> {
    let docs: Vec<PostDetail> = serde_json::from_str(body)
        .map_err(|e| ApiError::Unexpected(format!("malformed post detail: {}", e)))?;

    docs.into_iter()
        .next()
        .ok_or_else(|| ApiError::Unexpected(format!("no data returned for post {}", post_id)))
}

// ============================================================================
// HTTP client
// ============================================================================

/// Blocking HTTP client for the upstream API.
///
/// Cheap to clone-by-reference across a station's refresh task; each
/// configured station owns its own `ApiClient`, so concurrently running
/// stations never share session state.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client against the production base URL.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(API_BASE_URL)
    }

    /// Creates a client against an alternate base URL (configuration
    /// override; also used by tests pointed at a local endpoint).
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Unexpected(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the summary list of all monitoring posts.
    pub fn list_posts(&self) -> Result<Vec<PostSummary>, ApiError> {
        let body = self.get_text(&posts_url(&self.base_url))?;
        parse_posts(&body)
    }

    /// Fetches the detail document for one monitoring post.
    pub fn get_post_detail(&self, post_id: i64) -> Result<PostDetail, ApiError> {
        let body = self.get_text(&post_detail_url(&self.base_url, post_id))?;
        parse_post_detail(&body, post_id)
    }

    fn get_text(&self, url: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(classify_transport_error)?;

        let response = response
            .error_for_status()
            .map_err(|e| ApiError::Unexpected(format!("HTTP error status: {}", e)))?;

        response.text().map_err(classify_transport_error)
    }
}

/// Maps a reqwest error into the service taxonomy.
///
/// Timeouts and connect/transport failures are transient `Connection`
/// errors; everything else (builder misuse, redirect policy, decode)
/// is `Unexpected`.
fn classify_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Connection(format!("timeout connecting to API: {}", err))
    } else if err.is_connect() || err.is_request() {
        ApiError::Connection(format!("error connecting to API: {}", err))
    } else {
        ApiError::Unexpected(format!("unexpected error from API: {}", err))
    }
}

// ============================================================================
// Tests
// ============================================================================
