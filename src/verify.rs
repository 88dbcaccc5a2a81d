/// Setup-time connectivity validation.
///
/// Before a station is configured, the external setup wizard runs a live
/// check against the upstream API to confirm it is reachable and has
/// monitoring posts to offer. The two failure kinds map onto the two
/// user-facing messages the wizard shows: "cannot connect" for transport
/// problems and "unknown error" for everything else.

use crate::ingest::city_api::ApiClient;
use crate::model::{ApiError, PostSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum SetupError {
    /// Transport failure or timeout reaching the API.
    CannotConnect(String),
    /// Unexpected API behavior, including an empty post list.
    Unknown(String),
}

impl SetupError {
    /// The message shown to the user by the setup wizard.
    pub fn user_message(&self) -> &'static str {
        match self {
            SetupError::CannotConnect(_) => "cannot connect",
            SetupError::Unknown(_) => "unknown error",
        }
    }
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::CannotConnect(msg) => write!(f, "cannot connect: {}", msg),
            SetupError::Unknown(msg) => write!(f, "unknown error: {}", msg),
        }
    }
}

impl std::error::Error for SetupError {}

impl From<ApiError> for SetupError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Connection(msg) => SetupError::CannotConnect(msg),
            ApiError::Unexpected(msg) => SetupError::Unknown(msg),
        }
    }
}

/// Fetches the post list as a connectivity check and returns it so the
/// wizard can offer the stations for selection. An upstream with zero
/// posts is unusable and reported as `Unknown`.
pub fn validate_connectivity(client: &ApiClient) -> Result<Vec<PostSummary>, SetupError> {
    let posts = client.list_posts()?;
    if posts.is_empty() {
        return Err(SetupError::Unknown(
            "no monitoring posts available".to_string(),
        ));
    }
    Ok(posts)
}
