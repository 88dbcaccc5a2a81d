/// Core data types for the city air-quality monitoring service.
///
/// This module defines the shared domain model imported by all other
/// modules: the monitoring-post types as returned by the upstream JSON
/// API, the closed set of measurement channels, and the error taxonomy.
/// It contains no I/O — only types and their serde mappings.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Monitoring post types
// ---------------------------------------------------------------------------

/// One entry of the upstream post-list endpoint (`/posts/posts.json`).
///
/// An immutable per-fetch snapshot of a physical monitoring station.
/// Identity is `id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostSummary {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

/// Full per-post document from `/posts/post-{id}.json`.
///
/// One instance per refresh cycle; a new fetch replaces the previous
/// instance wholesale, there is no merging. `value`/`index` and the
/// quality texts form the upstream-computed AQI pseudo-channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostDetail {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: String,
    /// Air Quality Index value, computed upstream.
    pub value: f64,
    /// AQI category index (1 = best).
    pub index: i64,
    #[serde(rename = "qualityDesc", default)]
    pub quality_desc: String,
    #[serde(rename = "qualityRecommendation", default)]
    pub quality_recommendation: String,
    /// Upstream timestamp string; kept opaque, never parsed locally.
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
}

/// A single measured parameter inside a post detail document.
///
/// `name` is the raw upstream label — Ukrainian text that may contain
/// HTML tags and entities (e.g. `"ТЧ2,5,&nbsp;мкг/м<sup>3</sup>"`).
/// The parameter carries no channel tag of its own; classification is
/// recomputed from `name` on each read (see `channels::classify`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "currentValue")]
    pub current_value: f64,
    #[serde(rename = "avgDailyValue")]
    pub avg_daily_value: f64,
    #[serde(rename = "qualityIndex")]
    pub quality_index: i64,
}

// ---------------------------------------------------------------------------
// Measurement channels
// ---------------------------------------------------------------------------

/// The closed set of measurement channels this service recognizes.
///
/// Particulate matter at three size cuts, four gases, and five
/// meteorological channels. The AQI is a pseudo-channel carried on
/// `PostDetail` directly and is deliberately not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Pm25,
    Pm10,
    Pm1,
    Ozone,
    No2,
    So2,
    Co,
    Temperature,
    Humidity,
    Pressure,
    WindSpeed,
    WindDirection,
}

impl Channel {
    /// All twelve channels, in display order.
    pub const ALL: [Channel; 12] = [
        Channel::Pm25,
        Channel::Pm10,
        Channel::Pm1,
        Channel::Ozone,
        Channel::No2,
        Channel::So2,
        Channel::Co,
        Channel::Temperature,
        Channel::Humidity,
        Channel::Pressure,
        Channel::WindSpeed,
        Channel::WindDirection,
    ];
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or decoding upstream data.
///
/// The split matters to callers: `Connection` failures are transient and
/// retried implicitly by the next scheduled refresh cycle, while
/// `Unexpected` failures indicate a response-shape problem that is logged
/// distinctly for diagnosis. Neither is fatal to the running service.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport-level failure or request timeout.
    Connection(String),
    /// Any other unexpected failure: HTTP error status, malformed JSON,
    /// or a detail response with zero elements for a known post id.
    Unexpected(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Connection(msg) => write!(f, "Connection error: {}", msg),
            ApiError::Unexpected(msg) => write!(f, "API error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
