/// Service configuration.
///
/// Loaded from a TOML file (path via the `AIRMON_CONFIG` env var, which
/// `.env` can supply). The station section carries either a fixed post id
/// or a coordinate pair — the two are mutually exclusive, and presence of
/// coordinates means "resolve the nearest post every refresh cycle"
/// rather than "use a fixed id".
///
/// ```toml
/// [service]
/// scan_interval_secs = 600
/// log_level = "info"
///
/// [station]
/// name = "Home"
/// latitude = 49.5894
/// longitude = 34.5514
/// ```

use serde::Deserialize;

use crate::ingest::city_api::API_BASE_URL;

/// Default refresh interval: 10 minutes.
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 600;

// ---------------------------------------------------------------------------
// Config file shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub service: ServiceSection,
    pub station: StationSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSection {
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval(),
            base_url: default_base_url(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

fn default_scan_interval() -> u64 {
    DEFAULT_SCAN_INTERVAL_SECS
}

fn default_base_url() -> String {
    API_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationSection {
    pub name: Option<String>,
    pub post_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// ---------------------------------------------------------------------------
// Station selection
// ---------------------------------------------------------------------------

/// How the refresh scheduler picks its monitoring post each cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum StationSelect {
    /// Use this post id directly; no list fetch needed.
    Fixed(i64),
    /// Fetch the post list and resolve the nearest post every cycle.
    Nearest { latitude: f64, longitude: f64 },
}

impl StationSection {
    /// Validates the section into a selection mode.
    pub fn select(&self) -> Result<StationSelect, ConfigError> {
        match (self.post_id, self.latitude, self.longitude) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ConfigError::Invalid(
                "station must set either post_id or latitude/longitude, not both".to_string(),
            )),
            (Some(id), None, None) => Ok(StationSelect::Fixed(id)),
            (None, Some(latitude), Some(longitude)) => {
                if !(-90.0..=90.0).contains(&latitude) {
                    return Err(ConfigError::Invalid(format!(
                        "latitude {} out of range [-90, 90]",
                        latitude
                    )));
                }
                if !(-180.0..=180.0).contains(&longitude) {
                    return Err(ConfigError::Invalid(format!(
                        "longitude {} out of range [-180, 180]",
                        longitude
                    )));
                }
                Ok(StationSelect::Nearest { latitude, longitude })
            }
            (None, Some(_), None) | (None, None, Some(_)) => Err(ConfigError::Invalid(
                "latitude and longitude must be set together".to_string(),
            )),
            (None, None, None) => Err(ConfigError::Invalid(
                "station must set post_id or latitude/longitude".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "cannot read config: {}", msg),
            ConfigError::Parse(msg) => write!(f, "cannot parse config: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServiceConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        // Surface selection problems at load time rather than on the
        // first refresh cycle.
        config.station.select()?;
        Ok(config)
    }

    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path, e)))?;
        Self::from_toml_str(&text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
