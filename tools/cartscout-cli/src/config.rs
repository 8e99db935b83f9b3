//! CLI configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cartscout_commerce::catalog::CatalogData;
use cartscout_commerce::split::SplitStrategy;
use cartscout_commerce::stores::{FallbackChain, GeoPoint};
use cartscout_data::{
    FetchPolicy, RetryPolicy, TimeoutConfig, DEFAULT_OSRM_ENDPOINT, DEFAULT_OVERPASS_ENDPOINT,
};
use cartscout_observability::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};

/// File names searched for, in order, when no `--config` is given.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["cartscout.toml", ".cartscout.toml", "cartscout.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartscoutConfig {
    /// Where the user is.
    #[serde(default)]
    pub origin: OriginConfig,

    /// Supermarket search.
    #[serde(default)]
    pub locator: LocatorConfig,

    /// Driving routes.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Ranking and split advice.
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Products and prices.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CartscoutConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// The configured origin as a point.
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.origin.lat, self.origin.lng)
    }

    /// Chain policy for stores whose name matches no chain.
    pub fn fallback_chain(&self) -> FallbackChain {
        FallbackChain::parse(&self.ranking.fallback_chain)
    }

    /// Load the catalog file, or the built-in data when none is configured.
    ///
    /// Relative paths resolve against `base`, the directory of the config file.
    pub fn load_catalog(&self, base: &Path) -> Result<CatalogData> {
        let Some(file) = &self.catalog.file else {
            return Ok(CatalogData::builtin());
        };

        let path = base.join(file);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

        if file.ends_with(".json") {
            CatalogData::from_json(&content)
                .with_context(|| format!("Failed to parse JSON catalog: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML catalog: {}", path.display()))
        }
    }
}

/// User location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginConfig {
    /// Latitude in degrees.
    #[serde(default = "default_lat")]
    pub lat: f64,
    /// Longitude in degrees.
    #[serde(default = "default_lng")]
    pub lng: f64,
}

// Varna city centre.
fn default_lat() -> f64 {
    43.2141
}

fn default_lng() -> f64 {
    27.9147
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            lat: default_lat(),
            lng: default_lng(),
        }
    }
}

/// Supermarket search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Overpass interpreter URL.
    #[serde(default = "default_locator_endpoint")]
    pub endpoint: String,

    /// Search radius in metres.
    #[serde(default = "default_radius_m")]
    pub radius_m: u32,

    /// Request timeout in milliseconds.
    #[serde(default = "default_locator_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after a transient failure.
    #[serde(default = "default_locator_retries")]
    pub max_retries: u32,
}

fn default_locator_endpoint() -> String {
    DEFAULT_OVERPASS_ENDPOINT.to_string()
}

fn default_radius_m() -> u32 {
    5000
}

fn default_locator_timeout_ms() -> u64 {
    30_000
}

fn default_locator_retries() -> u32 {
    1
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_locator_endpoint(),
            radius_m: default_radius_m(),
            timeout_ms: default_locator_timeout_ms(),
            max_retries: default_locator_retries(),
        }
    }
}

impl LocatorConfig {
    /// Fetch policy for locator requests.
    pub fn policy(&self) -> FetchPolicy {
        fetch_policy(self.timeout_ms, self.max_retries)
    }
}

/// Route planner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Whether to request driving routes at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// OSRM server URL.
    #[serde(default = "default_routing_endpoint")]
    pub endpoint: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_routing_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after a transient failure.
    #[serde(default = "default_routing_retries")]
    pub max_retries: u32,
}

fn default_true() -> bool {
    true
}

fn default_routing_endpoint() -> String {
    DEFAULT_OSRM_ENDPOINT.to_string()
}

fn default_routing_timeout_ms() -> u64 {
    10_000
}

fn default_routing_retries() -> u32 {
    2
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_routing_endpoint(),
            timeout_ms: default_routing_timeout_ms(),
            max_retries: default_routing_retries(),
        }
    }
}

impl RoutingConfig {
    /// Fetch policy for route requests.
    pub fn policy(&self) -> FetchPolicy {
        fetch_policy(self.timeout_ms, self.max_retries)
    }
}

fn fetch_policy(timeout_ms: u64, max_retries: u32) -> FetchPolicy {
    FetchPolicy::new(
        TimeoutConfig::from_total(Duration::from_millis(timeout_ms)),
        RetryPolicy::new(max_retries),
    )
}

/// Ranking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// How split proposals pick stores and items.
    #[serde(default)]
    pub split_strategy: SplitStrategy,

    /// "round-robin" or "fixed:<chain>".
    #[serde(default = "default_fallback_chain")]
    pub fallback_chain: String,
}

fn default_fallback_chain() -> String {
    "round-robin".to_string()
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            split_strategy: SplitStrategy::default(),
            fallback_chain: default_fallback_chain(),
        }
    }
}

/// Catalog source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON or TOML catalog file; the built-in catalog when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level written to stderr.
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// "human" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Generate a default cartscout.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# cartscout configuration

[origin]
# Where distances are measured from.
lat = {lat}
lng = {lng}

[locator]
endpoint = "{locator}"
radius_m = {radius}
timeout_ms = {locator_timeout}
max_retries = {locator_retries}

[routing]
enabled = true
endpoint = "{routing}"
timeout_ms = {routing_timeout}
max_retries = {routing_retries}

[ranking]
# "placeholder" or "per-item-cheapest"
split_strategy = "placeholder"
# "round-robin" or "fixed:<chain>", for stores matching no known chain
fallback_chain = "round-robin"

[catalog]
# file = "catalog.toml"

[logging]
level = "warn"
format = "human"
"#,
        lat = default_lat(),
        lng = default_lng(),
        locator = DEFAULT_OVERPASS_ENDPOINT,
        radius = default_radius_m(),
        locator_timeout = default_locator_timeout_ms(),
        locator_retries = default_locator_retries(),
        routing = DEFAULT_OSRM_ENDPOINT,
        routing_timeout = default_routing_timeout_ms(),
        routing_retries = default_routing_retries(),
    )
}
