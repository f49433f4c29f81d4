use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

pub mod defaults;

use defaults::*;

/// Top-level configuration for the relay engine
///
/// Loaded once at startup; this crate does not hot-reload it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub rewrite: RewriteConfig,
    #[serde(default)]
    pub relay: RelayConfig,
}

/// Local web boundary the probe route lives behind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Base URL of the local proxy route, e.g. `http://127.0.0.1:8080`
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Manifest rewriting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// When true, ad segments flagged by CUE-OUT markers are removed from
    /// manifests instead of merely annotated
    #[serde(default = "default_skip_ads")]
    pub skip_ads: bool,
}

/// Relay endpoint catalog and failover tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Per-endpoint probe timeout in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Fixed delay between failed probe attempts during initial selection,
    /// in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Maximum endpoints tried per failover run
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Consecutive failures before the health monitor requests a switch
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// Relay endpoint catalog; falls back to the built-in list when empty
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<EndpointConfig>,
}

/// One relay endpoint entry in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub base_host: String,
    pub region: String,
    pub priority: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_skip_ads() -> bool {
    DEFAULT_SKIP_ADS
}
fn default_probe_timeout_ms() -> u64 {
    DEFAULT_PROBE_TIMEOUT_MS
}
fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}
fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}
fn default_failure_threshold() -> u32 {
    DEFAULT_FAILURE_THRESHOLD
}

fn default_endpoints() -> Vec<EndpointConfig> {
    DEFAULT_ENDPOINTS
        .iter()
        .map(|(name, base_host, region, priority)| EndpointConfig {
            name: (*name).to_string(),
            base_host: (*base_host).to_string(),
            region: (*region).to_string(),
            priority: *priority,
        })
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            rewrite: RewriteConfig::default(),
            relay: RelayConfig::default(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            skip_ads: default_skip_ads(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: default_probe_timeout_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            max_attempts: default_max_attempts(),
            failure_threshold: default_failure_threshold(),
            endpoints: default_endpoints(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            Ok(default_config)
        }
    }
}
