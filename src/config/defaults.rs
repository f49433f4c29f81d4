/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web defaults
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

// Rewrite defaults
pub const DEFAULT_SKIP_ADS: bool = false;
pub const DEFAULT_TARGET_DURATION_SECS: f64 = 2.0;

// Relay failover defaults
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 8000;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Built-in relay catalog used when the config file does not declare one.
///
/// Order here is not significant; the registry sorts by priority.
pub const DEFAULT_ENDPOINTS: &[(&str, &str, &str, u32)] = &[
    ("eu1", "eu1.streamrelay.dev", "Europe", 1),
    ("eu2", "eu2.streamrelay.dev", "Europe", 2),
    ("na1", "na1.streamrelay.dev", "North America", 3),
    ("as1", "as1.streamrelay.dev", "Asia", 4),
];
