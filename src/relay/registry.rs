//! Relay endpoint catalog
//!
//! Static, ordered table of relay endpoints plus the hostname allow-list
//! the external HTTP boundary checks before proxying any URL. Keeps the
//! failover engine free of hardcoded endpoint knowledge.

use serde::Serialize;

use crate::config::RelayConfig;
use crate::errors::{AppError, AppResult};
use crate::utils::UrlUtils;

/// One immutable relay catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyEndpoint {
    pub name: String,
    pub base_host: String,
    pub region: String,
    /// Lower value is tried first
    pub priority: u32,
}

impl ProxyEndpoint {
    /// Upstream playlist URL for a channel on this relay
    pub fn playlist_url(&self, channel: &str) -> String {
        format!(
            "https://{}/playlist/{}.m3u8",
            self.base_host,
            urlencoding::encode(channel)
        )
    }
}

/// Read-only, priority-sorted catalog of relay endpoints
#[derive(Debug, Clone)]
pub struct ProxyRegistry {
    endpoints: Vec<ProxyEndpoint>,
}

impl ProxyRegistry {
    /// Build the registry from configuration, sorted ascending by priority.
    ///
    /// An empty catalog is a startup-time fatal condition; every consumer
    /// of this crate assumes a validated, non-empty registry.
    pub fn from_config(config: &RelayConfig) -> AppResult<Self> {
        if config.endpoints.is_empty() {
            return Err(AppError::configuration("relay endpoint catalog is empty"));
        }

        let mut endpoints: Vec<ProxyEndpoint> = config
            .endpoints
            .iter()
            .map(|e| ProxyEndpoint {
                name: e.name.clone(),
                base_host: e.base_host.clone(),
                region: e.region.clone(),
                priority: e.priority,
            })
            .collect();
        endpoints.sort_by_key(|e| e.priority);

        Ok(Self { endpoints })
    }

    /// Endpoints in ascending priority order
    pub fn endpoints(&self) -> &[ProxyEndpoint] {
        &self.endpoints
    }

    /// Look up an endpoint by name
    pub fn find(&self, name: &str) -> Option<&ProxyEndpoint> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Hostnames a proxied source URL may legitimately point at
    pub fn allowed_hosts(&self) -> Vec<&str> {
        self.endpoints.iter().map(|e| e.base_host.as_str()).collect()
    }

    /// Validate that a URL targets a known relay host.
    ///
    /// The external proxy route calls this on every `src=` parameter it
    /// receives, so the route cannot be abused as an open proxy.
    pub fn is_allowed_url(&self, url: &str) -> bool {
        match UrlUtils::extract_host(url) {
            Some(host) => self.endpoints.iter().any(|e| e.base_host == host),
            None => false,
        }
    }
}
