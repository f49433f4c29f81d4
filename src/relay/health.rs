//! Per-session endpoint health monitoring
//!
//! One instance per active player session, fed by the player's
//! segment-load callbacks. Tracks consecutive failures of the selected
//! endpoint and, once the threshold trips, hunts for a replacement so the
//! session can switch relays without restarting.
//!
//! The alternative search is deliberately a lighter loop than the initial
//! failover selection: no inter-attempt delay and no attempt cap, because
//! mid-session recovery latency matters more than probing politeness.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::relay::prober::probe;
use crate::relay::registry::{ProxyEndpoint, ProxyRegistry};
use crate::utils::{ConnectivityClient, UrlUtils};

/// A live endpoint switch adopted by the health monitor
#[derive(Debug, Clone, Serialize)]
pub struct EndpointSwitch {
    pub endpoint: ProxyEndpoint,
    pub playlist_url: String,
    pub proxied_stream_url: String,
}

/// Mutable health state for one player session
///
/// Owned exclusively by the session that created it; never shared across
/// concurrent sessions or channels.
pub struct HealthMonitor {
    registry: ProxyRegistry,
    client: Arc<dyn ConnectivityClient>,
    local_base_url: String,
    probe_timeout: Duration,
    failure_threshold: u32,
    current_endpoint: Option<String>,
    consecutive_failures: u32,
}

impl HealthMonitor {
    pub fn new(registry: ProxyRegistry, client: Arc<dyn ConnectivityClient>, config: &Config) -> Self {
        Self {
            registry,
            client,
            local_base_url: config.web.base_url.clone(),
            probe_timeout: Duration::from_millis(config.relay.probe_timeout_ms),
            failure_threshold: config.relay.failure_threshold,
            current_endpoint: None,
            consecutive_failures: 0,
        }
    }

    /// Adopt an endpoint as current and reset the failure counter
    pub fn set_current_endpoint(&mut self, name: &str) {
        debug!("Health monitor now tracking endpoint {}", name);
        self.current_endpoint = Some(name.to_string());
        self.consecutive_failures = 0;
    }

    pub fn current_endpoint(&self) -> Option<&str> {
        self.current_endpoint.as_deref()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Record a successful segment load; the endpoint stays current
    pub fn report_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Record a failed segment load.
    ///
    /// Returns true once the consecutive-failure count reaches the
    /// threshold, signalling the caller to switch endpoints now.
    pub fn report_failure(&mut self) -> bool {
        self.consecutive_failures += 1;
        let should_switch = self.consecutive_failures >= self.failure_threshold;
        if should_switch {
            warn!(
                "Endpoint {} hit {} consecutive failures, switch required",
                self.current_endpoint.as_deref().unwrap_or("<none>"),
                self.consecutive_failures
            );
        }
        should_switch
    }

    /// Probe every registry endpoint once, in priority order, and adopt
    /// the first that answers.
    ///
    /// With `exclude_current` set, the endpoint currently in use is left
    /// out of the candidate list. Returns `None` when every candidate
    /// fails; the session keeps its previous state in that case.
    pub async fn find_alternative(
        &mut self,
        channel: &str,
        exclude_current: bool,
    ) -> Option<EndpointSwitch> {
        let excluded = if exclude_current {
            self.current_endpoint.clone()
        } else {
            None
        };

        let candidates: Vec<ProxyEndpoint> = self
            .registry
            .endpoints()
            .iter()
            .filter(|e| excluded.as_deref() != Some(e.name.as_str()))
            .cloned()
            .collect();

        for endpoint in candidates {
            let attempt = probe(
                self.client.as_ref(),
                &self.local_base_url,
                &endpoint,
                channel,
                self.probe_timeout,
            )
            .await;

            if attempt.success {
                info!(
                    "Live switch: channel {} moves to relay {} ({})",
                    channel, endpoint.name, endpoint.region
                );
                self.set_current_endpoint(&endpoint.name);
                let playlist_url = endpoint.playlist_url(channel);
                let proxied_stream_url = UrlUtils::proxied(&playlist_url);
                return Some(EndpointSwitch {
                    endpoint,
                    playlist_url,
                    proxied_stream_url,
                });
            }
        }

        warn!("No alternative relay available for channel {}", channel);
        None
    }
}
