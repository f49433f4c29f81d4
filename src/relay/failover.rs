//! Initial relay endpoint selection
//!
//! Probes ranked candidates sequentially until one answers or the attempt
//! budget runs out. Sequential on purpose: fanning probes out in parallel
//! would pile load onto relays that are already struggling, and ordered
//! attempts keep the diagnostic trail deterministic.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::relay::prober::{ProxyAttempt, probe};
use crate::relay::registry::{ProxyEndpoint, ProxyRegistry};
use crate::utils::{ConnectivityClient, UrlUtils};

/// Preferred-endpoint value meaning "no preference, use priority order"
pub const AUTO_ENDPOINT: &str = "auto";

/// Result of one failover run
#[derive(Debug, Clone, Serialize)]
pub struct FailoverOutcome {
    pub success: bool,
    pub selected_endpoint: Option<ProxyEndpoint>,
    /// Upstream playlist URL on the selected relay
    pub playlist_url: Option<String>,
    /// Local proxied form of the playlist URL, ready to hand to a player
    pub proxied_stream_url: Option<String>,
    /// Every probe made during this run, in order
    pub attempts: Vec<ProxyAttempt>,
    pub error: Option<String>,
}

/// Orchestrates sequential probing across the ranked endpoint catalog
pub struct FailoverEngine {
    registry: ProxyRegistry,
    client: Arc<dyn ConnectivityClient>,
    local_base_url: String,
    probe_timeout: Duration,
    retry_delay: Duration,
}

impl FailoverEngine {
    pub fn new(registry: ProxyRegistry, client: Arc<dyn ConnectivityClient>, config: &Config) -> Self {
        Self {
            registry,
            client,
            local_base_url: config.web.base_url.clone(),
            probe_timeout: Duration::from_millis(config.relay.probe_timeout_ms),
            retry_delay: Duration::from_millis(config.relay.retry_delay_ms),
        }
    }

    pub fn registry(&self) -> &ProxyRegistry {
        &self.registry
    }

    /// Find a working relay endpoint for `channel`.
    ///
    /// Candidates are taken in priority order, with a known, non-"auto"
    /// `preferred` name promoted to the front (remainder order
    /// untouched). At most `max_attempts` endpoints are probed, one at a
    /// time, with a fixed delay between failed attempts. Stops on the
    /// first success.
    pub async fn find_working(
        &self,
        channel: &str,
        max_attempts: usize,
        preferred: Option<&str>,
    ) -> FailoverOutcome {
        let candidates = self.candidates(preferred, max_attempts);
        let mut attempts: Vec<ProxyAttempt> = Vec::with_capacity(candidates.len());

        for (index, endpoint) in candidates.iter().enumerate() {
            // Throttle between failed attempts, not before the first one.
            if index > 0 {
                tokio::time::sleep(self.retry_delay).await;
            }

            let attempt = probe(
                self.client.as_ref(),
                &self.local_base_url,
                endpoint,
                channel,
                self.probe_timeout,
            )
            .await;
            let succeeded = attempt.success;
            attempts.push(attempt);

            if succeeded {
                let playlist_url = endpoint.playlist_url(channel);
                let proxied_stream_url = UrlUtils::proxied(&playlist_url);
                info!(
                    "Selected relay {} ({}) for channel {} after {} attempt(s)",
                    endpoint.name,
                    endpoint.region,
                    channel,
                    attempts.len()
                );
                return FailoverOutcome {
                    success: true,
                    selected_endpoint: Some(endpoint.clone()),
                    playlist_url: Some(playlist_url),
                    proxied_stream_url: Some(proxied_stream_url),
                    attempts,
                    error: None,
                };
            }
        }

        warn!(
            "All {} relay attempt(s) failed for channel {}",
            attempts.len(),
            channel
        );
        FailoverOutcome {
            success: false,
            selected_endpoint: None,
            playlist_url: None,
            proxied_stream_url: None,
            attempts,
            error: Some(format!(
                "no working relay endpoint for channel {channel} after {max_attempts} attempt(s)"
            )),
        }
    }

    /// Priority-ordered candidate list with optional preferred promotion,
    /// capped at the attempt budget
    fn candidates(&self, preferred: Option<&str>, max_attempts: usize) -> Vec<ProxyEndpoint> {
        let mut candidates: Vec<ProxyEndpoint> = self.registry.endpoints().to_vec();

        if let Some(name) = preferred
            && name != AUTO_ENDPOINT
            && let Some(position) = candidates.iter().position(|e| e.name == name)
        {
            let endpoint = candidates.remove(position);
            candidates.insert(0, endpoint);
        }

        candidates.truncate(max_attempts);
        candidates
    }
}
