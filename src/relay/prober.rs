//! Relay endpoint probing
//!
//! One bounded-time existence check per call. The probe goes through the
//! local proxy route rather than straight at the relay, so the exact
//! fetch path the player will use is what gets validated.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::relay::registry::ProxyEndpoint;
use crate::utils::{ConnectivityClient, UrlUtils};

/// Result of probing one endpoint for one channel
///
/// Immutable once created; failed attempts carry the error as text so a
/// full diagnostic trail survives an exhausted failover run.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyAttempt {
    pub endpoint_name: String,
    pub success: bool,
    pub error_message: Option<String>,
    pub response_time_ms: u64,
}

/// Probe one endpoint for one channel, bounded by `timeout`.
///
/// Never propagates errors outward: every failure path resolves to a
/// failed [`ProxyAttempt`].
pub async fn probe(
    client: &dyn ConnectivityClient,
    local_base_url: &str,
    endpoint: &ProxyEndpoint,
    channel: &str,
    timeout: Duration,
) -> ProxyAttempt {
    let playlist_url = endpoint.playlist_url(channel);
    // The proxied path starts with a slash, so a trailing slash on the
    // configured base would otherwise yield a `//api/hls` probe URL.
    let probe_url = format!(
        "{}{}",
        local_base_url.trim_end_matches('/'),
        UrlUtils::proxied(&playlist_url)
    );
    let started = Instant::now();

    match client.check(&probe_url, timeout).await {
        Ok(()) => {
            let elapsed = started.elapsed().as_millis() as u64;
            debug!(
                "Probe succeeded: endpoint={} channel={} ({}ms)",
                endpoint.name, channel, elapsed
            );
            ProxyAttempt {
                endpoint_name: endpoint.name.clone(),
                success: true,
                error_message: None,
                response_time_ms: elapsed,
            }
        }
        Err(e) => {
            let elapsed = started.elapsed().as_millis() as u64;
            debug!(
                "Probe failed: endpoint={} channel={} ({}ms): {}",
                endpoint.name, channel, elapsed, e
            );
            ProxyAttempt {
                endpoint_name: endpoint.name.clone(),
                success: false,
                error_message: Some(e.to_string()),
                response_time_ms: elapsed,
            }
        }
    }
}
