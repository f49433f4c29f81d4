use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// HTTP client seam for the relay prober
///
/// The prober only needs a bounded existence check, so the trait surface
/// is deliberately small. Tests substitute stub implementations; the
/// production implementation wraps reqwest.
#[async_trait]
pub trait ConnectivityClient: Send + Sync {
    /// HEAD-equivalent check: does `url` answer with a 2xx within `timeout`?
    ///
    /// Transport errors, timeouts, and non-2xx statuses surface as `Err`;
    /// the prober converts them into failed attempt records rather than
    /// propagating them.
    async fn check(&self, url: &str, timeout: Duration) -> AppResult<()>;
}

/// Default implementation of [`ConnectivityClient`] using reqwest
pub struct StandardHttpClient {
    client: Client,
}

impl StandardHttpClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

impl Default for StandardHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectivityClient for StandardHttpClient {
    async fn check(&self, url: &str, timeout: Duration) -> AppResult<()> {
        debug!("Connectivity check: {}", url);

        let response = self
            .client
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| AppError::external_service("relay", e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::external_service(
                "relay",
                format!(
                    "HTTP error: {} {}",
                    response.status(),
                    response.status().canonical_reason().unwrap_or("Unknown")
                ),
            ))
        }
    }
}
