//! URL utilities for consistent URL handling
//!
//! This module provides utilities for URL resolution, validation, and the
//! proxied-URL convention used throughout the rewriting pipeline.

use url::Url;

/// Route prefix every proxied manifest/segment URL is rewritten onto.
///
/// The external HTTP layer owns this route: given `src=<absolute URL>` it
/// fetches the URL, validates its host, and recursively rewrites any
/// manifest it returns.
pub const PROXY_ROUTE: &str = "/api/hls";

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Parse and validate a URL
    pub fn parse_and_validate(url: &str) -> Result<Url, url::ParseError> {
        Url::parse(url)
    }

    /// Check if a URL is valid
    pub fn is_valid(url: &str) -> bool {
        Self::parse_and_validate(url).is_ok()
    }

    /// Resolve a possibly-relative reference against a base URL
    ///
    /// Standard RFC 3986 resolution: absolute references pass through,
    /// relative ones are joined onto the base.
    pub fn resolve(base: &str, reference: &str) -> Result<String, url::ParseError> {
        let base_url = Url::parse(base)?;
        let resolved = base_url.join(reference)?;
        Ok(resolved.to_string())
    }

    /// Build the local proxied form of an absolute URL
    ///
    /// This is the wire contract with the external proxy route:
    /// `/api/hls?src=<percent-encoded absolute URL>`.
    pub fn proxied(absolute_url: &str) -> String {
        format!(
            "{}?src={}",
            PROXY_ROUTE,
            urlencoding::encode(absolute_url)
        )
    }

    /// Extract the host from a URL
    pub fn extract_host(url: &str) -> Option<String> {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }
}
