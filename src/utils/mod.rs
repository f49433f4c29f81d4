//! Shared utilities

pub mod http_client;
pub mod url;

pub use http_client::{ConnectivityClient, StandardHttpClient};
pub use url::UrlUtils;
