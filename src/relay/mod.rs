//! Relay endpoint selection and health tracking
//!
//! A ranked catalog of remote relay endpoints is probed sequentially at
//! session start ([`failover`]); once a session is playing, a per-session
//! [`health`] monitor watches for consecutive segment failures and swaps
//! the endpoint live when the current one turns unreliable.

pub mod failover;
pub mod health;
pub mod prober;
pub mod registry;

pub use failover::{AUTO_ENDPOINT, FailoverEngine, FailoverOutcome};
pub use health::{EndpointSwitch, HealthMonitor};
pub use prober::{ProxyAttempt, probe};
pub use registry::{ProxyEndpoint, ProxyRegistry};
