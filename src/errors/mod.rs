//! Error handling for the HLS relay engine
//!
//! Recoverable relay conditions (probe failures, exhausted failover runs)
//! are modelled as data on [`crate::relay::ProxyAttempt`] and
//! [`crate::relay::FailoverOutcome`], not as errors. The types here cover
//! the genuinely exceptional paths: configuration problems and transport
//! failures that cannot be attributed to a single attempt.

pub mod types;

pub use types::AppError;

/// Convenience result type used throughout the crate
pub type AppResult<T> = Result<T, AppError>;
