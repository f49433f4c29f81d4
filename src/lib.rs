//! HLS relay engine: manifest rewriting and relay endpoint failover
//!
//! Two cooperating cores behind a thin external HTTP boundary:
//!
//! - [`manifest`] parses M3U8 text line by line, classifies ad-insertion
//!   cue markers, and either annotates the document or surgically removes
//!   ad segments, rewriting every segment URI through the local proxy
//!   route on the way.
//! - [`relay`] maintains a ranked catalog of relay endpoints, probes them
//!   with bounded-time checks, fails over between them at session start,
//!   and monitors per-session health to swap endpoints live.
//!
//! The HTTP route handlers, player UI, persistence, and auth layers that
//! consume this crate are external collaborators.

pub mod config;
pub mod errors;
pub mod manifest;
pub mod relay;
pub mod utils;
