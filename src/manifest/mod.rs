//! HLS manifest processing
//!
//! Line-oriented M3U8 handling: ad-cue classification, manifest rewriting
//! (annotate or skip mode), and post-rewrite annotation statistics.
//!
//! Rewriting is deliberately textual rather than built on a playlist
//! parser: annotate mode must be bit-for-bit non-destructive for every
//! line it does not touch, and unknown or malformed tags must survive the
//! pass untouched.

pub mod cue;
pub mod rewriter;
pub mod stats;

pub use cue::{Cue, CueKind, classify};
pub use rewriter::{RewriteMode, rewrite, rewrite_with_config};
pub use stats::{AnnotationStats, summarize};
