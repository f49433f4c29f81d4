//! Post-rewrite annotation statistics
//!
//! Read-only scan over a rewritten manifest, used for diagnostics and
//! tests. Never feeds back into rewriting.

use serde::Serialize;

const ANNOTATION_PREFIX: &str = "#EXT-X-COMMENT:annot=cue-detected,type=";

/// Summary of cue annotations and discontinuities in a rewritten manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationStats {
    pub total_cues: usize,
    pub scte35: usize,
    pub cue_out: usize,
    pub cue_in: usize,
    pub date_range: usize,
    pub discontinuities: usize,
}

/// Summarize the annotations a rewrite pass left in a manifest
pub fn summarize(rewritten: &str) -> AnnotationStats {
    let mut stats = AnnotationStats::default();

    for line in rewritten.lines() {
        if let Some(rest) = line.strip_prefix(ANNOTATION_PREFIX) {
            stats.total_cues += 1;
            // Trailing ",duration=<n>" may follow the kind token
            let kind = rest.split(',').next().unwrap_or(rest);
            match kind {
                "SCTE35" => stats.scte35 += 1,
                "CUE_OUT" => stats.cue_out += 1,
                "CUE_IN" => stats.cue_in += 1,
                "DATERANGE" => stats.date_range += 1,
                _ => {}
            }
        } else if line.trim() == "#EXT-X-DISCONTINUITY" {
            stats.discontinuities += 1;
        }
    }

    stats
}
