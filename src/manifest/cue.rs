//! Ad-insertion cue classification
//!
//! Server-side ad insertion is signalled in HLS manifests through a small
//! set of marker tags (SCTE-35 payloads, DATERANGE carriers, CUE-OUT /
//! CUE-IN boundaries). This module classifies a single manifest line into
//! one of those marker kinds.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Matches the `DURATION=<float>` attribute on a CUE-OUT tag
static DURATION_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"DURATION=([0-9]+(?:\.[0-9]+)?)").expect("static regex must compile")
});

/// Kind of ad-insertion marker found in a manifest line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CueKind {
    Scte35,
    DateRange,
    CueOut,
    CueIn,
}

impl CueKind {
    /// Token emitted into annotation comments for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            CueKind::Scte35 => "SCTE35",
            CueKind::DateRange => "DATERANGE",
            CueKind::CueOut => "CUE_OUT",
            CueKind::CueIn => "CUE_IN",
        }
    }
}

/// A detected ad-insertion marker extracted from one manifest line
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub kind: CueKind,
    /// Break length in seconds, known only for CUE-OUT tags carrying a
    /// `DURATION` attribute
    pub duration_secs: Option<f64>,
    /// The tag's value (text after the first colon), kept opaque
    pub raw_payload: Option<String>,
}

/// Classify one manifest line as an ad-cue marker, if it is one.
///
/// Precedence is first-match-wins and behaviorally significant: a
/// DATERANGE tag carrying SCTE35 data must classify as DATERANGE, not as
/// a generic SCTE35 hit, so the SCTE35 containment check tests for the
/// full tag name. Malformed or partial tags classify as `None`; this
/// function never panics.
pub fn classify(line: &str) -> Option<Cue> {
    if line.contains("#EXT-X-SCTE35") {
        return Some(Cue {
            kind: CueKind::Scte35,
            duration_secs: None,
            raw_payload: tag_payload(line),
        });
    }

    if line.starts_with("#EXT-X-DATERANGE") && line.contains("SCTE35") {
        return Some(Cue {
            kind: CueKind::DateRange,
            duration_secs: None,
            raw_payload: tag_payload(line),
        });
    }

    if line.contains("#EXT-X-CUE-OUT") {
        let duration_secs = DURATION_ATTR
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        return Some(Cue {
            kind: CueKind::CueOut,
            duration_secs,
            raw_payload: tag_payload(line),
        });
    }

    if line.contains("#EXT-X-CUE-IN") {
        return Some(Cue {
            kind: CueKind::CueIn,
            duration_secs: None,
            raw_payload: None,
        });
    }

    None
}

/// Text after the first colon of a tag line, if any
fn tag_payload(line: &str) -> Option<String> {
    line.split_once(':').map(|(_, rest)| rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scte35_classification() {
        let cue = classify("#EXT-X-SCTE35:CUE=\"/DA0AAAAAAAA\"").unwrap();
        assert_eq!(cue.kind, CueKind::Scte35);
        assert_eq!(cue.raw_payload.as_deref(), Some("CUE=\"/DA0AAAAAAAA\""));
    }

    #[test]
    fn test_daterange_with_scte35_wins_over_generic() {
        // DATERANGE carrying SCTE35 attribute data must not classify as SCTE35
        let line = "#EXT-X-DATERANGE:ID=\"ad-1\",SCTE35-OUT=0xFC30";
        let cue = classify(line).unwrap();
        assert_eq!(cue.kind, CueKind::DateRange);
    }

    #[test]
    fn test_daterange_without_scte35_is_not_a_cue() {
        assert!(classify("#EXT-X-DATERANGE:ID=\"program-4\",CLASS=\"chapter\"").is_none());
    }

    #[test]
    fn test_cue_out_with_duration() {
        let cue = classify("#EXT-X-CUE-OUT:DURATION=30.5").unwrap();
        assert_eq!(cue.kind, CueKind::CueOut);
        assert_eq!(cue.duration_secs, Some(30.5));
    }

    #[test]
    fn test_cue_out_without_duration() {
        let cue = classify("#EXT-X-CUE-OUT").unwrap();
        assert_eq!(cue.kind, CueKind::CueOut);
        assert_eq!(cue.duration_secs, None);
    }

    #[test]
    fn test_cue_in() {
        let cue = classify("#EXT-X-CUE-IN").unwrap();
        assert_eq!(cue.kind, CueKind::CueIn);
    }

    #[test]
    fn test_non_cue_lines() {
        assert!(classify("#EXTM3U").is_none());
        assert!(classify("#EXTINF:2.0,").is_none());
        assert!(classify("segment1.ts").is_none());
        assert!(classify("").is_none());
    }

    #[test]
    fn test_malformed_duration_tolerated() {
        let cue = classify("#EXT-X-CUE-OUT:DURATION=abc").unwrap();
        assert_eq!(cue.kind, CueKind::CueOut);
        assert_eq!(cue.duration_secs, None);
    }

    #[test]
    fn test_classification_is_pure() {
        let line = "#EXT-X-CUE-OUT:DURATION=30.0";
        assert_eq!(classify(line), classify(line));
    }
}
