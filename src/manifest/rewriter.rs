//! Manifest rewriting
//!
//! Single top-to-bottom pass over an M3U8 document. Every media-segment
//! URI is rerouted through the local proxy; detected ad cues are either
//! annotated in place (non-destructive) or removed together with the ad
//! segments they delimit, with a discontinuity marker inserted to keep
//! the player's segment-sequence state consistent.

use tracing::debug;

use crate::config::RewriteConfig;
use crate::config::defaults::DEFAULT_TARGET_DURATION_SECS;
use crate::manifest::cue::{Cue, CueKind, classify};
use crate::utils::UrlUtils;

/// Operating mode for a rewrite pass
///
/// Selected once per invocation from process configuration, never from
/// the document itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteMode {
    /// Emit annotation comments but keep every original line
    Annotate,
    /// Remove CUE-OUT delimited ad segments and repair continuity
    Skip,
}

impl From<&RewriteConfig> for RewriteMode {
    fn from(config: &RewriteConfig) -> Self {
        if config.skip_ads {
            RewriteMode::Skip
        } else {
            RewriteMode::Annotate
        }
    }
}

/// Rewriter cursor state for one pass over one document
///
/// `in_ad_break` holds only while `segments_to_skip` is positive or until
/// a matching CUE-IN; a CUE-IN resets both unconditionally.
struct Cursor {
    target_duration: f64,
    segments_to_skip: u32,
    in_ad_break: bool,
}

impl Cursor {
    fn new() -> Self {
        Self {
            target_duration: DEFAULT_TARGET_DURATION_SECS,
            segments_to_skip: 0,
            in_ad_break: false,
        }
    }

    fn reset_skip(&mut self) {
        self.segments_to_skip = 0;
        self.in_ad_break = false;
    }
}

/// Rewrite a manifest, proxying segment URIs and processing ad cues.
///
/// Never fails on malformed input: an unresolvable segment line or a
/// broken tag degrades to pass-through for that line while the rest of
/// the document is still processed. Pure function of its three inputs.
pub fn rewrite(manifest: &str, base_url: &str, mode: RewriteMode) -> String {
    let mut cursor = Cursor::new();
    let mut out: Vec<String> = Vec::new();
    let mut lines = manifest.lines();

    while let Some(line) = lines.next() {
        if let Some(rest) = line.strip_prefix("#EXT-X-TARGETDURATION:") {
            if let Ok(value) = rest.trim().parse::<f64>()
                && value > 0.0
            {
                cursor.target_duration = value;
            }
            out.push(line.to_string());
            continue;
        }

        if let Some(cue) = classify(line) {
            out.push(annotation_comment(&cue));

            match mode {
                RewriteMode::Annotate => out.push(line.to_string()),
                RewriteMode::Skip => match cue.kind {
                    CueKind::CueOut if cue.duration_secs.is_some() => {
                        let duration = cue.duration_secs.unwrap_or_default();
                        let segments = (duration / cursor.target_duration).ceil() as u32;
                        cursor.segments_to_skip = segments;
                        cursor.in_ad_break = true;
                        debug!(
                            "Ad break of {}s at target duration {}s: skipping {} segments",
                            duration, cursor.target_duration, segments
                        );
                        out.push(format!("#EXT-X-COMMENT:skip-start,segments={segments}"));
                    }
                    CueKind::CueIn => {
                        cursor.reset_skip();
                        out.push("#EXT-X-COMMENT:skip-end".to_string());
                    }
                    // DATERANGE carriers survive skip mode unchanged;
                    // SCTE35 and duration-less CUE-OUT markers start no
                    // skip run and their raw tag lines are stripped.
                    CueKind::DateRange => out.push(line.to_string()),
                    _ => {}
                },
            }
            continue;
        }

        // Consume EXTINF + URI pairs inside an active skip run. The
        // discontinuity goes in exactly once, when the counter bottoms out.
        if cursor.in_ad_break && cursor.segments_to_skip > 0 && line.starts_with("#EXTINF") {
            lines.next();
            cursor.segments_to_skip -= 1;
            if cursor.segments_to_skip == 0 {
                out.push("#EXT-X-DISCONTINUITY".to_string());
                out.push("#EXT-X-COMMENT:skip-discontinuity-inserted".to_string());
            }
            continue;
        }

        // Tags, comments, and blank lines pass through verbatim.
        if line.starts_with('#') || line.trim().is_empty() {
            out.push(line.to_string());
            continue;
        }

        // Anything else is a segment URI: resolve and reroute through the
        // local proxy, or pass through untouched if resolution fails.
        match UrlUtils::resolve(base_url, line) {
            Ok(absolute) => out.push(UrlUtils::proxied(&absolute)),
            Err(e) => {
                debug!("Leaving segment line unrewritten ({}): {}", e, line);
                out.push(line.to_string());
            }
        }
    }

    let mut result = out.join("\n");
    if manifest.ends_with('\n') && !result.is_empty() {
        result.push('\n');
    }
    result
}

/// Rewrite with the mode taken from process configuration
pub fn rewrite_with_config(manifest: &str, base_url: &str, config: &RewriteConfig) -> String {
    rewrite(manifest, base_url, RewriteMode::from(config))
}

/// Annotation comment for a detected cue, grammar-exact:
/// `#EXT-X-COMMENT:annot=cue-detected,type=<KIND>[,duration=<int>]`
fn annotation_comment(cue: &Cue) -> String {
    match (cue.kind, cue.duration_secs) {
        (CueKind::CueOut, Some(duration)) => format!(
            "#EXT-X-COMMENT:annot=cue-detected,type={},duration={}",
            cue.kind.as_str(),
            duration.floor() as u64
        ),
        _ => format!(
            "#EXT-X-COMMENT:annot=cue-detected,type={}",
            cue.kind.as_str()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://cdn.example.com/live/chunklist.m3u8";

    #[test]
    fn test_empty_manifest() {
        assert_eq!(rewrite("", BASE, RewriteMode::Annotate), "");
        assert_eq!(rewrite("", BASE, RewriteMode::Skip), "");
    }

    #[test]
    fn test_header_preserved() {
        let input = "#EXTM3U\n";
        let output = rewrite(input, BASE, RewriteMode::Skip);
        assert!(output.starts_with("#EXTM3U"));
        assert!(!output.contains("annot=cue-detected"));
    }

    #[test]
    fn test_segment_uri_proxied() {
        let input = "#EXTM3U\n#EXTINF:2.0,\nsegment1.ts\n";
        let output = rewrite(input, BASE, RewriteMode::Annotate);
        assert!(output.contains("#EXTINF:2.0,"));
        assert!(
            output.contains("/api/hls?src=https%3A%2F%2Fcdn.example.com%2Flive%2Fsegment1.ts")
        );
        assert!(!output.contains("\nsegment1.ts"));
    }

    #[test]
    fn test_unresolvable_base_passes_line_through() {
        let input = "#EXTM3U\n#EXTINF:2.0,\nsegment1.ts\n";
        let output = rewrite(input, "not a url", RewriteMode::Annotate);
        assert!(output.contains("\nsegment1.ts"));
    }

    #[test]
    fn test_annotate_keeps_original_cue_line() {
        let input = "#EXTM3U\n#EXT-X-CUE-OUT:DURATION=30.0\n#EXTINF:2.0,\nad1.ts\n";
        let output = rewrite(input, BASE, RewriteMode::Annotate);
        assert!(output.contains("#EXT-X-COMMENT:annot=cue-detected,type=CUE_OUT,duration=30"));
        assert!(output.contains("#EXT-X-CUE-OUT:DURATION=30.0"));
        // Annotation precedes the original line
        let annot_pos = output.find("annot=cue-detected").unwrap();
        let orig_pos = output.find("#EXT-X-CUE-OUT:").unwrap();
        assert!(annot_pos < orig_pos);
    }

    #[test]
    fn test_annotate_mode_never_skips_segments() {
        let input = "#EXTM3U\n#EXT-X-CUE-OUT:DURATION=4.0\n#EXTINF:2.0,\nad1.ts\n#EXTINF:2.0,\nad2.ts\n";
        let output = rewrite(input, BASE, RewriteMode::Annotate);
        assert!(output.contains("ad1.ts"));
        assert!(output.contains("ad2.ts"));
        assert!(!output.contains("#EXT-X-DISCONTINUITY"));
    }

    #[test]
    fn test_skip_removes_exact_segment_count() {
        // 30s break at 10s target duration: ceil(30/10) = 3 pairs removed
        let input = "#EXTM3U\n\
                     #EXT-X-TARGETDURATION:10\n\
                     #EXT-X-CUE-OUT:DURATION=30.0\n\
                     #EXTINF:10.0,\nad1.ts\n\
                     #EXTINF:10.0,\nad2.ts\n\
                     #EXTINF:10.0,\nad3.ts\n\
                     #EXT-X-CUE-IN\n\
                     #EXTINF:10.0,\ncontent1.ts\n";
        let output = rewrite(input, BASE, RewriteMode::Skip);

        assert!(!output.contains("ad1.ts"));
        assert!(!output.contains("ad2.ts"));
        assert!(!output.contains("ad3.ts"));
        assert!(output.contains("content1.ts"));
        assert_eq!(output.matches("#EXT-X-DISCONTINUITY").count(), 1);
        assert!(output.contains("#EXT-X-COMMENT:skip-start,segments=3"));
        assert!(output.contains("#EXT-X-COMMENT:skip-end"));
        assert!(output.contains("#EXT-X-COMMENT:skip-discontinuity-inserted"));
    }

    #[test]
    fn test_skip_strips_cue_markers() {
        let input = "#EXTM3U\n\
                     #EXT-X-TARGETDURATION:10\n\
                     #EXT-X-CUE-OUT:DURATION=10.0\n\
                     #EXTINF:10.0,\nad1.ts\n\
                     #EXT-X-CUE-IN\n";
        let output = rewrite(input, BASE, RewriteMode::Skip);
        assert!(!output.contains("#EXT-X-CUE-OUT:"));
        for line in output.lines() {
            assert_ne!(line, "#EXT-X-CUE-IN");
        }
    }

    #[test]
    fn test_skip_uses_default_target_duration_before_tag() {
        // Cue before the TARGETDURATION tag uses the running default of 2s:
        // ceil(6/2) = 3 pairs, even though the tag later says 10.
        let input = "#EXTM3U\n\
                     #EXT-X-CUE-OUT:DURATION=6.0\n\
                     #EXTINF:2.0,\nad1.ts\n\
                     #EXTINF:2.0,\nad2.ts\n\
                     #EXTINF:2.0,\nad3.ts\n\
                     #EXT-X-TARGETDURATION:10\n\
                     #EXTINF:10.0,\ncontent1.ts\n";
        let output = rewrite(input, BASE, RewriteMode::Skip);
        assert!(output.contains("#EXT-X-COMMENT:skip-start,segments=3"));
        assert!(!output.contains("ad3.ts"));
        assert!(output.contains("content1.ts"));
    }

    #[test]
    fn test_cue_in_resets_even_without_cue_out() {
        let input = "#EXTM3U\n#EXT-X-CUE-IN\n#EXTINF:2.0,\ncontent1.ts\n";
        let output = rewrite(input, BASE, RewriteMode::Skip);
        assert!(output.contains("#EXT-X-COMMENT:skip-end"));
        assert!(output.contains("content1.ts"));
        assert!(!output.contains("#EXT-X-DISCONTINUITY"));
    }

    #[test]
    fn test_cue_out_without_duration_starts_no_skip_run() {
        let input = "#EXTM3U\n#EXT-X-CUE-OUT\n#EXTINF:2.0,\nseg1.ts\n";
        let output = rewrite(input, BASE, RewriteMode::Skip);
        assert!(output.contains("#EXT-X-COMMENT:annot=cue-detected,type=CUE_OUT\n"));
        // Marker stripped, but with no known duration nothing is skipped
        assert!(!output.contains("#EXT-X-CUE-OUT\n"));
        assert!(output.contains("seg1.ts"));
        assert!(!output.contains("#EXT-X-DISCONTINUITY"));
    }

    #[test]
    fn test_scte35_in_skip_mode_annotated_and_stripped() {
        let input = "#EXTM3U\n#EXT-X-SCTE35:CUE=\"abc\"\n#EXTINF:2.0,\nseg1.ts\n";
        let output = rewrite(input, BASE, RewriteMode::Skip);
        assert!(output.contains("annot=cue-detected,type=SCTE35"));
        assert!(!output.contains("#EXT-X-SCTE35"));
        assert!(output.contains("seg1.ts"));
    }

    #[test]
    fn test_daterange_in_skip_mode_passes_through() {
        let input = "#EXTM3U\n#EXT-X-DATERANGE:ID=\"ad\",SCTE35-OUT=0xFC30\n#EXTINF:2.0,\nseg1.ts\n";
        let output = rewrite(input, BASE, RewriteMode::Skip);
        assert!(output.contains("annot=cue-detected,type=DATERANGE"));
        assert!(output.contains("#EXT-X-DATERANGE:ID=\"ad\",SCTE35-OUT=0xFC30"));
        assert!(output.contains("seg1.ts"));
    }

    #[test]
    fn test_mode_from_config() {
        let annotate = RewriteConfig { skip_ads: false };
        let skip = RewriteConfig { skip_ads: true };
        assert_eq!(RewriteMode::from(&annotate), RewriteMode::Annotate);
        assert_eq!(RewriteMode::from(&skip), RewriteMode::Skip);
    }
}
