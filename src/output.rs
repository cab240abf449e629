//! Output types produced by the pipeline.
//!
//! Everything here is owned data created fresh per pipeline invocation and
//! discarded after the consuming composition step; nothing is persisted and
//! nothing is shared across invocations.

use crate::error::RenderError;
use crate::pipeline::scan::EquationMatch;
use image::RgbaImage;
use serde::Serialize;

/// One equation's render attempt, carrying the originating match alongside
/// the result.
///
/// Pairing match and image by identity (rather than positionally zipping a
/// filtered image list against the match list) means a failed render in the
/// middle of a text cannot shift later images onto the wrong spans: each span
/// either has its own image or has none.
#[derive(Debug, Clone)]
pub struct EquationRender {
    /// The scanned span this render belongs to.
    pub matched: EquationMatch,
    /// The post-processed raster, absent when the render failed.
    pub image: Option<RgbaImage>,
    /// Why the render failed, when it did.
    pub error: Option<RenderError>,
}

impl EquationRender {
    /// True when this attempt produced a usable image.
    pub fn succeeded(&self) -> bool {
        self.image.is_some()
    }
}

/// A single element of the composed document: either a run of the original
/// text or a rendered equation image. Items are never mutated after
/// construction; the ordered sequence IS the document.
#[derive(Debug, Clone)]
pub enum ContentItem {
    Text(String),
    Image(RgbaImage),
}

/// Result of one full pipeline run over a text snapshot.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Inline rich-text fragment ready for the clipboard writer.
    pub html: String,
    /// The ordered composed sequence, for callers that serialise it
    /// themselves (e.g. the document exporter).
    pub items: Vec<ContentItem>,
    /// Per-equation render outcomes, successes and failures alike.
    pub renders: Vec<EquationRender>,
    /// Counters and timings for this run.
    pub stats: PipelineStats,
}

/// Counters and timings for one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    /// Number of equation spans the scanner found.
    pub equations_found: usize,
    /// Renders that produced a usable image.
    pub rendered: usize,
    /// Renders that failed (logged, skipped).
    pub failed: usize,
    pub scan_duration_ms: u64,
    pub render_duration_ms: u64,
    pub compose_duration_ms: u64,
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_without_image_is_failure() {
        let r = EquationRender {
            matched: EquationMatch {
                start: 0,
                end: 7,
                equation: "x^2".into(),
                is_display: false,
                raw_span: "\\(x^2\\)".into(),
            },
            image: None,
            error: Some(RenderError::BlankImage {
                equation: "x^2".into(),
            }),
        };
        assert!(!r.succeeded());
    }

    #[test]
    fn stats_serialise_to_json() {
        let stats = PipelineStats {
            equations_found: 4,
            rendered: 3,
            failed: 1,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).expect("stats must serialise");
        assert!(json.contains("\"equations_found\":4"));
        assert!(json.contains("\"failed\":1"));
    }
}
