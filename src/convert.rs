//! Pipeline orchestration: one text snapshot in, one [`PipelineOutput`] out.
//!
//! This is the seam every frontend goes through: the CLI, the clipboard
//! monitor, and the document exporter all call [`process_text`] and differ
//! only in where the text comes from and where the output goes.

use crate::config::RenderConfig;
use crate::error::TexClipError;
use crate::output::{EquationRender, PipelineOutput, PipelineStats};
use crate::pipeline::compose::{compose, html_fragment, ComposeMode};
use crate::pipeline::{render, scan};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Run the full pipeline over `text`: scan, render, compose, serialise.
///
/// Individual render failures are logged and skipped; the call only fails
/// when there is nothing to work with (empty input, no equations) or when
/// nothing worked (every render failed).
pub fn process_text(
    text: &str,
    config: &RenderConfig,
) -> Result<PipelineOutput, TexClipError> {
    process_text_with(text, config, |_, _| {})
}

/// Like [`process_text`], invoking `on_progress(done, total)` after each
/// render attempt. Used by the CLI progress bar.
pub fn process_text_with(
    text: &str,
    config: &RenderConfig,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<PipelineOutput, TexClipError> {
    if text.trim().is_empty() {
        return Err(TexClipError::EmptyInput);
    }

    let total_start = Instant::now();

    // Stage 1: scan.
    let scan_start = Instant::now();
    let matches = scan::scan(text);
    let scan_duration = scan_start.elapsed();
    if matches.is_empty() {
        return Err(TexClipError::NoEquationsFound);
    }
    info!(
        equations = matches.len(),
        duration_ms = scan_duration.as_millis() as u64,
        "scan complete"
    );

    // Stage 2: render, recovering per equation.
    let render_start = Instant::now();
    let total = matches.len();
    let mut renders = Vec::with_capacity(total);
    let mut first_error: Option<String> = None;
    for (idx, matched) in matches.into_iter().enumerate() {
        let result = render::render(&matched.equation, config);
        match result {
            Ok(image) => {
                debug!(equation = %matched.equation, "rendered");
                renders.push(EquationRender {
                    matched,
                    image: Some(image),
                    error: None,
                });
            }
            Err(err) => {
                warn!(equation = %matched.equation, error = %err, "render failed, skipping equation");
                if first_error.is_none() {
                    first_error = Some(err.to_string());
                }
                renders.push(EquationRender {
                    matched,
                    image: None,
                    error: Some(err),
                });
            }
        }
        on_progress(idx + 1, total);
    }
    let render_duration = render_start.elapsed();

    let rendered = renders.iter().filter(|r| r.succeeded()).count();
    let failed = total - rendered;
    if rendered == 0 {
        return Err(TexClipError::AllRendersFailed {
            total,
            first_error: first_error.unwrap_or_else(|| "unknown".into()),
        });
    }

    // Stage 3: compose and serialise.
    let compose_start = Instant::now();
    let mode = if config.only_images {
        ComposeMode::ImagesOnly
    } else {
        ComposeMode::Interleaved
    };
    let items = compose(text, &renders, mode)?;
    let html = html_fragment(&items, config)?;
    let compose_duration = compose_start.elapsed();

    let stats = PipelineStats {
        equations_found: total,
        rendered,
        failed,
        scan_duration_ms: scan_duration.as_millis() as u64,
        render_duration_ms: render_duration.as_millis() as u64,
        compose_duration_ms: compose_duration.as_millis() as u64,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        rendered,
        failed,
        total_ms = stats.total_duration_ms,
        "pipeline complete"
    );

    Ok(PipelineOutput {
        html,
        items,
        renders,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_rejected() {
        let cfg = RenderConfig::default();
        assert!(matches!(
            process_text("", &cfg),
            Err(TexClipError::EmptyInput)
        ));
        assert!(matches!(
            process_text("   \n\t ", &cfg),
            Err(TexClipError::EmptyInput)
        ));
    }

    #[test]
    fn text_without_equations_rejected() {
        let cfg = RenderConfig::default();
        assert!(matches!(
            process_text("no math here, just words", &cfg),
            Err(TexClipError::NoEquationsFound)
        ));
    }

    #[test]
    fn all_failures_surface_first_error() {
        // An unknown colour makes every render fail before drawing anything,
        // without needing fonts or a latex toolchain installed.
        let mut cfg = RenderConfig::default();
        cfg.color = "not-a-colour".into();
        let err = process_text(r"\(a\) and \(b\)", &cfg).unwrap_err();
        match err {
            TexClipError::AllRendersFailed { total, first_error } => {
                assert_eq!(total, 2);
                assert!(first_error.contains("not-a-colour"), "got: {first_error}");
            }
            other => panic!("expected AllRendersFailed, got {other}"),
        }
    }

    #[test]
    fn progress_callback_sees_every_attempt() {
        let mut cfg = RenderConfig::default();
        cfg.color = "not-a-colour".into(); // force fast failures
        let mut seen = Vec::new();
        let _ = process_text_with(r"\(a\) \(b\) \(c\)", &cfg, |done, total| {
            seen.push((done, total));
        });
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    }
}
