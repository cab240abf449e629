//! In-process canvas backend: draws the equation with a system serif font.
//!
//! Why a canvas backend at all? The latex backend produces real typeset
//! output but requires a TeX distribution on PATH, which most machines do not
//! have. The canvas backend trades typographic fidelity for zero external
//! dependencies: the delimited equation is drawn verbatim, centred on a
//! 12x3-inch transparent canvas at the configured DPI, and the shared
//! post-processing crops it down exactly as it does for the latex output.
//!
//! Font discovery runs once per process: the system font database is scanned
//! for a serif face, preferring the widely installed families before falling
//! back to the platform's generic serif. `TEXCLIP_FONT` overrides discovery
//! with an explicit font file path, which CI uses to pin a known face.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::pipeline::render::{parse_color, MathBackend};
use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use once_cell::sync::Lazy;
use tracing::debug;

/// Canvas geometry in inches; pixel dimensions scale with DPI.
const CANVAS_WIDTH_IN: u32 = 12;
const CANVAS_HEIGHT_IN: u32 = 3;

/// Points-to-pixels at the 100 DPI baseline (96px per 72pt).
const PT_TO_PX: f32 = 96.0 / 72.0;

/// Env var naming a font file to use instead of system font discovery.
const FONT_OVERRIDE_VAR: &str = "TEXCLIP_FONT";

static SERIF_FONT: Lazy<Result<FontVec, String>> = Lazy::new(load_serif_font);

fn load_serif_font() -> Result<FontVec, String> {
    if let Ok(path) = std::env::var(FONT_OVERRIDE_VAR) {
        let bytes = std::fs::read(&path)
            .map_err(|e| format!("cannot read font file '{path}': {e}"))?;
        return FontVec::try_from_vec(bytes)
            .map_err(|e| format!("cannot parse font file '{path}': {e}"));
    }

    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let query = fontdb::Query {
        families: &[
            fontdb::Family::Name("DejaVu Serif"),
            fontdb::Family::Name("Liberation Serif"),
            fontdb::Family::Name("Times New Roman"),
            fontdb::Family::Serif,
        ],
        ..fontdb::Query::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| "no serif font installed".to_string())?;
    let loaded = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| "font face data unavailable".to_string())?;
    let (bytes, index) = loaded;
    debug!(face = ?db.face(id).map(|f| f.post_script_name.clone()), "loaded serif font");
    FontVec::try_from_vec_and_index(bytes, index).map_err(|e| format!("font parse failed: {e}"))
}

/// Offscreen-canvas backend. Stateless; the cached font is process-global.
pub struct CanvasBackend;

impl MathBackend for CanvasBackend {
    fn name(&self) -> &'static str {
        "canvas"
    }

    fn rasterise(
        &self,
        equation: &str,
        config: &RenderConfig,
    ) -> Result<RgbaImage, RenderError> {
        let color = parse_color(&config.color).ok_or_else(|| RenderError::BadColor {
            color: config.color.clone(),
        })?;
        let font = SERIF_FONT
            .as_ref()
            .map_err(|detail| RenderError::FontUnavailable {
                detail: detail.clone(),
            })?;

        let width = CANVAS_WIDTH_IN * config.dpi;
        let height = CANVAS_HEIGHT_IN * config.dpi;
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

        // The equation is drawn wrapped in single-dollar delimiters, the
        // same text form the latex backend typesets.
        let text = format!("${equation}$");
        let scale = PxScale::from(config.scaled_font_size() * PT_TO_PX);
        let (text_w, text_h) = text_size(scale, font, &text);

        let x = (width.saturating_sub(text_w) / 2) as i32;
        let y = (height.saturating_sub(text_h) / 2) as i32;
        draw_text_mut(&mut canvas, color, x, y, scale, font, &text);

        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;

    fn e2e_enabled() -> bool {
        std::env::var("TEXCLIP_E2E").is_ok()
    }

    #[test]
    fn canvas_dimensions_track_dpi() {
        if !e2e_enabled() {
            eprintln!("skipping: set TEXCLIP_E2E=1 (requires an installed serif font)");
            return;
        }
        let cfg = RenderConfig::builder().dpi(100).build().unwrap();
        let img = CanvasBackend.rasterise("x", &cfg).unwrap();
        assert_eq!((img.width(), img.height()), (1200, 300));
    }

    #[test]
    fn rasterised_equation_has_visible_pixels() {
        if !e2e_enabled() {
            eprintln!("skipping: set TEXCLIP_E2E=1 (requires an installed serif font)");
            return;
        }
        let cfg = RenderConfig::builder().color("black").build().unwrap();
        let img = CanvasBackend.rasterise("x^2 + y^2", &cfg).unwrap();
        let visible = img.pixels().filter(|p| p.0[3] > 0).count();
        assert!(visible > 100, "only {visible} visible pixels");
    }

    #[test]
    fn bad_color_fails_before_font_lookup() {
        let cfg = {
            let mut c = RenderConfig::default();
            c.color = "chartreuse".into();
            c
        };
        let err = CanvasBackend.rasterise("x", &cfg).unwrap_err();
        assert!(matches!(err, RenderError::BadColor { .. }));
    }
}
