//! Equation rasterisation: one equation string in, one transparent raster out.
//!
//! Two interchangeable backends implement [`MathBackend`]; which one runs is
//! a configuration choice, not a code path the pipeline branches on. Both
//! produce an oversized transparent raster that is then fed through the same
//! post-processing: opaque-bounding-box crop with padding, downscale to the
//! 1800x600 envelope, and a blank-output rejection.
//!
//! ## Failure model
//!
//! Rendering is the only stage that can fail per-equation, and every failure
//! is recovered locally: the caller receives `Err(RenderError)`, logs it, and
//! continues with the remaining equations. Nothing in this module panics on
//! bad input or a missing external toolchain.

use crate::config::{RenderBackend, RenderConfig};
use crate::error::RenderError;
use crate::pipeline::{canvas::CanvasBackend, latex::LatexBackend};
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use tracing::debug;

/// Maximum post-crop width in pixels.
pub const MAX_WIDTH: u32 = 1800;
/// Maximum post-crop height in pixels.
pub const MAX_HEIGHT: u32 = 600;
/// Images with fewer visible pixels than this are treated as failed renders;
/// it catches whitespace-only equations that still produced a bounding box.
pub const MIN_OPAQUE_PIXELS: usize = 100;

/// A rasterisation backend: turns an equation string into an uncropped
/// transparent raster. Post-processing is shared and lives outside the trait
/// so backends cannot diverge on crop/clamp behaviour.
pub trait MathBackend: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Draw `equation` onto a transparent canvas per `config`.
    fn rasterise(&self, equation: &str, config: &RenderConfig)
        -> Result<RgbaImage, RenderError>;
}

static CANVAS: CanvasBackend = CanvasBackend;
static LATEX: LatexBackend = LatexBackend;

fn backend_for(choice: RenderBackend) -> &'static dyn MathBackend {
    match choice {
        RenderBackend::Canvas => &CANVAS,
        RenderBackend::Latex => &LATEX,
    }
}

/// Render one equation to a tightly cropped, size-bounded transparent image.
///
/// Dispatches to the configured backend, then applies the shared
/// post-processing. The returned image never exceeds
/// [`MAX_WIDTH`]x[`MAX_HEIGHT`] and always contains at least
/// [`MIN_OPAQUE_PIXELS`] visible pixels.
pub fn render(equation: &str, config: &RenderConfig) -> Result<RgbaImage, RenderError> {
    let backend = backend_for(config.backend);
    let raw = backend.rasterise(equation, config)?;
    debug!(
        backend = backend.name(),
        width = raw.width(),
        height = raw.height(),
        "rasterised equation"
    );
    let out = postprocess(&raw, config.crop_padding(), equation)?;
    debug!(
        width = out.width(),
        height = out.height(),
        "post-processed equation image"
    );
    Ok(out)
}

// ── Shared post-processing ───────────────────────────────────────────────

/// Crop to the opaque bounding box plus `padding`, clamp into the
/// 1800x600 envelope, and reject blank output.
pub(crate) fn postprocess(
    img: &RgbaImage,
    padding: u32,
    equation: &str,
) -> Result<RgbaImage, RenderError> {
    let (left, top, right, bottom) =
        opaque_bbox(img).ok_or_else(|| RenderError::BlankImage {
            equation: equation.to_string(),
        })?;

    let x0 = left.saturating_sub(padding);
    let y0 = top.saturating_sub(padding);
    let x1 = (right + padding).min(img.width());
    let y1 = (bottom + padding).min(img.height());
    let mut out = image::imageops::crop_imm(img, x0, y0, x1 - x0, y1 - y0).to_image();

    if out.width() > MAX_WIDTH || out.height() > MAX_HEIGHT {
        let (w, h) = bounded_dimensions(out.width(), out.height());
        out = image::imageops::resize(&out, w, h, FilterType::Lanczos3);
    }

    if opaque_pixel_count(&out) < MIN_OPAQUE_PIXELS {
        return Err(RenderError::BlankImage {
            equation: equation.to_string(),
        });
    }

    Ok(out)
}

/// Tightest box containing any non-fully-transparent pixel, as
/// `(left, top, right, bottom)` with exclusive right/bottom.
fn opaque_bbox(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x + 1, y + 1),
            Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x + 1), b.max(y + 1)),
        });
    }
    bounds
}

fn opaque_pixel_count(img: &RgbaImage) -> usize {
    img.pixels().filter(|p| p.0[3] > 0).count()
}

/// Aspect-preserving dimensions within the envelope: the binding dimension
/// becomes exactly its maximum, the other is scaled and rounded.
fn bounded_dimensions(width: u32, height: u32) -> (u32, u32) {
    let wscale = MAX_WIDTH as f64 / width as f64;
    let hscale = MAX_HEIGHT as f64 / height as f64;
    if wscale <= hscale {
        let h = (height as f64 * wscale).round().max(1.0) as u32;
        (MAX_WIDTH, h)
    } else {
        let w = (width as f64 * hscale).round().max(1.0) as u32;
        (w, MAX_HEIGHT)
    }
}

// ── Colour handling ──────────────────────────────────────────────────────

/// Colour names accepted by both backends. These are the xcolor base names
/// the latex backend passes through verbatim.
const NAMED_COLORS: [(&str, [u8; 3]); 5] = [
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("blue", [0, 0, 255]),
    ("green", [0, 128, 0]),
];

/// Parse a colour name or `#rrggbb` hex value into an opaque RGBA pixel.
pub(crate) fn parse_color(color: &str) -> Option<Rgba<u8>> {
    let c = color.trim();
    if let Some(hex) = c.strip_prefix('#') {
        if hex.len() == 6 && hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Rgba([r, g, b, 255]));
        }
        return None;
    }
    let lower = c.to_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, [r, g, b])| Rgba([*r, *g, *b, 255]))
}
