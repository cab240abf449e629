//! Configuration types for the equation-rendering pipeline.
//!
//! All rendering behaviour is controlled through [`RenderConfig`], built via
//! its [`RenderConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across threads, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! Validation happens at build time: a `RenderConfig` that exists is a
//! `RenderConfig` the renderer will accept. Font size and DPI limits are
//! enforced here so no out-of-range value ever reaches a backend.

use crate::error::TexClipError;
use serde::{Deserialize, Serialize};

/// Which rasterisation backend turns an equation string into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderBackend {
    /// Draw the equation onto an in-process offscreen canvas using a system
    /// serif font. No external tools required. (default)
    #[default]
    Canvas,
    /// Compile a standalone document with the external `latex` toolchain and
    /// convert the DVI to a transparent PNG with `dvipng`. Produces real
    /// typeset output but needs a TeX distribution on PATH.
    Latex,
}

impl RenderBackend {
    /// Stable lowercase name, used in logs and the preferences file.
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderBackend::Canvas => "canvas",
            RenderBackend::Latex => "latex",
        }
    }
}

impl std::str::FromStr for RenderBackend {
    type Err = TexClipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "canvas" => Ok(RenderBackend::Canvas),
            "latex" => Ok(RenderBackend::Latex),
            other => Err(TexClipError::InvalidConfig(format!(
                "Unknown backend '{other}' (expected 'canvas' or 'latex')"
            ))),
        }
    }
}

/// Configuration for one pipeline run.
///
/// Built via [`RenderConfig::builder()`] or using
/// [`RenderConfig::default()`].
///
/// # Example
/// ```rust
/// use texclip::RenderConfig;
///
/// let config = RenderConfig::builder()
///     .dpi(300)
///     .font_size(14)
///     .color("black")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Rasterisation backend. Default: [`RenderBackend::Canvas`].
    pub backend: RenderBackend,

    /// Equation foreground colour: a named colour (`white`, `black`, `red`,
    /// `blue`, `green`) or a `#rrggbb` hex value. Default: `white`.
    ///
    /// White is the default because the fragment is most often pasted into
    /// dark-themed chat and note applications; the transparent background
    /// means a black default would vanish there.
    pub color: String,

    /// Base font size in points. Range: 10–50. Default: 12.
    pub font_size: u32,

    /// Rendering DPI. Range: 100–600. Default: 300.
    ///
    /// 300 keeps equations crisp when pasted into documents that re-scale
    /// images down; 100 is adequate for on-screen chat. The effective glyph
    /// size scales with DPI (see [`RenderConfig::scaled_font_size`]), so high
    /// DPI costs render time and memory, not layout changes.
    pub dpi: u32,

    /// Emit only the rendered images, with no interleaved text, in the HTML
    /// fragment and document export. Default: false.
    pub only_images: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: RenderBackend::Canvas,
            color: "white".to_string(),
            font_size: 12,
            dpi: 300,
            only_images: false,
        }
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }

    /// Effective glyph size in pixels: the configured point size scaled by
    /// `dpi / 100`, matching how both backends interpret font size.
    pub fn scaled_font_size(&self) -> f32 {
        self.font_size as f32 * (self.dpi as f32 / 100.0)
    }

    /// Crop padding in pixels applied around the opaque bounding box.
    pub fn crop_padding(&self) -> u32 {
        (self.dpi / 20).max(5)
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn backend(mut self, backend: RenderBackend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.config.color = color.into();
        self
    }

    pub fn font_size(mut self, pt: u32) -> Self {
        self.config.font_size = pt;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn only_images(mut self, v: bool) -> Self {
        self.config.only_images = v;
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Font size and DPI ranges are hard limits from the rendering contract,
    /// not clamped defaults: an out-of-range value is a caller mistake that
    /// must surface before any rendering starts.
    pub fn build(self) -> Result<RenderConfig, TexClipError> {
        let c = &self.config;
        if !(10..=50).contains(&c.font_size) {
            return Err(TexClipError::FontSizeOutOfRange {
                value: c.font_size,
            });
        }
        if !(100..=600).contains(&c.dpi) {
            return Err(TexClipError::DpiOutOfRange { value: c.dpi });
        }
        if c.color.trim().is_empty() {
            return Err(TexClipError::InvalidConfig(
                "Colour must be non-empty".into(),
            ));
        }
        Ok(self.config)
    }
}
