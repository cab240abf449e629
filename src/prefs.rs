//! Persisted user preferences.
//!
//! Preferences are a small JSON file, loaded leniently (a missing or corrupt
//! file falls back to defaults with a log line, never an error) and saved
//! strictly. Loading is lenient because preferences are a convenience, not
//! an input: refusing to start over a stale file would be worse than running
//! with defaults. Unknown keys are ignored and missing keys take their
//! defaults, so the file survives version skew in both directions.

use crate::config::{RenderBackend, RenderConfig};
use crate::error::TexClipError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Default preferences location, relative to the working directory.
pub const DEFAULT_PREFS_PATH: &str = "configs/defaults.json";

/// User-facing defaults, persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Rendering backend.
    pub mode: RenderBackend,
    /// Equation foreground colour.
    pub text_color: String,
    /// Base font size in points.
    pub font_size: u32,
    /// Rendering DPI.
    pub dpi: u32,
    /// Emit images only, dropping interleaved text.
    pub only_images: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        let cfg = RenderConfig::default();
        Self {
            mode: cfg.backend,
            text_color: cfg.color,
            font_size: cfg.font_size,
            dpi: cfg.dpi,
            only_images: cfg.only_images,
        }
    }
}

impl Preferences {
    /// Load preferences from `path`, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preferences file, using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read preferences, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "preferences file is corrupt, using defaults");
                Self::default()
            }
        }
    }

    /// Write preferences to `path` as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), TexClipError> {
        let prefs_io = |source: std::io::Error| TexClipError::PrefsIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(prefs_io)?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TexClipError::Internal(format!("serialise preferences: {e}")))?;
        std::fs::write(path, json).map_err(prefs_io)?;
        debug!(path = %path.display(), "preferences saved");
        Ok(())
    }

    /// Convert to a validated [`RenderConfig`]. Range checks happen here, so
    /// a hand-edited file with a wild DPI fails loudly instead of rendering
    /// at it.
    pub fn to_render_config(&self) -> Result<RenderConfig, TexClipError> {
        RenderConfig::builder()
            .backend(self.mode)
            .color(self.text_color.clone())
            .font_size(self.font_size)
            .dpi(self.dpi)
            .only_images(self.only_images)
            .build()
    }
}
