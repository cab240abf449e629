//! Error types for the texclip library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`TexClipError`] — **Fatal**: the pipeline cannot proceed at all
//!   (invalid configuration, no equations found, every render failed).
//!   Returned as `Err(TexClipError)` from the top-level entry points.
//!
//! * [`RenderError`] — **Non-fatal**: a single equation failed to rasterise
//!   (backend exception, external toolchain exit status, blank output) but
//!   the remaining equations are fine. Stored inside
//!   [`crate::output::EquationRender`] so callers can inspect partial
//!   success rather than losing the whole snapshot to one bad span.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! failed equation, log and continue, or collect all failures for a report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the texclip library.
///
/// Per-equation failures use [`RenderError`] and are stored in
/// [`crate::output::EquationRender`] rather than propagated here.
#[derive(Debug, Error)]
pub enum TexClipError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input text was empty or whitespace-only.
    #[error("Input text is empty")]
    EmptyInput,

    /// The scanner found no equation spans in the text.
    #[error("No LaTeX equations found in the input text")]
    NoEquationsFound,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Font size outside the accepted 10–50 pt range.
    #[error("Font size must be 10-50, got {value}")]
    FontSizeOutOfRange { value: u32 },

    /// DPI outside the accepted 100–600 range.
    #[error("DPI must be 100-600, got {value}")]
    DpiOutOfRange { value: u32 },

    /// Builder validation failed for some other reason.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pipeline errors ───────────────────────────────────────────────────
    /// Every equation failed to render; there is nothing to compose.
    #[error("All {total} equations failed to render.\nFirst error: {first_error}")]
    AllRendersFailed { total: usize, first_error: String },

    /// A match span points outside the scanned text. Scanning and
    /// composition run over the same string, so this indicates an upstream
    /// contract violation and is reported loudly instead of recovered.
    #[error("Equation span {start}..{end} is out of bounds for text of length {len}")]
    SpanOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    // ── Collaborator errors ───────────────────────────────────────────────
    /// Platform clipboard could not be opened or written.
    #[error("Clipboard access failed: {detail}")]
    Clipboard { detail: String },

    /// Refused to install an empty rich-text fragment on the clipboard.
    #[error("Refusing to copy an empty HTML fragment to the clipboard")]
    EmptyFragment,

    /// Could not create or write the exported document.
    #[error("Failed to write document '{path}': {detail}")]
    ExportFailed { path: PathBuf, detail: String },

    /// Could not read or write the preferences file.
    #[error("Preferences I/O failed for '{path}': {source}")]
    PrefsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single equation render.
///
/// Stored alongside [`crate::output::EquationRender`] when a render fails.
/// The overall pipeline continues unless ALL equations fail.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// No usable font could be discovered for the canvas backend.
    #[error("No serif font available for canvas rendering: {detail}")]
    FontUnavailable { detail: String },

    /// Post-processing found no visible pixels (or fewer than the minimum).
    #[error("Rendered image is blank for equation '{equation}'")]
    BlankImage { equation: String },

    /// The external `latex` compile step exited non-zero.
    #[error("latex failed for equation '{equation}': {detail}")]
    LatexFailed { equation: String, detail: String },

    /// The external `dvipng` conversion step exited non-zero.
    #[error("dvipng failed for equation '{equation}': {detail}")]
    DvipngFailed { equation: String, detail: String },

    /// Reading or decoding the produced raster failed.
    #[error("Failed to decode rendered image for '{equation}': {detail}")]
    DecodeFailed { equation: String, detail: String },

    /// The configured colour string is not a known name or hex value.
    #[error("Unrecognised colour '{color}'")]
    BadColor { color: String },

    /// Scratch-directory or file I/O failed during rendering.
    #[error("Render I/O failed for '{equation}': {detail}")]
    Io { equation: String, detail: String },
}
