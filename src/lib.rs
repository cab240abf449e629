//! # texclip
//!
//! Detect LaTeX equations in plain text, rasterise them, and compose
//! rich-text output for the clipboard or a document.
//!
//! ## Why this crate?
//!
//! Chat assistants and note tools emit answers full of raw LaTeX —
//! `\(x^2\)`, `\[\sum M_A = 0\]` — which pastes as unreadable markup
//! everywhere else. This crate finds those spans, renders each one to a
//! transparent PNG, and re-assembles the text with the images inlined, so a
//! single paste lands readable prose with typeset math.
//!
//! ## Pipeline Overview
//!
//! ```text
//! text
//!  │
//!  ├─ 1. Scan     five delimiter conventions, pooled and sorted by start
//!  ├─ 2. Render   canvas (in-process) or latex+dvipng (external toolchain)
//!  ├─ 3. Compose  interleave text runs with equation images
//!  └─ 4. Output   HTML fragment (clipboard) or docx blocks (export)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use texclip::{process_text, RenderConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RenderConfig::builder().color("black").dpi(200).build()?;
//!     let output = process_text(r"Euler: \(e^{i\pi} + 1 = 0\)", &config)?;
//!     println!("{}", output.html);
//!     eprintln!("rendered {} of {} equations",
//!         output.stats.rendered, output.stats.equations_found);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `texclip` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! texclip = { version = "0.3", default-features = false }
//! ```
//!
//! ## Choosing a Backend
//!
//! | Backend  | Needs | Output |
//! |----------|-------|--------|
//! | `canvas` | an installed serif font | equation text drawn verbatim (default) |
//! | `latex`  | `latex` + `dvipng` on PATH | real typeset math |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod clipboard;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod monitor;
pub mod output;
pub mod pipeline;
pub mod prefs;
pub mod sample;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use clipboard::{FragmentSink, SystemClipboard, TextSource};
pub use config::{RenderBackend, RenderConfig, RenderConfigBuilder};
pub use convert::{process_text, process_text_with};
pub use error::{RenderError, TexClipError};
pub use export::write_docx;
pub use monitor::MonitorHandle;
pub use output::{ContentItem, EquationRender, PipelineOutput, PipelineStats};
pub use pipeline::compose::{ComposeMode, DocBlock};
pub use pipeline::latex::latex_toolchain_available;
pub use pipeline::scan::{scan, EquationMatch};
pub use prefs::{Preferences, DEFAULT_PREFS_PATH};
pub use sample::SAMPLE_TEXT;
