//! The equation pipeline, stage by stage.
//!
//! ```text
//! text ──> scan ──> render (canvas | latex) ──> compose ──> encode
//!            │            │                        │           │
//!       EquationMatch  RgbaImage            ContentItem   HTML / docx
//! ```
//!
//! Stages are plain functions over owned data; the orchestration (ordering,
//! per-equation error recovery, stats) lives in [`crate::convert`].

pub mod canvas;
pub mod compose;
pub mod encode;
pub mod latex;
pub mod render;
pub mod scan;
