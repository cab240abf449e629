//! External-toolchain backend: `latex` + `dvipng`.
//!
//! Each equation is compiled as its own standalone preview document inside a
//! fresh scratch directory, then converted to a transparent PNG at the
//! configured DPI. The scratch directory (tex/dvi/aux/log/png) is removed
//! when the `TempDir` drops, on success and failure alike.
//!
//! Both tools run with stdout/stderr captured; a non-zero exit turns into a
//! per-equation error carrying the tail of the tool's output, which is where
//! latex puts the actually useful line.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::pipeline::render::MathBackend;
use image::RgbaImage;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// How much captured tool output to keep in an error message.
const OUTPUT_TAIL_BYTES: usize = 600;

/// Backend shelling out to `latex` and `dvipng`. Stateless.
pub struct LatexBackend;

impl MathBackend for LatexBackend {
    fn name(&self) -> &'static str {
        "latex"
    }

    fn rasterise(
        &self,
        equation: &str,
        config: &RenderConfig,
    ) -> Result<RgbaImage, RenderError> {
        let io_err = |detail: String| RenderError::Io {
            equation: equation.to_string(),
            detail,
        };

        let dir = tempfile::tempdir().map_err(|e| io_err(format!("tempdir: {e}")))?;
        let tex_path = dir.path().join("equation.tex");
        let dvi_path = dir.path().join("equation.dvi");
        let png_path = dir.path().join("equation.png");

        let document = tex_document(equation, config)?;
        std::fs::write(&tex_path, document)
            .map_err(|e| io_err(format!("write {}: {e}", tex_path.display())))?;

        run_tool(
            Command::new("latex")
                .arg("-interaction=nonstopmode")
                .arg("-halt-on-error")
                .arg("-output-directory")
                .arg(dir.path())
                .arg(&tex_path),
            "latex",
        )
        .map_err(|detail| RenderError::LatexFailed {
            equation: equation.to_string(),
            detail,
        })?;

        run_tool(
            Command::new("dvipng")
                .arg("-D")
                .arg(config.dpi.to_string())
                .arg("-T")
                .arg("tight")
                .arg("-bg")
                .arg("Transparent")
                .arg("-o")
                .arg(&png_path)
                .arg(&dvi_path),
            "dvipng",
        )
        .map_err(|detail| RenderError::DvipngFailed {
            equation: equation.to_string(),
            detail,
        })?;

        debug!(path = %png_path.display(), "decoding dvipng output");
        decode_png(&png_path, equation)
    }
}

/// True when both external tools are reachable on PATH. Used by callers to
/// warn up-front instead of failing per equation.
pub fn latex_toolchain_available() -> bool {
    let probe = |tool: &str| {
        Command::new(tool)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    };
    probe("latex") && probe("dvipng")
}

/// Build the standalone preview document for one equation.
fn tex_document(equation: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let size = config.scaled_font_size();
    let baseline = size * 1.2;
    let color_cmd = latex_color_command(&config.color).ok_or_else(|| RenderError::BadColor {
        color: config.color.clone(),
    })?;
    Ok(format!(
        "\\documentclass[preview,border=2pt]{{standalone}}\n\
         \\usepackage{{amsmath}}\n\
         \\usepackage{{amssymb}}\n\
         \\usepackage{{xcolor}}\n\
         \\begin{{document}}\n\
         \\fontsize{{{size:.1}pt}}{{{baseline:.1}pt}}\\selectfont\n\
         {color_cmd}\n\
         ${equation}$\n\
         \\end{{document}}\n"
    ))
}

/// Map the configured colour to an xcolor command: named colours pass
/// through, `#rrggbb` becomes a `\definecolor` pair.
fn latex_color_command(color: &str) -> Option<String> {
    let c = color.trim();
    if let Some(hex) = c.strip_prefix('#') {
        if hex.len() == 6 && hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Some(format!(
                "\\definecolor{{texclipfg}}{{HTML}}{{{}}}\\color{{texclipfg}}",
                hex.to_uppercase()
            ));
        }
        return None;
    }
    // Same names the canvas backend accepts; all are xcolor base colours.
    crate::pipeline::render::parse_color(c)?;
    Some(format!("\\color{{{}}}", c.to_lowercase()))
}

fn run_tool(command: &mut Command, tool: &str) -> Result<(), String> {
    let output = command
        .output()
        .map_err(|e| format!("failed to spawn {tool}: {e}"))?;
    if output.status.success() {
        return Ok(());
    }
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    let tail = tail_of(&combined, OUTPUT_TAIL_BYTES);
    Err(format!("{tool} exited with {}: {tail}", output.status))
}

fn tail_of(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s.trim();
    }
    let mut cut = s.len() - max;
    while !s.is_char_boundary(cut) {
        cut += 1;
    }
    s[cut..].trim()
}

fn decode_png(path: &Path, equation: &str) -> Result<RgbaImage, RenderError> {
    let img = image::open(path).map_err(|e| RenderError::DecodeFailed {
        equation: equation.to_string(),
        detail: e.to_string(),
    })?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RenderBackend, RenderConfig};

    fn e2e_enabled() -> bool {
        std::env::var("TEXCLIP_E2E").is_ok() && latex_toolchain_available()
    }

    #[test]
    fn document_embeds_scaled_font_size() {
        let cfg = RenderConfig::builder()
            .font_size(10)
            .dpi(200)
            .color("black")
            .build()
            .unwrap();
        let doc = tex_document("x^2", &cfg).unwrap();
        assert!(doc.contains("\\fontsize{20.0pt}{24.0pt}"), "got: {doc}");
        assert!(doc.contains("$x^2$"));
        assert!(doc.contains("\\color{black}"));
    }

    #[test]
    fn hex_color_becomes_definecolor() {
        let cmd = latex_color_command("#1a2b3c").unwrap();
        assert!(cmd.contains("\\definecolor{texclipfg}{HTML}{1A2B3C}"));
        assert!(latex_color_command("#12345").is_none());
        assert!(latex_color_command("hotpink").is_none());
    }

    #[test]
    fn tail_keeps_end_of_long_output() {
        let long = "a".repeat(1000) + "the error line";
        let tail = tail_of(&long, 100);
        assert!(tail.ends_with("the error line"));
        assert!(tail.len() <= 100);
    }

    #[test]
    fn renders_real_equation_via_toolchain() {
        if !e2e_enabled() {
            eprintln!("skipping: set TEXCLIP_E2E=1 with latex+dvipng on PATH");
            return;
        }
        let cfg = RenderConfig::builder()
            .backend(RenderBackend::Latex)
            .color("black")
            .build()
            .unwrap();
        let img = LatexBackend.rasterise(r"\frac{a}{b}", &cfg).unwrap();
        assert!(img.pixels().any(|p| p.0[3] > 0));
    }
}
