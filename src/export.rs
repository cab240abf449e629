//! Document export: composed content to a `.docx` file.
//!
//! Each [`DocBlock`] becomes one paragraph: text runs at the configured
//! size, pictures at a fixed 300pt width. Word measures embedded images in
//! EMUs (914400 per inch, 12700 per point), so point sizes are converted at
//! the boundary and nowhere else.

use crate::error::TexClipError;
use crate::pipeline::compose::DocBlock;
use docx_rs::{Docx, Paragraph, Pic, Run};
use std::path::Path;
use tracing::info;

const EMU_PER_PT: u32 = 12_700;

/// Write `blocks` to a docx file at `path`.
pub fn write_docx(blocks: &[DocBlock], path: &Path) -> Result<(), TexClipError> {
    let export_err = |detail: String| TexClipError::ExportFailed {
        path: path.to_path_buf(),
        detail,
    };

    let mut docx = Docx::new();
    for block in blocks {
        let paragraph = match block {
            DocBlock::Paragraph { text, font_size_pt } => Paragraph::new().add_run(
                // Run size is in half-points.
                Run::new().add_text(text.as_str()).size(*font_size_pt as usize * 2),
            ),
            DocBlock::Picture {
                png,
                width_pt,
                height_pt,
            } => {
                let pic = Pic::new(png).size(width_pt * EMU_PER_PT, height_pt * EMU_PER_PT);
                Paragraph::new().add_run(Run::new().add_image(pic))
            }
        };
        docx = docx.add_paragraph(paragraph);
    }

    let file = std::fs::File::create(path).map_err(|e| export_err(e.to_string()))?;
    docx.build()
        .pack(file)
        .map_err(|e| export_err(e.to_string()))?;
    info!(path = %path.display(), blocks = blocks.len(), "document exported");
    Ok(())
}
