//! Composition: interleave original text with rendered equation images and
//! serialise the result as an HTML fragment or paginated document blocks.
//!
//! The composer walks the text with a cursor and the match list sorted by
//! span start. Because each image travels with its own match (see
//! [`EquationRender`]), a failed render simply leaves its span as text; it
//! can never shift a later image onto the wrong span. Overlapping spans are
//! legal input: the cursor only moves forward, so the second of two
//! overlapping matches contributes its image with no preceding text run.

use crate::config::RenderConfig;
use crate::error::TexClipError;
use crate::output::{ContentItem, EquationRender};
use crate::pipeline::encode;

/// How text around equations is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeMode {
    /// Keep the surrounding text, replacing each rendered span with its
    /// image. Failed spans stay as text. (default)
    #[default]
    Interleaved,
    /// Emit only the rendered images, in text order, dropping all text.
    ImagesOnly,
}

/// Width of exported equation pictures in points.
pub const EXPORT_PICTURE_WIDTH_PT: u32 = 300;

/// One block of a paginated document export.
#[derive(Debug, Clone)]
pub enum DocBlock {
    /// A trimmed run of text at the configured font size.
    Paragraph { text: String, font_size_pt: u32 },
    /// A rendered equation as PNG bytes, sized in points.
    Picture {
        png: Vec<u8>,
        width_pt: u32,
        height_pt: u32,
    },
}

/// Interleave `text` with the rendered images.
///
/// `renders` must be ordered by match start (the pipeline guarantees this).
/// Span offsets are validated against `text`; a span pointing outside it is
/// an upstream contract violation and fails the whole composition.
pub fn compose(
    text: &str,
    renders: &[EquationRender],
    mode: ComposeMode,
) -> Result<Vec<ContentItem>, TexClipError> {
    let mut items = Vec::new();
    let mut cursor = 0usize;

    for render in renders {
        let m = &render.matched;
        if m.start > m.end || m.end > text.len() {
            return Err(TexClipError::SpanOutOfBounds {
                start: m.start,
                end: m.end,
                len: text.len(),
            });
        }
        let Some(image) = &render.image else {
            // Failed render: leave the span in place as ordinary text.
            continue;
        };
        match mode {
            ComposeMode::ImagesOnly => items.push(ContentItem::Image(image.clone())),
            ComposeMode::Interleaved => {
                if m.start > cursor {
                    items.push(ContentItem::Text(text[cursor..m.start].to_string()));
                }
                items.push(ContentItem::Image(image.clone()));
                cursor = cursor.max(m.end);
            }
        }
    }

    if mode == ComposeMode::Interleaved && cursor < text.len() {
        items.push(ContentItem::Text(text[cursor..].to_string()));
    }

    Ok(items)
}

// ── HTML fragment ────────────────────────────────────────────────────────

/// Serialise composed items as a self-contained HTML fragment.
///
/// Text runs are escaped with newlines turned into `<br>`; images are
/// embedded as base64 data URIs so the fragment has no external references.
/// The style header pins colour and font so paste targets that honour
/// source styling reproduce the configured look.
pub fn html_fragment(
    items: &[ContentItem],
    config: &RenderConfig,
) -> Result<String, TexClipError> {
    let mut html = String::with_capacity(4096);
    html.push_str(&format!(
        "<style>\
         body {{color: {color}; font-family: Arial, sans-serif; \
         font-size: {size}pt; line-height: 1.5;}}\
         p, div, span {{color: inherit !important;}}\
         img {{vertical-align: middle; margin: 2px 0;}}\
         </style>",
        color = config.color,
        size = config.font_size,
    ));

    for item in items {
        match item {
            ContentItem::Text(text) => {
                html.push_str("<span>");
                html.push_str(&escape_html(text).replace('\n', "<br>"));
                html.push_str("</span>");
            }
            ContentItem::Image(img) => {
                let uri = encode::data_uri(img)
                    .map_err(|e| TexClipError::Internal(format!("png encode: {e}")))?;
                html.push_str(&format!(
                    "<img src=\"{uri}\" style=\"vertical-align: middle; margin: 2px 0;\">"
                ));
            }
        }
    }

    Ok(html)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

// ── Document pagination ──────────────────────────────────────────────────

/// Turn composed items into document blocks for export.
///
/// Text runs are trimmed and become paragraphs (empty runs are dropped);
/// images become fixed-width pictures scaled to [`EXPORT_PICTURE_WIDTH_PT`]
/// points with aspect-preserving height.
pub fn paginate(
    items: &[ContentItem],
    font_size_pt: u32,
) -> Result<Vec<DocBlock>, TexClipError> {
    let mut blocks = Vec::new();
    for item in items {
        match item {
            ContentItem::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    blocks.push(DocBlock::Paragraph {
                        text: trimmed.to_string(),
                        font_size_pt,
                    });
                }
            }
            ContentItem::Image(img) => {
                let png = encode::png_bytes(img)
                    .map_err(|e| TexClipError::Internal(format!("png encode: {e}")))?;
                let height_pt = (EXPORT_PICTURE_WIDTH_PT as f64 * img.height() as f64
                    / img.width() as f64)
                    .round() as u32;
                blocks.push(DocBlock::Picture {
                    png,
                    width_pt: EXPORT_PICTURE_WIDTH_PT,
                    height_pt,
                });
            }
        }
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::scan::{scan, EquationMatch};
    use image::{Rgba, RgbaImage};

    fn dot() -> RgbaImage {
        RgbaImage::from_pixel(8, 4, Rgba([255, 255, 255, 255]))
    }

    fn render_ok(m: EquationMatch) -> EquationRender {
        EquationRender {
            matched: m,
            image: Some(dot()),
            error: None,
        }
    }

    fn render_failed(m: EquationMatch) -> EquationRender {
        EquationRender {
            matched: m.clone(),
            image: None,
            error: Some(crate::error::RenderError::BlankImage {
                equation: m.equation,
            }),
        }
    }

    fn renders_for(text: &str) -> Vec<EquationRender> {
        scan(text).into_iter().map(render_ok).collect()
    }

    #[test]
    fn interleaves_text_and_images() {
        let text = r"before \(x\) between \[y\] after";
        let items = compose(text, &renders_for(text), ComposeMode::Interleaved).unwrap();
        let shapes: Vec<&str> = items
            .iter()
            .map(|i| match i {
                ContentItem::Text(_) => "t",
                ContentItem::Image(_) => "i",
            })
            .collect();
        assert_eq!(shapes, ["t", "i", "t", "i", "t"]);
        match &items[0] {
            ContentItem::Text(t) => assert_eq!(t, "before "),
            _ => panic!("expected leading text"),
        }
        match &items[4] {
            ContentItem::Text(t) => assert_eq!(t, " after"),
            _ => panic!("expected trailing text"),
        }
    }

    #[test]
    fn no_leading_text_when_equation_starts_the_text() {
        let text = r"\(x\) trailing";
        let items = compose(text, &renders_for(text), ComposeMode::Interleaved).unwrap();
        assert!(matches!(items[0], ContentItem::Image(_)));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn failed_render_leaves_span_as_text() {
        let text = r"a \(x\) b \(y\) c";
        let mut renders = renders_for(text);
        renders[0] = render_failed(renders[0].matched.clone());
        let items = compose(text, &renders, ComposeMode::Interleaved).unwrap();
        // The failed first span stays inside the text run before the second
        // image; only one image appears and it belongs to the second match.
        let images = items
            .iter()
            .filter(|i| matches!(i, ContentItem::Image(_)))
            .count();
        assert_eq!(images, 1);
        match &items[0] {
            ContentItem::Text(t) => assert_eq!(t, r"a \(x\) b "),
            _ => panic!("expected text first"),
        }
    }

    #[test]
    fn images_only_drops_all_text() {
        let text = r"a \(x\) b \[y\] c";
        let items = compose(text, &renders_for(text), ComposeMode::ImagesOnly).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| matches!(i, ContentItem::Image(_))));
    }

    #[test]
    fn overlapping_spans_do_not_panic_or_misalign() {
        let text = "$$a$b$$";
        let items = compose(text, &renders_for(text), ComposeMode::Interleaved).unwrap();
        // Two overlapping matches: both images appear, cursor never rewinds.
        let images = items
            .iter()
            .filter(|i| matches!(i, ContentItem::Image(_)))
            .count();
        assert_eq!(images, 2);
    }

    #[test]
    fn out_of_bounds_span_is_a_loud_error() {
        let bad = render_ok(EquationMatch {
            start: 5,
            end: 50,
            equation: "x".into(),
            is_display: false,
            raw_span: "$x$".into(),
        });
        let err = compose("short", &[bad], ComposeMode::Interleaved).unwrap_err();
        assert!(matches!(err, TexClipError::SpanOutOfBounds { .. }));
    }

    #[test]
    fn non_equation_text_reconstructed_verbatim() {
        let text = "intro \\(a\\) middle & <tag> \\[b\\] outro";
        let items = compose(text, &renders_for(text), ComposeMode::Interleaved).unwrap();
        let joined: String = items
            .iter()
            .filter_map(|i| match i {
                ContentItem::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(joined, "intro  middle & <tag>  outro");
    }

    #[test]
    fn html_escapes_text_and_inlines_images() {
        let text = "x < y & \"z\"\nnext \\(e\\)";
        let items = compose(text, &renders_for(text), ComposeMode::Interleaved).unwrap();
        let cfg = RenderConfig::default();
        let html = html_fragment(&items, &cfg).unwrap();
        assert!(html.contains("x &lt; y &amp; &quot;z&quot;"));
        assert!(html.contains("<br>"));
        assert!(html.contains("data:image/png;base64,"));
        assert!(html.starts_with("<style>"));
        assert!(html.contains("font-size: 12pt"));
        assert!(html.contains("color: white"));
    }

    #[test]
    fn paginate_drops_blank_runs_and_sizes_pictures() {
        let wide = RgbaImage::from_pixel(200, 50, Rgba([0, 0, 0, 255]));
        let items = vec![
            ContentItem::Text("  \n ".into()),
            ContentItem::Text(" kept ".into()),
            ContentItem::Image(wide),
        ];
        let blocks = paginate(&items, 14).unwrap();
        assert_eq!(blocks.len(), 2);
        match &blocks[0] {
            DocBlock::Paragraph { text, font_size_pt } => {
                assert_eq!(text, "kept");
                assert_eq!(*font_size_pt, 14);
            }
            _ => panic!("expected paragraph"),
        }
        match &blocks[1] {
            DocBlock::Picture {
                width_pt,
                height_pt,
                png,
            } => {
                assert_eq!(*width_pt, 300);
                assert_eq!(*height_pt, 75); // 300 * 50/200
                assert!(!png.is_empty());
            }
            _ => panic!("expected picture"),
        }
    }
}
