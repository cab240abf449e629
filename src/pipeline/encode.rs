//! Image encoding: raster to PNG bytes and base64 data URIs.
//!
//! PNG is the only wire format: it is lossless, keeps the alpha channel the
//! renderer relies on, and is accepted by every rich-text paste target and
//! by the document exporter.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// Encode a raster as PNG bytes.
pub fn png_bytes(img: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Encode a raster as a `data:image/png;base64,...` URI for inline HTML.
pub fn data_uri(img: &RgbaImage) -> Result<String, image::ImageError> {
    let bytes = png_bytes(img)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 255]))
    }

    #[test]
    fn png_bytes_carry_signature() {
        let bytes = png_bytes(&sample()).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }

    #[test]
    fn png_round_trips_through_decoder() {
        let bytes = png_bytes(&sample()).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(decoded.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn data_uri_has_png_prefix() {
        let uri = data_uri(&sample()).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(uri.len() > "data:image/png;base64,".len());
    }
}
