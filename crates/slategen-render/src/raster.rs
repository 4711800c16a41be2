//! SVG rasterization and raster encoding.
//!
//! Pure-Rust pipeline: `usvg` parses the composed document, `resvg` renders it
//! into a `tiny_skia::Pixmap`, and the pixmap is encoded to PNG directly or to
//! JPG through the `image` encoder.

use std::path::Path;
use std::sync::Arc;

use slategen_core::OutputFormat;

use crate::{Error, Result};

/// Fonts resolved for one render call: the font database handed to `usvg`
/// plus the family name the compositor references in `<text>` elements.
///
/// Rebuilt per call; population is idempotent, so concurrent renders are safe.
#[derive(Clone)]
pub struct SlateFonts {
    pub db: Arc<usvg::fontdb::Database>,
    pub family: String,
}

const FALLBACK_FAMILY: &str = "sans-serif";

pub fn load_slate_fonts(font_file: Option<&Path>) -> SlateFonts {
    let mut db = usvg::fontdb::Database::new();
    let mut family = None;

    match font_file {
        Some(path) => match db.load_font_file(path) {
            Ok(()) => {
                family = db
                    .faces()
                    .last()
                    .and_then(|face| face.families.first().map(|(name, _)| name.clone()));
                if family.is_none() {
                    tracing::warn!(
                        path = %path.display(),
                        "slate font loaded but exposes no family name, using system sans-serif"
                    );
                }
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to load slate font, using system sans-serif"
                );
            }
        },
        None => {
            tracing::info!("no slate font configured, using system bold sans-serif");
        }
    }

    // System fonts stay registered as fallbacks either way.
    db.load_system_fonts();
    if let Some(name) = &family {
        // Map the generic family onto the slate font so fallback resolution
        // inside usvg lands on it too.
        db.set_sans_serif_family(name.clone());
    }

    SlateFonts {
        db: Arc::new(db),
        family: family.unwrap_or_else(|| FALLBACK_FAMILY.to_string()),
    }
}

pub fn rasterize(svg: &str, format: OutputFormat, fonts: &SlateFonts) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, fonts)?;
    match format {
        OutputFormat::Png => pixmap.encode_png().map_err(|_| Error::PngEncode),
        OutputFormat::Jpeg => encode_jpeg(&pixmap),
    }
}

fn svg_to_pixmap(svg: &str, fonts: &SlateFonts) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb = Arc::clone(&fonts.db);
    opt.font_family = fonts.family.clone();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| Error::SvgParse)?;
    let size = tree.size().to_int_size();

    let mut pixmap = tiny_skia::Pixmap::new(size.width().max(1), size.height().max(1))
        .ok_or(Error::PixmapAlloc)?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

const JPEG_QUALITY: u8 = 90;

fn encode_jpeg(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>> {
    let (w, h) = (pixmap.width(), pixmap.height());

    // tiny-skia renders into an RGBA8 buffer. The slate always paints an
    // opaque background first, so the alpha channel is constant 255 and can be
    // dropped.
    let rgba = pixmap.data();
    let mut rgb = vec![0u8; (w as usize) * (h as usize) * 3];
    for (src, dst) in rgba.chunks_exact(4).zip(rgb.chunks_exact_mut(3)) {
        dst[0] = src[0];
        dst[1] = src[1];
        dst[2] = src[2];
    }

    let mut out = Vec::new();
    let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    enc.encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
        .map_err(|_| Error::JpegEncode)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="16" viewBox="0 0 32 16"><rect width="32" height="16" fill="black"/></svg>"#;

    #[test]
    fn png_output_carries_the_png_signature() {
        let fonts = load_slate_fonts(None);
        let bytes = rasterize(SIMPLE_SVG, OutputFormat::Png, &fonts).expect("png");
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn jpeg_output_carries_the_soi_marker() {
        let fonts = load_slate_fonts(None);
        let bytes = rasterize(SIMPLE_SVG, OutputFormat::Jpeg, &fonts).expect("jpeg");
        assert!(bytes.starts_with(&[0xFF, 0xD8]));
    }

    #[test]
    fn pixmap_matches_the_declared_document_size() {
        let fonts = load_slate_fonts(None);
        let pixmap = svg_to_pixmap(SIMPLE_SVG, &fonts).expect("pixmap");
        assert_eq!((pixmap.width(), pixmap.height()), (32, 16));
    }

    #[test]
    fn garbage_input_is_a_parse_error() {
        let fonts = load_slate_fonts(None);
        assert!(matches!(
            rasterize("this is not svg", OutputFormat::Png, &fonts),
            Err(Error::SvgParse)
        ));
    }
}
