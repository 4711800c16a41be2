//! Rating-icon asset resolution.
//!
//! Vector assets are preferred; raster PNGs are the fallback. Intrinsic-ratio
//! computation and render-time rasterization are two separate operations: the
//! ratio is read once for layout, and the asset is re-emitted later with its
//! declared dimensions rewritten to the target pixel size so `resvg`
//! rasterizes it crisply instead of upscaling.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use base64::Engine as _;
use image::GenericImageView as _;
use regex::Regex;
use slategen_core::RatingCategory;

use crate::{Error, Result};

#[derive(Debug, Clone)]
enum IconData {
    Vector(String),
    Raster(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct IconAsset {
    data: IconData,
    aspect_ratio: f64,
    path: PathBuf,
}

fn width_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"width="([^"]*)""#).expect("valid regex"))
}

fn height_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"height="([^"]*)""#).expect("valid regex"))
}

/// Parses a declared SVG dimension. Unit suffixes like `px` are tolerated;
/// anything non-positive or non-numeric is treated as absent.
fn parse_dimension(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_end_matches("px").trim();
    let value = trimmed.parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

fn vector_aspect_ratio(svg: &str) -> Option<f64> {
    let width = width_re()
        .captures(svg)
        .and_then(|c| parse_dimension(c.get(1)?.as_str()))?;
    let height = height_re()
        .captures(svg)
        .and_then(|c| parse_dimension(c.get(1)?.as_str()))?;
    Some(width / height)
}

/// Looks up the icon asset for a category, vector first, raster fallback.
pub fn resolve_icon(asset_root: &Path, category: RatingCategory) -> Result<IconAsset> {
    let stem = category.asset_stem();
    let icons_dir = asset_root.join("icons");

    let svg_path = icons_dir.join(format!("{stem}.svg"));
    if svg_path.exists() {
        let text = std::fs::read_to_string(&svg_path)?;
        let aspect_ratio = vector_aspect_ratio(&text).unwrap_or_else(|| {
            tracing::info!(
                path = %svg_path.display(),
                "icon has no usable width/height attributes, assuming a 1:1 ratio"
            );
            1.0
        });
        return Ok(IconAsset {
            data: IconData::Vector(text),
            aspect_ratio,
            path: svg_path,
        });
    }

    let png_path = icons_dir.join(format!("{stem}.png"));
    if png_path.exists() {
        let bytes = std::fs::read(&png_path)?;
        let decoded = image::load_from_memory(&bytes).map_err(|_| Error::IconDecode {
            path: png_path.display().to_string(),
        })?;
        let aspect_ratio = f64::from(decoded.width()) / f64::from(decoded.height());
        return Ok(IconAsset {
            data: IconData::Raster(bytes),
            aspect_ratio,
            path: png_path,
        });
    }

    Err(Error::AssetNotFound {
        category,
        root: asset_root.display().to_string(),
    })
}

/// Rewrites (or inserts) the root width/height attributes so the SVG declares
/// exactly the target pixel size.
fn rewrite_dimensions(svg: &str, width: f64, height: f64) -> String {
    let w_attr = format!(r#"width="{width:.2}""#);
    let h_attr = format!(r#"height="{height:.2}""#);

    let mut out = if width_re().is_match(svg) {
        width_re().replace(svg, w_attr.as_str()).into_owned()
    } else {
        svg.replacen("<svg", &format!("<svg {w_attr}"), 1)
    };
    out = if height_re().is_match(&out) {
        height_re().replace(&out, h_attr.as_str()).into_owned()
    } else {
        out.replacen("<svg", &format!("<svg {h_attr}"), 1)
    };
    out
}

impl IconAsset {
    /// Width / height of the source asset.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The asset as a base64 data URL sized for embedding at the target pixel
    /// dimensions. Raster assets are passed through untouched and scaled by
    /// the `<image>` element instead.
    pub fn data_url(&self, target_width: f64, target_height: f64) -> String {
        let engine = base64::engine::general_purpose::STANDARD;
        match &self.data {
            IconData::Vector(text) => {
                let resized = rewrite_dimensions(text, target_width, target_height);
                format!("data:image/svg+xml;base64,{}", engine.encode(resized))
            }
            IconData::Raster(bytes) => {
                format!("data:image/png;base64,{}", engine.encode(bytes))
            }
        }
    }
}
