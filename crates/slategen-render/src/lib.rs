#![forbid(unsafe_code)]

//! Headless layout + compositing engine for ESRB rating slates.
//!
//! The pipeline is a fully synchronous, sequential chain: resolve the icon
//! asset, pick an aspect ratio (when requested as auto), derive scaled
//! geometry from the 650-unit reference design, shrink typography into its
//! vertical budget, compose one SVG document in fixed z-order, and rasterize
//! it with `resvg` into PNG or JPG bytes. Nothing is cached between calls.

pub mod icon;
pub mod layout;
pub mod ratio;
pub mod raster;
pub mod svg;
pub mod text;
pub mod typography;

use std::path::PathBuf;
use std::sync::Arc;

use slategen_core::{AspectRatio, RatingCategory, RatingRecord, RatioRequest, RenderOptions, SlateDesign};

use crate::text::{DeterministicTextMeasurer, TextMeasurer};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no icon asset (svg or png) found for rating category {category} under {root}")]
    AssetNotFound { category: RatingCategory, root: String },
    #[error("failed to decode raster icon asset: {path}")]
    IconDecode { path: String },
    #[error("failed to parse font file: {path}")]
    FontParse { path: String },
    #[error("failed to parse composed slate SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("failed to encode JPG")]
    JpegEncode,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Bundles the per-installation inputs of a render call: where icon assets
/// live, the optional slate font, the design constants and the measurer used
/// by the auto aspect-ratio search.
#[derive(Clone)]
pub struct RenderConfig {
    pub asset_root: PathBuf,
    pub font_file: Option<PathBuf>,
    pub design: SlateDesign,
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl RenderConfig {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            font_file: None,
            design: SlateDesign::default(),
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

/// The encoded raster plus the geometry facts callers tend to log.
#[derive(Debug, Clone)]
pub struct RenderedSlate {
    pub bytes: Vec<u8>,
    pub ratio: AspectRatio,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// Renders one slate to encoded image bytes.
///
/// Fails before producing any output bytes; callers persist the returned
/// buffer in a single write so partial images never reach disk.
pub fn render_slate(
    record: &RatingRecord,
    options: &RenderOptions,
    config: &RenderConfig,
) -> Result<RenderedSlate> {
    let icon = icon::resolve_icon(&config.asset_root, record.category)?;
    let footer_items = record.filtered_interactive_elements();
    let has_footer = !footer_items.is_empty();
    let icon_only = record.has_placeholder_descriptors();

    let ratio = match options.ratio {
        RatioRequest::Exact(ratio) => ratio,
        // The icon-only path bypasses panel layout entirely, so the search
        // would measure a placeholder string nothing ever draws. Auto resolves
        // to the narrowest ratio purely to size the canvas.
        RatioRequest::Auto if icon_only => AspectRatio::narrowest(),
        RatioRequest::Auto => ratio::select_aspect_ratio(
            &record.descriptors,
            has_footer,
            options,
            icon.aspect_ratio(),
            &config.design,
            config.text_measurer.as_ref(),
        ),
    };
    tracing::debug!(ratio = %ratio, icon_only, has_footer, "slate geometry inputs resolved");

    let layout = layout::compute_layout(
        ratio,
        options,
        icon.aspect_ratio(),
        record.descriptors.len(),
        has_footer,
        icon_only,
        &config.design,
    );

    let fonts = raster::load_slate_fonts(config.font_file.as_deref());
    let svg = svg::compose_slate_svg(record, &footer_items, &layout, &icon, &fonts.family, &config.design);
    let bytes = raster::rasterize(&svg, options.format, &fonts)?;

    let (canvas_width, canvas_height) = layout.canvas();
    Ok(RenderedSlate {
        bytes,
        ratio,
        canvas_width,
        canvas_height,
    })
}
