use std::io::Cursor;
use std::path::Path;

use slategen_core::{
    AspectRatio, OutputFormat, RatingCategory, RatingRecord, RatioRequest, RenderOptions,
    ResolutionTier,
};
use slategen_render::{Error, RenderConfig, render_slate};

const ICON_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="87" height="100"><rect width="87" height="100" fill="black"/></svg>"#;

fn asset_root(dir: &Path) {
    let icons = dir.join("icons");
    std::fs::create_dir_all(&icons).expect("icons dir");
    for category in RatingCategory::ALL {
        std::fs::write(icons.join(format!("{}.svg", category.asset_stem())), ICON_SVG)
            .expect("write icon");
    }
}

fn record(descriptors: &[&str], interactive: &[&str]) -> RatingRecord {
    RatingRecord {
        title: "Test Game".to_string(),
        category: RatingCategory::Mature,
        descriptors: descriptors.iter().map(|s| s.to_string()).collect(),
        interactive_elements: interactive.iter().map(|s| s.to_string()).collect(),
        platforms: Some("PC".to_string()),
        esrb_id: None,
        esrb_url: None,
    }
}

fn options(margin: u32, resolution: ResolutionTier, ratio: RatioRequest) -> RenderOptions {
    RenderOptions {
        margin,
        resolution,
        ratio,
        format: OutputFormat::Png,
    }
}

fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let reader = decoder.read_info().expect("png info");
    let info = reader.info();
    (info.width, info.height)
}

fn exact(w: u32, h: u32) -> RatioRequest {
    RatioRequest::Exact(AspectRatio::new(w, h).expect("valid ratio"))
}

#[test]
fn variable_width_16_9_renders_full_hd() {
    let dir = tempfile::tempdir().expect("tempdir");
    asset_root(dir.path());

    let out = render_slate(
        &record(&["Blood", "Violence"], &[]),
        &options(0, ResolutionTier::Standard, exact(16, 9)),
        &RenderConfig::new(dir.path()),
    )
    .expect("render");

    assert_eq!((out.canvas_width, out.canvas_height), (1920, 1080));
    assert_eq!(png_dimensions(&out.bytes), (1920, 1080));
}

#[test]
fn variable_width_21_9_renders_2520_wide() {
    let dir = tempfile::tempdir().expect("tempdir");
    asset_root(dir.path());

    let out = render_slate(
        &record(&["Blood"], &[]),
        &options(0, ResolutionTier::Standard, exact(21, 9)),
        &RenderConfig::new(dir.path()),
    )
    .expect("render");

    assert_eq!(png_dimensions(&out.bytes), (2520, 1080));
}

#[test]
fn letterboxed_canvas_is_pinned_to_the_tier() {
    let dir = tempfile::tempdir().expect("tempdir");
    asset_root(dir.path());

    for ratio in [exact(16, 9), exact(21, 9)] {
        let out = render_slate(
            &record(&["Blood"], &[]),
            &options(100, ResolutionTier::Standard, ratio),
            &RenderConfig::new(dir.path()),
        )
        .expect("render");
        assert_eq!(png_dimensions(&out.bytes), (1920, 1080));
    }

    let out = render_slate(
        &record(&["Blood"], &[]),
        &options(100, ResolutionTier::High, exact(16, 9)),
        &RenderConfig::new(dir.path()),
    )
    .expect("render");
    assert_eq!(png_dimensions(&out.bytes), (3840, 2160));
}

#[test]
fn auto_ratio_with_short_descriptors_stays_narrow() {
    let dir = tempfile::tempdir().expect("tempdir");
    asset_root(dir.path());

    let out = render_slate(
        &record(&["Blood"], &[]),
        &options(0, ResolutionTier::Standard, RatioRequest::Auto),
        &RenderConfig::new(dir.path()),
    )
    .expect("render");
    assert_eq!(out.ratio, AspectRatio::narrowest());
}

#[test]
fn icon_only_bypass_renders_without_panel() {
    let dir = tempfile::tempdir().expect("tempdir");
    asset_root(dir.path());

    let out = render_slate(
        &record(&["No Descriptors"], &["Users Interact"]),
        &options(0, ResolutionTier::Standard, RatioRequest::Auto),
        &RenderConfig::new(dir.path()),
    )
    .expect("render");

    // Auto resolves to the narrowest ratio on the bypass path.
    assert_eq!(out.ratio, AspectRatio::narrowest());
    assert_eq!(png_dimensions(&out.bytes), (1920, 1080));
}

#[test]
fn jpeg_output_carries_the_soi_marker() {
    let dir = tempfile::tempdir().expect("tempdir");
    asset_root(dir.path());

    let mut opts = options(0, ResolutionTier::Standard, exact(16, 9));
    opts.format = OutputFormat::Jpeg;
    let out = render_slate(
        &record(&["Blood"], &["Users Interact"]),
        &opts,
        &RenderConfig::new(dir.path()),
    )
    .expect("render");
    assert!(out.bytes.starts_with(&[0xFF, 0xD8]));
}

#[test]
fn missing_icon_assets_abort_the_render() {
    let dir = tempfile::tempdir().expect("tempdir");

    let err = render_slate(
        &record(&["Blood"], &[]),
        &options(0, ResolutionTier::Standard, exact(16, 9)),
        &RenderConfig::new(dir.path()),
    )
    .expect_err("must fail");
    assert!(matches!(err, Error::AssetNotFound { .. }));
}
