//! Slate SVG composition.
//!
//! One document, elements in the fixed z-order the raster depends on:
//! background, panel, icon, frame, descriptor text, footer. The icon is
//! embedded as a base64 data URL already resized to its layout rectangle, so
//! `resvg` rasterizes it at full target resolution.

use std::fmt::Write as _;

use slategen_core::{RatingRecord, SlateDesign};

use crate::icon::IconAsset;
use crate::layout::{IconOnlyLayout, PanelLayout, SlateLayout};

const LETTERBOX_FILL: &str = "#000000";
const PANEL_FILL: &str = "#FFFFFF";
const FRAME_STROKE: &str = "#000000";
const TEXT_FILL: &str = "#000000";

/// Fraction of the font size from a line's top edge down to its baseline.
const BASELINE_SHIFT: f64 = 0.8;

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn compose_slate_svg(
    record: &RatingRecord,
    footer_items: &[&str],
    layout: &SlateLayout,
    icon: &IconAsset,
    font_family: &str,
    design: &SlateDesign,
) -> String {
    match layout {
        SlateLayout::Panel(panel) => {
            compose_panel(record, footer_items, panel, icon, font_family, design)
        }
        SlateLayout::IconOnly(only) => compose_icon_only(only, icon),
    }
}

fn document_open(out: &mut String, width: u32, height: u32) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
}

fn push_fill_rect(out: &mut String, x: f64, y: f64, w: f64, h: f64, fill: &str) {
    let _ = write!(
        out,
        r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}"/>"#
    );
}

/// Strokes a rectangle so the stroke's *outer* edge lands exactly on the given
/// outer rect. Stroke paths are center-drawn, so the path is inset by half the
/// thickness.
fn push_frame_stroke(
    out: &mut String,
    outer: &crate::layout::Rect,
    thickness: f64,
) {
    let half = thickness / 2.0;
    let _ = write!(
        out,
        r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="none" stroke="{FRAME_STROKE}" stroke-width="{thickness:.2}"/>"#,
        x = outer.x + half,
        y = outer.y + half,
        w = outer.width - thickness,
        h = outer.height - thickness,
    );
}

fn push_icon(out: &mut String, rect: &crate::layout::Rect, icon: &IconAsset) {
    let _ = write!(
        out,
        r#"<image x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" xlink:href="{href}"/>"#,
        x = rect.x,
        y = rect.y,
        w = rect.width,
        h = rect.height,
        href = icon.data_url(rect.width, rect.height),
    );
}

fn compose_panel(
    record: &RatingRecord,
    footer_items: &[&str],
    panel: &PanelLayout,
    icon: &IconAsset,
    font_family: &str,
    design: &SlateDesign,
) -> String {
    let mut out = String::new();
    document_open(&mut out, panel.canvas_width, panel.canvas_height);

    let background = if panel.letterboxed { LETTERBOX_FILL } else { PANEL_FILL };
    push_fill_rect(
        &mut out,
        0.0,
        0.0,
        f64::from(panel.canvas_width),
        f64::from(panel.canvas_height),
        background,
    );
    let band = &panel.main_band;
    push_fill_rect(&mut out, band.x, band.y, band.width, band.height, PANEL_FILL);

    push_icon(&mut out, &panel.icon, icon);
    push_frame_stroke(&mut out, &panel.frame_outer, panel.frame_thickness);

    let family = escape_xml(font_family);
    let font_size = panel.font.font_size;
    for (i, descriptor) in record.descriptors.iter().enumerate() {
        let line_top = panel.text_top + i as f64 * (font_size + panel.font.line_gap);
        let baseline = line_top + font_size * BASELINE_SHIFT;
        let _ = write!(
            out,
            r#"<text x="{x:.2}" y="{y:.2}" font-family="{family}" font-size="{font_size:.2}" font-weight="bold" fill="{TEXT_FILL}">{text}</text>"#,
            x = panel.text_x,
            y = baseline,
            text = escape_xml(descriptor),
        );
    }

    if let Some(footer) = &panel.footer {
        let band = &footer.band;
        push_fill_rect(&mut out, band.x, band.y, band.width, band.height, PANEL_FILL);
        push_frame_stroke(&mut out, &footer.frame_outer, footer.frame_thickness);

        let notice = footer_items
            .iter()
            .take(design.footer_max_items)
            .copied()
            .collect::<Vec<_>>()
            .join(design.footer_separator);
        let _ = write!(
            out,
            r#"<text x="{x:.2}" y="{y:.2}" font-family="{family}" font-size="{size:.2}" font-weight="bold" fill="{TEXT_FILL}" text-anchor="middle" dominant-baseline="central">{text}</text>"#,
            x = footer.text_center_x,
            y = footer.text_center_y,
            size = footer.font_size,
            text = escape_xml(&notice),
        );
    }

    out.push_str("</svg>");
    out
}

fn compose_icon_only(layout: &IconOnlyLayout, icon: &IconAsset) -> String {
    let mut out = String::new();
    document_open(&mut out, layout.canvas_width, layout.canvas_height);

    let background = if layout.letterboxed { LETTERBOX_FILL } else { PANEL_FILL };
    push_fill_rect(
        &mut out,
        0.0,
        0.0,
        f64::from(layout.canvas_width),
        f64::from(layout.canvas_height),
        background,
    );
    push_icon(&mut out, &layout.icon, icon);

    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use slategen_core::{
        AspectRatio, OutputFormat, RatingCategory, RatioRequest, RenderOptions, ResolutionTier,
    };

    fn record(descriptors: &[&str], interactive: &[&str]) -> RatingRecord {
        RatingRecord {
            title: "Test Game".to_string(),
            category: RatingCategory::Mature,
            descriptors: descriptors.iter().map(|s| s.to_string()).collect(),
            interactive_elements: interactive.iter().map(|s| s.to_string()).collect(),
            platforms: None,
            esrb_id: None,
            esrb_url: None,
        }
    }

    fn test_icon() -> IconAsset {
        let dir = tempfile::tempdir().expect("tempdir");
        let icons = dir.path().join("icons");
        std::fs::create_dir_all(&icons).expect("icons dir");
        std::fs::write(
            icons.join("M.svg"),
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><rect width="100" height="100"/></svg>"#,
        )
        .expect("write icon");
        crate::icon::resolve_icon(dir.path(), RatingCategory::Mature).expect("icon")
    }

    fn compose(descriptors: &[&str], interactive: &[&str], margin: u32) -> String {
        let record = record(descriptors, interactive);
        let footer_items = record.filtered_interactive_elements();
        let options = RenderOptions {
            margin,
            resolution: ResolutionTier::Standard,
            ratio: RatioRequest::Auto,
            format: OutputFormat::Png,
        };
        let layout = compute_layout(
            AspectRatio::narrowest(),
            &options,
            1.0,
            record.descriptors.len(),
            !footer_items.is_empty(),
            record.has_placeholder_descriptors(),
            &SlateDesign::default(),
        );
        compose_slate_svg(
            &record,
            &footer_items,
            &layout,
            &test_icon(),
            "sans-serif",
            &SlateDesign::default(),
        )
    }

    #[test]
    fn z_order_is_background_panel_icon_frame_text() {
        let svg = compose(&["Blood", "Violence"], &[], 0);
        let bg = svg.find("<rect").expect("background");
        let image = svg.find("<image").expect("icon");
        let stroke = svg.find("stroke-width").expect("frame");
        let text = svg.find("<text").expect("text");
        assert!(bg < image && image < stroke && stroke < text);
        assert!(svg.contains(">Blood</text>"));
        assert!(svg.contains(">Violence</text>"));
    }

    #[test]
    fn footer_renders_at_most_three_elements() {
        let svg = compose(
            &["Blood"],
            &["Users Interact", "In-Game Purchases", "Shared Location", "One Too Many"],
            0,
        );
        assert!(svg.contains("Users Interact, In-Game Purchases, Shared Location"));
        assert!(!svg.contains("One Too Many"));
    }

    #[test]
    fn filtered_placeholder_allocates_no_footer() {
        let svg = compose(&["Blood"], &["Not Rated by the ESRB"], 0);
        assert!(!svg.contains("text-anchor=\"middle\""));
        assert!(!svg.contains("Not Rated"));
    }

    #[test]
    fn no_descriptors_sentinel_draws_only_the_icon() {
        let svg = compose(&["No Descriptors"], &["Users Interact"], 0);
        assert!(svg.contains("<image"));
        assert!(!svg.contains("<text"));
        assert!(!svg.contains("stroke-width"));
        assert!(!svg.contains("No Descriptors"));
    }

    #[test]
    fn letterboxed_background_is_black_variable_is_white() {
        let boxed = compose(&["Blood"], &[], 120);
        let variable = compose(&["Blood"], &[], 0);
        assert!(boxed.starts_with(r#"<svg xmlns"#));
        assert!(boxed.contains(r##"fill="#000000"/>"##));
        let first_rect = &variable[variable.find("<rect").expect("rect")..];
        assert!(first_rect.starts_with(r##"<rect x="0.00" y="0.00" width="1920.00" height="1080.00" fill="#FFFFFF"/>"##));
    }

    #[test]
    fn descriptor_text_is_escaped() {
        let svg = compose(&["Crude Humor & <Mischief>"], &[], 0);
        assert!(svg.contains("Crude Humor &amp; &lt;Mischief&gt;"));
    }
}
