//! Geometry derivation.
//!
//! All panel geometry is produced by linear scaling from the 650-unit
//! reference design: scale = mainBandHeight / 650, and every design-unit
//! constant is multiplied by that factor before use. The layout is an
//! ephemeral snapshot, recomputed for every render.

use slategen_core::{AspectRatio, RenderOptions, SlateDesign};

use crate::typography::{self, FontFit};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone)]
pub struct FooterLayout {
    pub band: Rect,
    /// Outer edge of the footer frame stroke. Its top touches the main frame;
    /// its bottom is inset by the frame margin.
    pub frame_outer: Rect,
    pub frame_thickness: f64,
    pub text_center_x: f64,
    pub text_center_y: f64,
    pub font_size: f64,
}

#[derive(Debug, Clone)]
pub struct PanelLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub letterboxed: bool,
    pub content_box: Rect,
    pub main_band: Rect,
    pub icon: Rect,
    /// Outer edge of the main frame stroke.
    pub frame_outer: Rect,
    pub frame_thickness: f64,
    pub frame_margin: f64,
    /// Left edge of the descriptor column.
    pub text_x: f64,
    /// Top edge of the first descriptor line.
    pub text_top: f64,
    pub max_text_width: f64,
    pub font: FontFit,
    pub footer: Option<FooterLayout>,
    pub scale: f64,
}

/// The "No Descriptors" bypass: a full-height icon centered on the canvas,
/// no panel, frame or footer.
#[derive(Debug, Clone)]
pub struct IconOnlyLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub letterboxed: bool,
    pub icon: Rect,
}

#[derive(Debug, Clone)]
pub enum SlateLayout {
    Panel(PanelLayout),
    IconOnly(IconOnlyLayout),
}

impl SlateLayout {
    pub fn canvas(&self) -> (u32, u32) {
        match self {
            SlateLayout::Panel(p) => (p.canvas_width, p.canvas_height),
            SlateLayout::IconOnly(i) => (i.canvas_width, i.canvas_height),
        }
    }
}

/// Canvas dimensions plus the content box under the active margin mode.
fn canvas_and_box(ratio: AspectRatio, options: &RenderOptions) -> (u32, u32, Rect) {
    let hf = ratio.height_factor();
    let tier = options.resolution;
    if options.letterboxed() {
        let canvas_w = f64::from(tier.width());
        let canvas_h = f64::from(tier.height());
        let margin = f64::from(options.margin);
        let box_w = canvas_w - 2.0 * margin;
        let box_h = box_w * hf;
        let content_box = Rect {
            x: margin,
            y: (canvas_h - box_h) / 2.0,
            width: box_w,
            height: box_h,
        };
        (tier.width(), tier.height(), content_box)
    } else {
        let canvas_h = f64::from(tier.height());
        let canvas_w = (canvas_h / hf).round();
        let content_box = Rect {
            x: 0.0,
            y: 0.0,
            width: canvas_w,
            height: canvas_h,
        };
        (canvas_w as u32, tier.height(), content_box)
    }
}

pub fn compute_layout(
    ratio: AspectRatio,
    options: &RenderOptions,
    icon_aspect_ratio: f64,
    descriptor_lines: usize,
    has_footer: bool,
    icon_only: bool,
    design: &SlateDesign,
) -> SlateLayout {
    if icon_only {
        let (canvas_width, canvas_height, content_box) = canvas_and_box(ratio, options);
        let icon_h = content_box.height;
        let icon_w = icon_h * icon_aspect_ratio;
        return SlateLayout::IconOnly(IconOnlyLayout {
            canvas_width,
            canvas_height,
            letterboxed: options.letterboxed(),
            icon: Rect {
                x: (f64::from(canvas_width) - icon_w) / 2.0,
                y: content_box.y,
                width: icon_w,
                height: icon_h,
            },
        });
    }

    SlateLayout::Panel(panel_layout(
        ratio,
        options,
        icon_aspect_ratio,
        descriptor_lines,
        has_footer,
        design,
    ))
}

pub(crate) fn panel_layout(
    ratio: AspectRatio,
    options: &RenderOptions,
    icon_aspect_ratio: f64,
    descriptor_lines: usize,
    has_footer: bool,
    design: &SlateDesign,
) -> PanelLayout {
    let (canvas_width, canvas_height, content_box) = canvas_and_box(ratio, options);

    let footer_h = if has_footer {
        content_box.height * design.footer_share
    } else {
        0.0
    };
    let main_h = content_box.height - footer_h;
    let main_band = Rect {
        x: content_box.x,
        y: content_box.y,
        width: content_box.width,
        height: main_h,
    };

    let scale = main_h / design.reference_height;
    let frame_thickness = design.frame_thickness * scale;
    let frame_margin = design.frame_margin * scale;
    let icon_padding = design.icon_padding * scale;
    let text_padding = design.text_padding * scale;
    let right_padding = design.right_padding * scale;
    let safety = design.text_safety_inset * scale;

    let icon_h = main_h - 2.0 * icon_padding;
    let icon = Rect {
        x: content_box.x + icon_padding,
        y: content_box.y + icon_padding,
        width: icon_h * icon_aspect_ratio,
        height: icon_h,
    };

    // With a footer the main frame's bottom outer edge sits exactly on the
    // band boundary so the footer frame can touch it; without one it is inset
    // like the other edges.
    let frame_bottom = if has_footer {
        main_band.bottom()
    } else {
        main_band.bottom() - frame_margin
    };
    let frame_outer = Rect {
        x: content_box.x + frame_margin,
        y: content_box.y + frame_margin,
        width: content_box.width - 2.0 * frame_margin,
        height: frame_bottom - (content_box.y + frame_margin),
    };

    let text_x = icon.right() + text_padding;
    let frame_inner_right = content_box.right() - frame_margin - frame_thickness;
    let max_text_width = frame_inner_right - text_x - right_padding;

    let available_text_height = main_h
        - frame_margin
        - if has_footer { 0.0 } else { frame_margin }
        - 2.0 * frame_thickness
        - safety;

    let font = typography::fit_descriptor_font(
        descriptor_lines,
        available_text_height,
        design.base_font_size * scale,
        design,
    );
    let text_top = content_box.y + frame_margin + frame_thickness + safety / 2.0 + font.lead;

    let footer = has_footer.then(|| {
        let band = Rect {
            x: content_box.x,
            y: main_band.bottom(),
            width: content_box.width,
            height: footer_h,
        };
        let frame_outer = Rect {
            x: content_box.x + frame_margin,
            y: band.y,
            width: content_box.width - 2.0 * frame_margin,
            height: band.height - frame_margin,
        };
        FooterLayout {
            band,
            frame_outer,
            frame_thickness: frame_thickness / 2.0,
            text_center_x: frame_outer.x + frame_outer.width / 2.0,
            text_center_y: frame_outer.y + frame_outer.height / 2.0,
            font_size: font.font_size,
        }
    });

    PanelLayout {
        canvas_width,
        canvas_height,
        letterboxed: options.letterboxed(),
        content_box,
        main_band,
        icon,
        frame_outer,
        frame_thickness,
        frame_margin,
        text_x,
        text_top,
        max_text_width,
        font,
        footer,
        scale,
    }
}
