//! Automatic aspect-ratio selection.
//!
//! The slate never wraps text, so the ratio is the primary overflow-avoidance
//! mechanism; font shrinking is a vertical-only safety net. The search sweeps
//! the supported band narrowest-first and takes the first candidate whose
//! trial geometry holds every descriptor at the reference bold font.

use slategen_core::{AspectRatio, RenderOptions, SlateDesign};

use crate::layout;
use crate::text::{TextMeasurer, TextStyle};

pub fn select_aspect_ratio(
    descriptors: &[String],
    has_footer: bool,
    options: &RenderOptions,
    icon_aspect_ratio: f64,
    design: &SlateDesign,
    measurer: &dyn TextMeasurer,
) -> AspectRatio {
    for candidate in AspectRatio::auto_candidates() {
        let trial = layout::panel_layout(
            candidate,
            options,
            icon_aspect_ratio,
            descriptors.len(),
            has_footer,
            design,
        );
        let style = TextStyle {
            font_size: design.base_font_size * trial.scale,
            bold: true,
        };
        let fits = descriptors
            .iter()
            .all(|d| measurer.measure(d, &style).width <= trial.max_text_width);
        if fits {
            tracing::debug!(ratio = %candidate, "descriptors fit without wrapping");
            return candidate;
        }
    }

    tracing::warn!(
        "descriptors do not fit at any supported aspect ratio, falling back to 21:9"
    );
    AspectRatio::widest()
}
