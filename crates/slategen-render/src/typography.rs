//! Shrink-to-fit descriptor typography.
//!
//! The loop only enforces the vertical budget; horizontal fit is the aspect
//! ratio search's job. Shrinking is geometric (5% per step) and bounded, so
//! the worst case is a fixed number of pure-arithmetic iterations.

use slategen_core::SlateDesign;

/// The chosen descriptor typography for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontFit {
    pub font_size: f64,
    /// Gap between consecutive descriptor lines.
    pub line_gap: f64,
    /// One slack share added above the first line; keeps short lists visually
    /// balanced while the block stays top-anchored.
    pub lead: f64,
}

pub fn fit_descriptor_font(
    lines: usize,
    available_height: f64,
    base_font_size: f64,
    design: &SlateDesign,
) -> FontFit {
    if lines == 0 {
        return FontFit {
            font_size: base_font_size,
            line_gap: 0.0,
            lead: 0.0,
        };
    }

    let n = lines as f64;
    let mut font_size = base_font_size;
    for _ in 0..design.shrink_iterations {
        let min_gap = font_size * design.min_gap_ratio;
        let min_block = n * font_size + (n - 1.0) * min_gap;
        if min_block <= available_height {
            let slack = available_height - min_block;
            let extra = slack / (n + 2.0);
            let line_gap = (min_gap + extra).min(font_size * design.max_gap_ratio);
            return FontFit {
                font_size,
                line_gap,
                lead: extra,
            };
        }
        font_size *= design.shrink_factor;
    }

    // Iteration cap reached. Emit the smallest size tried with the minimum
    // gap; pathological budgets may still overflow, which the caller accepts
    // over shrinking text into illegibility.
    FontFit {
        font_size,
        line_gap: font_size * design.min_gap_ratio,
        lead: 0.0,
    }
}
