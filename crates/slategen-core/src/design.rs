/// Design-unit constants for the slate, authored against a 650-unit reference
/// box height and rescaled linearly to the actual main-band height.
///
/// These are passed into the layout engine as explicit configuration rather
/// than read from globals, so tests can exercise the geometry with synthetic
/// values.
#[derive(Debug, Clone)]
pub struct SlateDesign {
    /// Height of the reference design box, in design units.
    pub reference_height: f64,
    /// Fraction of total box height reserved for the footer band when
    /// interactive elements are present.
    pub footer_share: f64,
    /// Main frame stroke thickness, design units.
    pub frame_thickness: f64,
    /// Inset from the box edge to the frame's outer edge, design units.
    pub frame_margin: f64,
    /// Inset from the box edge to the icon, design units.
    pub icon_padding: f64,
    /// Gap between the icon's right edge and the descriptor column, design units.
    pub text_padding: f64,
    /// Safety gap between the descriptor column and the frame's inner-right
    /// edge, design units.
    pub right_padding: f64,
    /// Descriptor font size before any shrinking, design units.
    pub base_font_size: f64,
    /// Multiplier applied to the font size on each shrink iteration.
    pub shrink_factor: f64,
    /// Upper bound on shrink iterations.
    pub shrink_iterations: u32,
    /// Minimum inter-line gap as a fraction of the font size.
    pub min_gap_ratio: f64,
    /// Maximum inter-line gap as a fraction of the font size.
    pub max_gap_ratio: f64,
    /// Vertical safety inset subtracted from the text budget, design units.
    pub text_safety_inset: f64,
    /// Separator between interactive-element strings in the footer.
    pub footer_separator: &'static str,
    /// At most this many interactive elements are rendered in the footer.
    pub footer_max_items: usize,
}

impl Default for SlateDesign {
    fn default() -> Self {
        Self {
            reference_height: 650.0,
            footer_share: 0.195,
            frame_thickness: 22.0,
            frame_margin: 10.0,
            icon_padding: 4.0,
            text_padding: 32.0,
            right_padding: 20.0,
            base_font_size: 82.0,
            shrink_factor: 0.95,
            shrink_iterations: 20,
            min_gap_ratio: 0.25,
            max_gap_ratio: 0.60,
            text_safety_inset: 20.0,
            footer_separator: ", ",
            footer_max_items: 3,
        }
    }
}
