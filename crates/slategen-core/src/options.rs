use std::path::Path;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum RatioError {
    #[error("Aspect ratio must be in the format W:H (e.g. 16:9) or \"auto\": {input}")]
    Malformed { input: String },
    #[error("Aspect ratio values must be positive integers: {input}")]
    NonPositive { input: String },
    #[error("Aspect ratio must be between 16:9 and 21:9: {input}")]
    OutOfRange { input: String },
}

/// A validated W:H aspect ratio, constrained to the slate's supported band
/// [16:9, 21:9]. The renderer consumes it as a height factor (h / w).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> Result<Self, RatioError> {
        let input = format!("{width}:{height}");
        if width == 0 || height == 0 {
            return Err(RatioError::NonPositive { input });
        }
        // Compare as integer cross-products so 16:9 and 21:9 themselves sit
        // exactly on the bounds.
        let (w, h) = (u64::from(width), u64::from(height));
        if w * 9 < h * 16 || w * 9 > h * 21 {
            return Err(RatioError::OutOfRange { input });
        }
        Ok(Self { width, height })
    }

    /// The narrowest supported ratio; first candidate of the auto search.
    pub fn narrowest() -> Self {
        Self { width: 16, height: 9 }
    }

    /// The widest supported ratio; the guaranteed-if-imperfect fallback when
    /// no auto-search candidate fits.
    pub fn widest() -> Self {
        Self { width: 21, height: 9 }
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    /// Height as a fraction of width (16:9 -> 0.5625). All canvas math is
    /// phrased in terms of this factor.
    pub fn height_factor(self) -> f64 {
        f64::from(self.height) / f64::from(self.width)
    }

    /// Candidates swept by automatic selection: the numerator is pinned at 9
    /// and the denominator runs 16..=21, narrowest first.
    pub fn auto_candidates() -> impl Iterator<Item = AspectRatio> {
        (16..=21).map(|width| AspectRatio { width, height: 9 })
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = RatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let Some((w, h)) = raw.split_once(':') else {
            return Err(RatioError::Malformed {
                input: raw.to_string(),
            });
        };
        let (Ok(w), Ok(h)) = (w.trim().parse::<u32>(), h.trim().parse::<u32>()) else {
            return Err(RatioError::Malformed {
                input: raw.to_string(),
            });
        };
        Self::new(w, h)
    }
}

/// Either an explicit ratio or the auto-selection sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatioRequest {
    #[default]
    Auto,
    Exact(AspectRatio),
}

impl FromStr for RatioRequest {
    type Err = RatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(RatioRequest::Auto);
        }
        Ok(RatioRequest::Exact(s.parse()?))
    }
}

/// Output canvas tier. Letterboxed renders use the full nominal size;
/// variable-width renders keep the height and derive the width from the ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionTier {
    #[default]
    Standard,
    High,
}

impl ResolutionTier {
    pub fn width(self) -> u32 {
        match self {
            ResolutionTier::Standard => 1920,
            ResolutionTier::High => 3840,
        }
    }

    pub fn height(self) -> u32 {
        match self {
            ResolutionTier::Standard => 1080,
            ResolutionTier::High => 2160,
        }
    }
}

/// Raster output encoding, selected from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }

    /// Format for a requested output path; unrecognized or missing extensions
    /// default to png.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .unwrap_or_default()
    }
}

/// Caller-facing render options.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// 0 selects variable-width/borderless mode; >0 selects letterboxed
    /// fixed-resolution mode with this inset in pixels.
    pub margin: u32,
    pub resolution: ResolutionTier,
    pub ratio: RatioRequest,
    pub format: OutputFormat,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            margin: 0,
            resolution: ResolutionTier::Standard,
            ratio: RatioRequest::Auto,
            format: OutputFormat::Png,
        }
    }
}

impl RenderOptions {
    pub fn letterboxed(&self) -> bool {
        self.margin > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_ratios_parse() {
        for s in ["16:9", "17:9", "18:9", "19:9", "20:9", "21:9", "32:18", "48:27"] {
            let ratio: AspectRatio = s.parse().unwrap_or_else(|e| panic!("{s}: {e}"));
            assert!(ratio.height_factor() > 0.0);
        }
    }

    #[test]
    fn out_of_range_ratios_are_rejected() {
        for s in ["4:3", "15:9", "22:9", "1:1", "9:16"] {
            assert!(matches!(
                s.parse::<AspectRatio>(),
                Err(RatioError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn malformed_ratios_are_rejected() {
        for s in ["16x9", "16", "", "a:b", "16:9:1"] {
            assert!(matches!(
                s.parse::<AspectRatio>(),
                Err(RatioError::Malformed { .. })
            ));
        }
        assert!(matches!(
            "0:9".parse::<AspectRatio>(),
            Err(RatioError::NonPositive { .. })
        ));
    }

    #[test]
    fn auto_sentinel_parses_case_insensitively() {
        assert_eq!("auto".parse::<RatioRequest>().ok(), Some(RatioRequest::Auto));
        assert_eq!("AUTO".parse::<RatioRequest>().ok(), Some(RatioRequest::Auto));
        assert!(matches!(
            "16:9".parse::<RatioRequest>(),
            Ok(RatioRequest::Exact(_))
        ));
    }

    #[test]
    fn height_factor_matches_hand_math() {
        let sixteen: AspectRatio = "16:9".parse().expect("valid");
        assert!((sixteen.height_factor() - 0.5625).abs() < 1e-12);
    }

    #[test]
    fn format_from_path_defaults_to_png() {
        assert_eq!(OutputFormat::from_path(Path::new("out.png")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("out.jpg")), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("out.JPEG")), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("out.webp")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Png);
    }
}
