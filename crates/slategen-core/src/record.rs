use serde::{Deserialize, Serialize};

/// Descriptor sentinel emitted by esrb.org when a title carries no content
/// descriptors. A record whose descriptor list is exactly this one entry takes
/// the icon-only layout path.
pub const NO_DESCRIPTORS: &str = "No Descriptors";

/// Interactive-element entries containing this phrase (case-insensitive) mean
/// "not applicable" and are dropped before any footer allocation.
const NOT_RATED_PHRASE: &str = "not rated by the esrb";

#[derive(Debug, thiserror::Error)]
#[error("Unknown rating category: {input}")]
pub struct CategoryParseError {
    pub input: String,
}

/// The fixed ESRB rating enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingCategory {
    Everyone,
    Everyone10Plus,
    Teen,
    Mature,
    AdultsOnly,
    RatingPending,
}

impl RatingCategory {
    pub const ALL: [RatingCategory; 6] = [
        RatingCategory::Everyone,
        RatingCategory::Everyone10Plus,
        RatingCategory::Teen,
        RatingCategory::Mature,
        RatingCategory::AdultsOnly,
        RatingCategory::RatingPending,
    ];

    /// Short file-name code identifying this category's icon asset
    /// (`<asset-root>/icons/<stem>.svg`). Matches the stems used by the ESRB
    /// CDN, so downloaded assets need no renaming.
    pub fn asset_stem(self) -> &'static str {
        match self {
            RatingCategory::Everyone => "E",
            RatingCategory::Everyone10Plus => "E10plus",
            RatingCategory::Teen => "T",
            RatingCategory::Mature => "M",
            RatingCategory::AdultsOnly => "AO",
            RatingCategory::RatingPending => "RP",
        }
    }

    /// Recovers a category from a rating-icon URL as found on esrb.org search
    /// and detail pages. Matching is by lowercase file stem; anything
    /// unrecognized is treated as Rating Pending, mirroring the site's own
    /// placeholder behavior.
    pub fn from_icon_url(url: &str) -> Self {
        let filename = url
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let stem = filename.split('.').next().unwrap_or_default();

        match stem {
            s if s.contains("e10plus") || s.contains("e10+") || s.contains("everyone 10") => {
                RatingCategory::Everyone10Plus
            }
            "e" | "everyone" => RatingCategory::Everyone,
            "t" | "teen" => RatingCategory::Teen,
            "m" | "mature" => RatingCategory::Mature,
            "ao" => RatingCategory::AdultsOnly,
            _ => RatingCategory::RatingPending,
        }
    }
}

impl std::fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RatingCategory::Everyone => "Everyone",
            RatingCategory::Everyone10Plus => "Everyone 10+",
            RatingCategory::Teen => "Teen",
            RatingCategory::Mature => "Mature 17+",
            RatingCategory::AdultsOnly => "Adults Only 18+",
            RatingCategory::RatingPending => "Rating Pending",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for RatingCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "e" | "everyone" => Ok(RatingCategory::Everyone),
            "e10plus" | "e10+" | "e10" | "everyone10+" | "everyone 10+" => {
                Ok(RatingCategory::Everyone10Plus)
            }
            "t" | "teen" => Ok(RatingCategory::Teen),
            "m" | "mature" => Ok(RatingCategory::Mature),
            "ao" | "adults only" | "adultsonly" => Ok(RatingCategory::AdultsOnly),
            "rp" | "rating pending" | "ratingpending" => Ok(RatingCategory::RatingPending),
            _ => Err(CategoryParseError {
                input: s.to_string(),
            }),
        }
    }
}

/// A resolved rating record: the immutable input to the render pipeline.
///
/// `descriptors` and `interactive_elements` preserve insertion order; the
/// renderer draws descriptors in exactly this order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRecord {
    pub title: String,
    pub category: RatingCategory,
    pub descriptors: Vec<String>,
    #[serde(default)]
    pub interactive_elements: Vec<String>,
    #[serde(default)]
    pub platforms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esrb_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esrb_url: Option<String>,
}

impl RatingRecord {
    /// Interactive elements with "Not Rated by the ESRB" placeholders removed.
    /// Footer allocation keys off this list being non-empty, never off the raw
    /// one.
    pub fn filtered_interactive_elements(&self) -> Vec<&str> {
        self.interactive_elements
            .iter()
            .map(String::as_str)
            .filter(|e| !e.to_ascii_lowercase().contains(NOT_RATED_PHRASE))
            .collect()
    }

    /// True when the descriptor list is exactly the "No Descriptors" sentinel,
    /// which bypasses the panel/frame/footer layout entirely.
    pub fn has_placeholder_descriptors(&self) -> bool {
        matches!(self.descriptors.as_slice(), [only] if only == NO_DESCRIPTORS)
    }
}
