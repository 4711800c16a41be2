#![forbid(unsafe_code)]

//! esrb.org rating-record resolver.
//!
//! Produces [`RatingRecord`]s for the renderer by searching esrb.org,
//! disambiguating results through an ordered match cascade, scraping rating
//! detail pages and caching resolved records as JSON on disk. The renderer
//! itself never touches the network; this crate is its opaque upstream
//! supplier.

mod assets;
pub mod cache;
mod detail;
mod search;

use std::path::Path;
use std::time::Duration;

use slategen_core::RatingRecord;

pub use cache::RecordCache;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Game \"{query}\" not found.")]
    GameNotFound { query: String },
    #[error("Invalid URL format (expected https://www.esrb.org/ratings/<id>/...): {url}")]
    InvalidUrl { url: String },
    #[error("Could not extract game title from the rating page")]
    MissingTitle,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Browser-like identity; the search endpoint serves bot-looking agents an
/// empty shell page.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ESRB_BASE: &str = "https://www.esrb.org";
const CDN_IMAGES_PATH: &str = "/wp-content/themes/esrb/assets/images";

pub struct Resolver {
    client: reqwest::blocking::Client,
    base_url: String,
    cdn_base: String,
    cache: RecordCache,
}

impl Resolver {
    pub fn new() -> Result<Self> {
        Self::with_base_url(ESRB_BASE, RecordCache::open_default())
    }

    /// Resolver against an alternate host. Tests point this at a local
    /// fixture server.
    pub fn with_base_url(base_url: impl Into<String>, cache: RecordCache) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            cdn_base: format!("{base_url}{CDN_IMAGES_PATH}"),
            client,
            base_url,
            cache,
        })
    }

    /// Search-driven resolution: query esrb.org, disambiguate, scrape the
    /// winning candidate's detail page.
    pub fn resolve_by_title(&self, query: &str, platform: Option<&str>) -> Result<RatingRecord> {
        search::resolve_by_title(self, query, platform)
    }

    /// Resolution from a rating detail URL such as
    /// `https://www.esrb.org/ratings/40649/borderlands-4/`.
    pub fn resolve_by_url(&self, raw_url: &str) -> Result<RatingRecord> {
        let Some(id) = detail::rating_id_from_url(raw_url) else {
            return Err(Error::InvalidUrl {
                url: raw_url.to_string(),
            });
        };
        self.resolve_by_id(id)
    }

    /// Resolution by rating id, consulting the on-disk cache first.
    pub fn resolve_by_id(&self, id: u64) -> Result<RatingRecord> {
        if let Some(record) = self.cache.load(id) {
            tracing::info!(id, title = %record.title, "using cached rating record");
            return Ok(record);
        }

        let url = format!("{}/ratings/{id}/", self.base_url);
        let html = self.get_text(&url)?;
        let record = detail::parse_detail_page(&html, id, &url)?;
        self.cache.store(&record);
        Ok(record)
    }

    /// Populates `<asset-root>/icons/` with the six category icons from the
    /// ESRB CDN. Existing files are kept; per-file failures are logged and do
    /// not abort the run.
    pub fn download_icons(&self, asset_root: &Path) -> Result<()> {
        assets::download_icons(self, asset_root)
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn cdn_base(&self) -> &str {
        &self.cdn_base
    }

    pub(crate) fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }

    pub(crate) fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}
