//! Rating detail-page scraping.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};
use slategen_core::{RatingCategory, RatingRecord};

use crate::{Error, Result};

fn selector(src: &str) -> Selector {
    Selector::parse(src).expect("valid selector")
}

/// Extracts the numeric rating id from a `/ratings/<id>/` style URL.
pub(crate) fn rating_id_from_url(url: &str) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"/ratings/(\d+)(?:/|$)").expect("valid regex"));
    re.captures(url)?.get(1)?.as_str().parse().ok()
}

/// Collapses runs of whitespace; scraped nodes carry template indentation.
fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_comma_list(text: &str) -> Vec<String> {
    squash(text)
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn parse_detail_page(html: &str, id: u64, url: &str) -> Result<RatingRecord> {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&selector(".synopsis-header h1"))
        .next()
        .map(|e| squash(&e.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .ok_or(Error::MissingTitle)?;

    // The page template repeats .platforms-txt in secondary sections; only
    // the first occurrence is the real platform list.
    let platforms = doc
        .select(&selector(".platforms-txt"))
        .next()
        .map(|e| squash(&e.text().collect::<String>()))
        .filter(|p| !p.is_empty());

    let category = match doc
        .select(&selector(".info-img img"))
        .next()
        .and_then(|e| e.value().attr("src"))
    {
        Some(src) => RatingCategory::from_icon_url(src),
        None => {
            tracing::warn!(id, "rating page has no rating image, assuming Rating Pending");
            RatingCategory::RatingPending
        }
    };

    let descriptors = doc
        .select(&selector(".description"))
        .next()
        .map(|e| split_comma_list(&e.text().collect::<String>()))
        .unwrap_or_default();

    let interactive_elements: Vec<String> = doc
        .select(&selector(".other-info ul li"))
        .map(|e| squash(&e.text().collect::<String>()))
        .filter(|s| !s.is_empty())
        .collect();

    tracing::info!(%title, category = %category, "resolved rating record");

    Ok(RatingRecord {
        title,
        category,
        descriptors,
        interactive_elements,
        platforms,
        esrb_id: Some(id),
        esrb_url: Some(url.to_string()),
    })
}
