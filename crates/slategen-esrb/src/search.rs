//! Search scraping and result disambiguation.
//!
//! The exact-match sweep walks up to three result pages; everything after
//! that is an ordered chain of independent fallback strategies over the
//! page-1 candidates. Each strategy answers on its own or passes; the chain
//! order is significant and mirrors how a human would relax the query.

use scraper::{Html, Selector};
use slategen_core::RatingRecord;

use crate::detail::rating_id_from_url;
use crate::{Error, Resolver, Result};

const MAX_SEARCH_PAGES: u32 = 3;
const ALL_PLATFORMS: &str = "All Platforms";

fn selector(src: &str) -> Selector {
    Selector::parse(src).expect("valid selector")
}

/// Lowercased, whitespace-collapsed text for comparisons.
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    /// Normalized title used for matching.
    pub title: String,
    /// Normalized platform list used for filtering.
    pub platforms: String,
    pub detail_id: u64,
    pub title_raw: String,
}

pub(crate) fn parse_search_results(html: &str) -> Vec<Candidate> {
    let doc = Html::parse_document(html);
    let game_sel = selector(".game");
    let heading_sel = selector(".heading a");
    let platforms_sel = selector(".platforms");

    let mut candidates = Vec::new();
    for game in doc.select(&game_sel) {
        let Some(link) = game.select(&heading_sel).next() else {
            continue;
        };
        let title_raw = link.text().collect::<String>().trim().to_string();
        let href = link.value().attr("href").unwrap_or_default();
        let Some(detail_id) = rating_id_from_url(href) else {
            tracing::debug!(title = %title_raw, href, "search result has no usable detail link, skipping");
            continue;
        };
        let platforms = game
            .select(&platforms_sel)
            .next()
            .map(|e| normalize(&e.text().collect::<String>()))
            .unwrap_or_default();
        candidates.push(Candidate {
            title: normalize(&title_raw),
            platforms,
            detail_id,
            title_raw,
        });
    }
    candidates
}

fn platform_ok(candidate: &Candidate, platform: Option<&str>) -> bool {
    platform.is_none_or(|p| candidate.platforms.contains(p))
}

fn match_exact(candidates: &[Candidate], query: &str, platform: Option<&str>) -> Option<usize> {
    candidates
        .iter()
        .position(|c| platform_ok(c, platform) && c.title == query)
}

fn match_partial(candidates: &[Candidate], query: &str, platform: Option<&str>) -> Option<usize> {
    candidates
        .iter()
        .position(|c| platform_ok(c, platform) && c.title.contains(query))
}

fn match_exact_any_platform(
    candidates: &[Candidate],
    query: &str,
    _platform: Option<&str>,
) -> Option<usize> {
    candidates.iter().position(|c| c.title == query)
}

fn match_partial_any_platform(
    candidates: &[Candidate],
    query: &str,
    _platform: Option<&str>,
) -> Option<usize> {
    candidates.iter().position(|c| c.title.contains(query))
}

fn match_first(candidates: &[Candidate], _query: &str, _platform: Option<&str>) -> Option<usize> {
    (!candidates.is_empty()).then_some(0)
}

type MatchStrategy = fn(&[Candidate], &str, Option<&str>) -> Option<usize>;

/// Page-1 fallbacks tried after the exact-match sweep, most specific first.
const FALLBACK_STRATEGIES: &[(&str, MatchStrategy)] = &[
    ("partial-title", match_partial),
    ("exact-any-platform", match_exact_any_platform),
    ("partial-any-platform", match_partial_any_platform),
    ("first-result", match_first),
];

fn fetch_candidates(
    resolver: &Resolver,
    query: &str,
    platform: Option<&str>,
    page: u32,
) -> Result<Vec<Candidate>> {
    let mut url = url::Url::parse(&format!("{}/search/", resolver.base_url()))
        .map_err(|_| Error::InvalidUrl {
            url: resolver.base_url().to_string(),
        })?;
    url.query_pairs_mut()
        .append_pair("searchKeyword", query)
        .append_pair("platform", platform.unwrap_or(ALL_PLATFORMS))
        .append_pair("pg", &page.to_string());

    let html = resolver.get_text(url.as_str())?;
    Ok(parse_search_results(&html))
}

pub(crate) fn resolve_by_title(
    resolver: &Resolver,
    query: &str,
    platform: Option<&str>,
) -> Result<RatingRecord> {
    let query_norm = normalize(query);
    let platform_norm = platform.map(normalize);
    tracing::info!(query, platform = platform.unwrap_or("any"), "searching esrb.org");

    let mut page1: Vec<Candidate> = Vec::new();
    for page in 1..=MAX_SEARCH_PAGES {
        if page > 1 {
            tracing::info!(page, "exact match not found yet, checking the next page");
        }
        let candidates = fetch_candidates(resolver, query, platform, page)?;
        if page == 1 {
            page1 = candidates.clone();
        }
        if let Some(idx) = match_exact(&candidates, &query_norm, platform_norm.as_deref()) {
            return resolver.resolve_by_id(candidates[idx].detail_id);
        }
    }

    for (name, strategy) in FALLBACK_STRATEGIES {
        let Some(idx) = strategy(&page1, &query_norm, platform_norm.as_deref()) else {
            continue;
        };
        let candidate = &page1[idx];
        if *name == "first-result" {
            tracing::warn!(
                title = %candidate.title_raw,
                "specific match not found, using the top search result"
            );
        } else {
            tracing::debug!(strategy = name, title = %candidate.title_raw, "fallback match");
        }
        return resolver.resolve_by_id(candidate.detail_id);
    }

    Err(Error::GameNotFound {
        query: query.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, platforms: &str, id: u64) -> Candidate {
        Candidate {
            title: normalize(title),
            platforms: normalize(platforms),
            detail_id: id,
            title_raw: title.to_string(),
        }
    }

    fn ambiguous() -> Vec<Candidate> {
        vec![
            candidate("Borderlands 2 VR", "PlayStation 4, PC", 1),
            candidate("Borderlands 2", "PC, Xbox 360, PlayStation 3", 2),
        ]
    }

    #[test]
    fn exact_match_beats_an_earlier_partial_match() {
        let idx = match_exact(&ambiguous(), "borderlands 2", Some("pc")).expect("match");
        assert_eq!(ambiguous()[idx].detail_id, 2);
    }

    #[test]
    fn platform_filter_excludes_other_platforms() {
        assert!(match_exact(&ambiguous(), "borderlands 2", Some("switch")).is_none());
        assert_eq!(match_exact(&ambiguous(), "borderlands 2", None), Some(1));
    }

    #[test]
    fn fallback_chain_relaxes_in_order() {
        let cands = ambiguous();

        // Partial title with matching platform.
        let (name, strategy) = FALLBACK_STRATEGIES[0];
        assert_eq!(name, "partial-title");
        assert_eq!(strategy(&cands, "borderlands", Some("xbox 360")), Some(1));

        // Exact title once the platform is ignored.
        let (name, strategy) = FALLBACK_STRATEGIES[1];
        assert_eq!(name, "exact-any-platform");
        assert_eq!(strategy(&cands, "borderlands 2", Some("switch")), Some(1));

        // Partial title once the platform is ignored.
        let (name, strategy) = FALLBACK_STRATEGIES[2];
        assert_eq!(name, "partial-any-platform");
        assert_eq!(strategy(&cands, "borderlands 2 v", Some("switch")), Some(0));

        // First result as the last resort.
        let (name, strategy) = FALLBACK_STRATEGIES[3];
        assert_eq!(name, "first-result");
        assert_eq!(strategy(&cands, "does not appear", Some("switch")), Some(0));
        assert_eq!(strategy(&[], "anything", None), None);
    }

    #[test]
    fn search_results_parse_titles_platforms_and_ids() {
        let html = r#"
        <div class="game">
          <div class="heading"><h2><a href="/ratings/32333/borderlands-2/">Borderlands 2</a></h2></div>
          <div class="platforms">Windows PC, Xbox 360</div>
          <div class="content"><img src="m.svg"/></div>
        </div>
        <div class="game">
          <div class="heading"><h2><a href="#">No Detail Link</a></h2></div>
        </div>
        "#;
        let candidates = parse_search_results(html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "borderlands 2");
        assert_eq!(candidates[0].title_raw, "Borderlands 2");
        assert_eq!(candidates[0].platforms, "windows pc, xbox 360");
        assert_eq!(candidates[0].detail_id, 32333);
    }

    #[test]
    fn normalize_collapses_case_and_whitespace() {
        assert_eq!(normalize("  Borderlands\n   2  "), "borderlands 2");
    }
}
