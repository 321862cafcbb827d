// src/scoring/mod.rs
// =============================================================================
// The relevance scorer: keyword extraction, link scoring, content trimming.
//
// Submodules:
// - keywords: question -> keywords, URL -> keywords
// - links: scoring and ranking of outbound links
// - content: keeping only the sentences that mention a keyword
//
// This file also builds a small navigation strategy on top of those pieces,
// used by the `links` subcommand to explain where it would go next.
// =============================================================================

mod content;
mod keywords;
mod links;

pub use content::extract_relevant_content;
pub(crate) use content::truncate_chars;
pub use keywords::{extract_keywords, url_keywords};
pub use links::{rank_links, score_link, ScoredLink};

use serde::Serialize;

use crate::fetch::PageLink;

// How many ranked links a strategy recommends
const RECOMMENDED_LINKS: usize = 3;

/// Where to go next from a page, and why.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationStrategy {
    /// Whether the current page's own URL already mentions a question keyword
    pub current_page_relevant: bool,
    /// The best few outbound links, best first
    pub recommended: Vec<ScoredLink>,
    /// Human-readable notes about the recommendation
    pub reasoning: Vec<String>,
}

/// Suggests a navigation strategy for the page at `current_url`.
pub fn navigation_strategy(
    current_url: &str,
    keywords: &[String],
    links: &[PageLink],
) -> NavigationStrategy {
    let current_keywords = url_keywords(current_url);
    let current_page_relevant = keywords.iter().any(|k| current_keywords.contains(k));

    let ranked = rank_links(links, keywords);

    let mut reasoning = Vec::new();
    if !current_page_relevant {
        reasoning.push("Current page doesn't seem directly relevant to the question".to_string());
    }
    if ranked.is_empty() {
        reasoning.push(
            "No obviously relevant pages found, may need to explore systematically".to_string(),
        );
    } else {
        reasoning.push(format!("Found {} potentially relevant pages", ranked.len()));
    }

    NavigationStrategy {
        current_page_relevant,
        recommended: ranked.into_iter().take(RECOMMENDED_LINKS).collect(),
        reasoning,
    }
}
