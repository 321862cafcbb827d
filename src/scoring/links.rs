// src/scoring/links.rs
// =============================================================================
// Scores outbound links by how likely they are to answer the question.
//
// Scoring rules (per link):
//   +3 for each question keyword found inside any keyword of the URL path
//   +2 for each question keyword found inside the anchor text
//   +1 for each "helpful page" word found anywhere in the URL or anchor text
//
// This is deliberately simple keyword overlap, not a ranking model.
// =============================================================================

use serde::Serialize;

use super::keywords::url_keywords;
use crate::fetch::PageLink;

// Pages that tend to hold the answers visitors ask about
const HELPFUL_INDICATORS: &[&str] = &[
    "support", "help", "faq", "contact", "about",
    "policy", "return", "refund", "shipping",
    "product", "service", "documentation", "guide",
];

/// A link together with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredLink {
    pub url: String,
    pub text: String,
    pub score: u32,
}

/// Scores one link against the question keywords. Never negative.
pub fn score_link(link: &PageLink, keywords: &[String]) -> u32 {
    let url = link.url.to_lowercase();
    let text = link.text.to_lowercase();
    let path_keywords = url_keywords(&url);

    let mut score = 0;

    for keyword in keywords {
        let keyword = keyword.to_lowercase();

        if path_keywords.iter().any(|pk| pk.contains(&keyword)) {
            score += 3;
        }
        if text.contains(&keyword) {
            score += 2;
        }
    }

    score += HELPFUL_INDICATORS
        .iter()
        .filter(|indicator| url.contains(*indicator) || text.contains(*indicator))
        .count() as u32;

    score
}

/// Scores every link, drops the zero scores and sorts best-first.
///
/// The sort is stable, so links with equal scores keep their discovery order.
pub fn rank_links(links: &[PageLink], keywords: &[String]) -> Vec<ScoredLink> {
    let mut scored: Vec<ScoredLink> = links
        .iter()
        .filter_map(|link| {
            let score = score_link(link, keywords);
            (score > 0).then(|| ScoredLink {
                url: link.url.clone(),
                text: link.text.clone(),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
