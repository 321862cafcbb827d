// src/scoring/keywords.rs
// =============================================================================
// Turns free text into keyword lists.
//
// - extract_keywords: the question -> the terms we look for on pages
// - url_keywords: a URL path -> the terms the path "talks about"
//
// Both are pure and deterministic: same input, same output, no I/O.
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

// Question words, articles, prepositions and a few filler verbs.
// Anything of length <= 2 is dropped separately, so "i", "do", "a" etc.
// don't need to be here.
const STOP_WORDS: &[&str] = &[
    "how", "what", "where", "when", "why", "who", "which", "can", "could",
    "would", "should", "do", "does", "did", "is", "are", "was", "were",
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
    "of", "with", "by", "from", "up", "about", "into", "through", "during",
    "before", "after", "above", "below", "between", "among", "around",
    "get", "got", "you", "your", "our", "have", "has", "had", "this", "that",
    "these", "those", "there", "will", "may", "might", "must", "shall", "tell",
];

// Path segments that say nothing about a page's topic
const GENERIC_PATH_WORDS: &[&str] = &["www", "index", "home", "page", "default", "main"];

// Minimum keyword length (in characters) is this + 1
const MAX_DROPPED_LEN: usize = 2;

fn page_extension() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Constant pattern, known to be valid
    RE.get_or_init(|| Regex::new(r"\.(html|htm|php|asp|jsp)$").expect("valid extension regex"))
}

/// Extracts the important terms from a user question.
///
/// Lower-cases, strips punctuation, splits on whitespace, then drops stop
/// words and short tokens. Order is preserved and duplicates are kept.
///
/// Example:
///   "How do I get a refund?" -> ["refund"]
pub fn extract_keywords(question: &str) -> Vec<String> {
    // Keep letters, digits, underscores and whitespace; everything else goes
    let cleaned: String = question
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > MAX_DROPPED_LEN)
        .filter(|word| !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Extracts topic terms from the path of a URL.
///
/// Example:
///   "https://shop.example.com/help/return-policy.html" -> ["help", "return", "policy"]
///
/// Returns an empty list when the URL can't be parsed.
pub fn url_keywords(url: &str) -> Vec<String> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return Vec::new(),
    };

    let path = parsed.path().to_lowercase();
    let path = page_extension().replace(&path, "");

    path.split(|c| matches!(c, '/' | '_' | '-' | '.'))
        .filter(|part| !part.is_empty())
        .filter(|part| !GENERIC_PATH_WORDS.contains(part))
        .filter(|part| part.chars().count() > MAX_DROPPED_LEN)
        .map(str::to_string)
        .collect()
}
