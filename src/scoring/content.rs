// src/scoring/content.rs
// =============================================================================
// Trims a page down to the sentences that mention the question's keywords.
// =============================================================================

// How much of the page we keep when no sentence matches
const FALLBACK_CHARS: usize = 1000;

/// Keeps only the sentence-like units (split on '.') that contain a keyword.
///
/// Matching is a case-insensitive substring test. When nothing matches the
/// first 1000 characters of the page are returned instead. Empty content or
/// an empty keyword list returns the content unchanged.
pub fn extract_relevant_content(content: &str, keywords: &[String]) -> String {
    if content.is_empty() || keywords.is_empty() {
        return content.to_string();
    }

    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let relevant: Vec<&str> = content
        .split('.')
        .map(str::trim)
        .filter(|sentence| {
            let lowered = sentence.to_lowercase();
            keywords.iter().any(|k| lowered.contains(k.as_str()))
        })
        .collect();

    if relevant.is_empty() {
        return truncate_chars(content, FALLBACK_CHARS);
    }

    relevant.join(". ")
}

/// Cuts a string to at most `max` characters (not bytes).
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
