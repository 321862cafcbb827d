// src/fetch/mod.rs
// =============================================================================
// The page fetcher: given a URL, return the page's title, cleaned text and
// same-domain links, or a typed failure.
//
// Submodules:
// - html: turns an HTML document into a FetchedPage (pure, no I/O)
// - http: the reqwest-backed fetcher used by the real CLI
//
// The crawl loop only sees the PageFetcher trait, so tests can plug in a
// scripted fetcher instead of hitting the network.
// =============================================================================

mod html;
mod http;

pub use html::{extract_page, MAX_CONTENT_CHARS, MAX_LINKS};
pub use http::HttpFetcher;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{AgentError, FetchError};
use url::Url;

/// An outbound link found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Absolute URL
    pub url: String,
    /// Anchor text, trimmed and whitespace-collapsed
    pub text: String,
}

/// What a successful fetch returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub title: String,
    /// Cleaned page text, at most MAX_CONTENT_CHARS characters
    pub content: String,
    /// Same-domain links in document order, at most MAX_LINKS
    pub links: Vec<PageLink>,
}

/// Anything that can turn a URL into a FetchedPage.
///
/// Implementations must only return links on the same domain as `url`;
/// the frontier accepts whatever it is given.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError>;
}

/// Cleans up a user-supplied start URL.
///
/// Trims it, adds "https://" when there is no http(s) scheme, and checks it
/// parses. The result is in `url`'s canonical form ("example.com" becomes
/// "https://example.com/"), which is also how discovered links are written.
pub fn normalize_start_url(raw: &str) -> Result<String, AgentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AgentError::InvalidInput("website URL cannot be empty".to_string()));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    Url::parse(&with_scheme)
        .map(|url| url.to_string())
        .map_err(|e| AgentError::InvalidInput(format!("invalid website URL '{trimmed}': {e}")))
}
