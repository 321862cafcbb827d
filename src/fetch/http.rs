// src/fetch/http.rs
// =============================================================================
// Fetches pages over HTTP with reqwest and hands the HTML to `extract_page`.
//
// Key functionality:
// - One GET per page, with a per-request timeout
// - Follows redirects (up to 5), links are resolved against the final URL
// - Maps reqwest failures onto the FetchError taxonomy
//
// There is no retry and no parallelism here: the crawl loop fetches exactly
// one page at a time.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{extract_page, FetchedPage, PageFetcher};
use crate::error::FetchError;

// Some sites refuse obvious bots, so look like a normal browser
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// reqwest-backed PageFetcher.
///
/// Client is cheap to clone (it's a reference counter internally), so one
/// HttpFetcher can be shared by every run.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        // Reject garbage before touching the network
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        // Send the GET request (redirects are followed by the client)
        let response = self
            .client
            .get(parsed)
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        // Anything outside 2xx counts as a failed fetch
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // After redirects, relative links are relative to where we ended up
        let final_url = response.url().clone();

        // Read the body as text (reqwest handles the charset)
        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Parse(format!("could not read body: {e}")))?;

        // Pull out title, visible text and same-site links in one pass
        let page = extract_page(&html, &final_url);
        debug!(
            url = %final_url,
            chars = page.content.chars().count(),
            links = page.links.len(),
            "page extracted"
        );

        Ok(page)
    }
}

// Gives the common reqwest failure modes a readable message
fn categorize_error(error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    };

    FetchError::Request(message)
}
