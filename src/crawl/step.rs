// src/crawl/step.rs
// =============================================================================
// One crawl step: take the next pending URL, fetch it, keep the relevant
// part of its text and add its links to the frontier.
//
// How it works:
// 1. Nothing pending -> Idle (the loop still moves on to the decision step)
// 2. Pop the next index and fetch its URL
// 3. Fetch failed -> mark it visited so it is never retried, record nothing
// 4. Fetch worked -> trim content to the question's keywords, mark visited,
//    record the page, merge its links into the frontier
//
// A failed page never ends the run. We log it and carry on with what we have.
// =============================================================================

use std::time::Duration;
use tracing::{debug, info, warn};

use super::PageRecord;
use crate::agent::RunState;
use crate::error::FetchError;
use crate::fetch::PageFetcher;
use crate::scoring::extract_relevant_content;

/// What a crawl step did.
#[derive(Debug)]
pub enum CrawlOutcome {
    /// The pending queue was empty
    Idle,
    /// The page was fetched and recorded
    Fetched { index: usize, new_links: usize },
    /// The page could not be fetched; it is now visited with no content
    Failed { index: usize, error: FetchError },
}

/// Runs one crawl step against the run's frontier.
pub async fn crawl_step(
    state: &mut RunState,
    fetcher: &dyn PageFetcher,
    timeout: Duration,
) -> CrawlOutcome {
    let Some(index) = state.frontier.next_pending() else {
        debug!("nothing pending, skipping crawl");
        return CrawlOutcome::Idle;
    };

    // Pending indices always come from the frontier, so this can't miss.
    // Treat a miss like any other unusable page instead of panicking.
    let Some(url) = state.frontier.url(index).map(str::to_string) else {
        state.frontier.mark_visited(index);
        return CrawlOutcome::Failed {
            index,
            error: FetchError::InvalidUrl {
                url: String::new(),
                reason: format!("no URL at index {index}"),
            },
        };
    };

    info!(index, url = %url, "crawling");

    match fetcher.fetch(&url, timeout).await {
        Ok(page) => {
            let content = extract_relevant_content(&page.content, &state.question.keywords);

            state.frontier.mark_visited(index);
            state.frontier.record_content(PageRecord {
                index,
                url,
                title: page.title,
                content,
            });
            let new_links = state
                .frontier
                .discover_links(page.links.iter().map(|link| link.url.as_str()));

            debug!(
                index,
                new_links,
                discovered = state.frontier.discovered().len(),
                "frontier updated"
            );
            CrawlOutcome::Fetched { index, new_links }
        }
        Err(error) => {
            warn!(index, url = %url, error = %error, "fetch failed, skipping page");
            state.frontier.mark_visited(index);
            CrawlOutcome::Failed { index, error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::ScriptedFetcher;
    use crate::fetch::{FetchedPage, PageLink};

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn help_page() -> FetchedPage {
        FetchedPage {
            title: "Help".to_string(),
            content: "Welcome. Refunds take 5 days. Contact us anytime.".to_string(),
            links: vec![
                PageLink {
                    url: "https://example.com/returns".to_string(),
                    text: "Returns Policy".to_string(),
                },
                PageLink {
                    url: "https://example.com/".to_string(),
                    text: "Home".to_string(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_empty_queue_is_idle() {
        let mut state = RunState::new("How do I get a refund?", "https://example.com/");
        state.frontier.next_pending();

        let fetcher = ScriptedFetcher::new();
        let outcome = crawl_step(&mut state, &fetcher, TIMEOUT).await;

        assert!(matches!(outcome, CrawlOutcome::Idle));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_crawl_records_and_discovers() {
        let mut state = RunState::new("How do I get a refund?", "https://example.com/");
        let fetcher = ScriptedFetcher::new().page("https://example.com/", help_page());

        let outcome = crawl_step(&mut state, &fetcher, TIMEOUT).await;

        assert!(matches!(outcome, CrawlOutcome::Fetched { index: 0, new_links: 1 }));
        assert!(state.frontier.is_visited(0));
        assert_eq!(state.frontier.pending_len(), 0);

        let record = state.frontier.record(0).unwrap();
        assert_eq!(record.title, "Help");
        assert_eq!(record.content, "Refunds take 5 days");

        assert_eq!(state.frontier.url(1), Some("https://example.com/returns"));
        // Discovered links are not queued automatically
        assert!(!state.frontier.is_pending(1));
    }

    #[tokio::test]
    async fn test_failed_crawl_marks_visited_without_content() {
        let mut state = RunState::new("How do I get a refund?", "https://example.com/");
        let fetcher = ScriptedFetcher::new();

        let outcome = crawl_step(&mut state, &fetcher, TIMEOUT).await;

        assert!(matches!(outcome, CrawlOutcome::Failed { index: 0, .. }));
        assert!(state.frontier.is_visited(0));
        assert!(state.frontier.records().is_empty());
        assert_eq!(state.frontier.discovered().len(), 1);
    }
}
