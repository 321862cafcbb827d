// src/crawl/mod.rs
// =============================================================================
// This module handles the crawling half of the agent loop.
//
// Features:
// - A frontier of discovered URLs with a FIFO queue of pages to fetch
// - A crawl step that fetches one page at a time and grows the frontier
//
// Unlike a general crawler, nothing here decides *which* page comes next.
// After the seed, pages are only queued when the decision step asks for them.
// =============================================================================

mod frontier;
mod step;

pub use frontier::{Frontier, PageRecord};
pub use step::{crawl_step, CrawlOutcome};
