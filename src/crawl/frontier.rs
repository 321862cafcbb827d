// src/crawl/frontier.rs
// =============================================================================
// The frontier: every URL discovered during a run, plus which of them are
// waiting to be fetched and which have already been visited.
//
// How it is laid out:
// - `discovered`: append-only list of URLs; a URL's position is its index
// - `pending`: FIFO queue of indices to fetch next
// - `visited`: indices that have been fetched (successfully or not)
// - `records`: the content extracted from successfully fetched pages
//
// Invariants:
// - an index is never both pending and visited
// - every index in pending/visited/records is < discovered.len()
//
// The frontier accepts any URL it is handed. Keeping the crawl on one domain
// is the fetcher's job.
//
// Rust concepts:
// - VecDeque: Double-ended queue, push_back()/pop_front() for FIFO
// - BTreeSet: a sorted set, so visited indices come out in a stable order
// - HashMap: O(1) "have we seen this URL?" lookups
// =============================================================================

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, VecDeque};
use tracing::warn;

/// Content extracted from one successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// Index of the page's URL in the discovery list
    pub index: usize,
    pub url: String,
    pub title: String,
    /// Question-relevant text (already trimmed by the scorer)
    pub content: String,
}

#[derive(Debug, Default)]
pub struct Frontier {
    discovered: Vec<String>,
    positions: HashMap<String, usize>,
    pending: VecDeque<usize>,
    visited: BTreeSet<usize>,
    // In the order pages were fetched
    records: Vec<PageRecord>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the start URL and queues it. On a fresh frontier it gets index 0.
    pub fn enqueue_seed(&mut self, url: &str) -> usize {
        let index = self.discover(url);
        self.requeue(index);
        index
    }

    /// Pops the next index to fetch, or None when nothing is pending.
    pub fn next_pending(&mut self) -> Option<usize> {
        self.pending.pop_front()
    }

    /// Marks an index as visited and removes it from the queue. Idempotent.
    pub fn mark_visited(&mut self, index: usize) {
        self.pending.retain(|&i| i != index);
        self.visited.insert(index);
    }

    /// Stores the content of a fetched page. Records are immutable once
    /// written, so a second record for the same index is ignored.
    pub fn record_content(&mut self, record: PageRecord) {
        if self.record(record.index).is_some() {
            warn!(index = record.index, "page already recorded, keeping the first record");
            return;
        }
        self.records.push(record);
    }

    /// Appends every URL not already discovered, in input order.
    /// Returns how many new URLs were added.
    pub fn discover_links<'a, I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let before = self.discovered.len();
        for url in urls {
            self.discover(url);
        }
        self.discovered.len() - before
    }

    /// Queues an index for fetching unless it is out of range, already
    /// visited or already pending. Returns whether it was queued.
    pub fn requeue(&mut self, index: usize) -> bool {
        if index >= self.discovered.len()
            || self.visited.contains(&index)
            || self.pending.contains(&index)
        {
            return false;
        }
        self.pending.push_back(index);
        true
    }

    pub fn url(&self, index: usize) -> Option<&str> {
        self.discovered.get(index).map(String::as_str)
    }

    pub fn discovered(&self) -> &[String] {
        &self.discovered
    }

    pub fn is_visited(&self, index: usize) -> bool {
        self.visited.contains(&index)
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.pending.contains(&index)
    }

    pub fn visited(&self) -> &BTreeSet<usize> {
        &self.visited
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn record(&self, index: usize) -> Option<&PageRecord> {
        self.records.iter().find(|r| r.index == index)
    }

    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    /// Discovered URLs that have not been visited yet (pending ones included),
    /// in discovery order.
    pub fn unvisited(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.discovered
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.visited.contains(i))
            .map(|(i, url)| (i, url.as_str()))
    }

    /// Consumes the frontier, handing back its final state.
    pub fn into_parts(self) -> (Vec<String>, BTreeSet<usize>, Vec<PageRecord>) {
        (self.discovered, self.visited, self.records)
    }

    // Returns the index of `url`, appending it first if it is new
    fn discover(&mut self, url: &str) -> usize {
        if let Some(&index) = self.positions.get(url) {
            return index;
        }
        let index = self.discovered.len();
        self.discovered.push(url.to_string());
        self.positions.insert(url.to_string(), index);
        index
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why indices instead of URLs everywhere?
//    - The model refers to pages by URL, but the loop refers to them by
//      position. An index is Copy, cheap to store in several collections,
//      and cannot drift out of sync with the URL it names.
//
// 2. Why does `pending.contains` scan the queue?
//    - The queue rarely holds more than a handful of indices (one seed,
//      then one per explore decision), so a linear scan is fine.
//
// 3. What does `impl Iterator<Item = ...> + '_` mean?
//    - "Some iterator type, borrowing from self". The caller can take(10)
//      from it without us allocating a Vec first.
// -----------------------------------------------------------------------------
