// src/fetch/html.rs
// =============================================================================
// Turns raw HTML into a FetchedPage.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Is built on html5ever (Mozilla's HTML parser)
// - Never fails on bad markup, it repairs it like a browser would
//
// What we extract in one walk over the tree:
// - the <title> text
// - all visible text, skipping script/style/nav/header/footer subtrees
// - <a href> links that stay on the page's own domain
//
// Rust concepts:
// - Recursion over a borrowed tree (ElementRef<'_>)
// - HashSet for de-duplicating links
// - The url crate for resolving relative links
// =============================================================================

use scraper::node::Node;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

use super::{FetchedPage, PageLink};
use crate::scoring::truncate_chars;

/// Maximum characters of page text we keep
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Maximum number of links we return per page
pub const MAX_LINKS: usize = 20;

// Subtrees that hold page chrome or code, not content
const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer"];

const DEFAULT_TITLE: &str = "No title";

/// Extracts title, cleaned text and same-domain links from an HTML document.
///
/// Parameters:
///   html: the raw HTML (borrowed)
///   page_url: the URL it was fetched from, for resolving relative links
///
/// Example:
///   html = "<title>Help</title><a href='/faq'>FAQ</a>"
///   page_url = "https://example.com/"
///   result.links = [{url: "https://example.com/faq", text: "FAQ"}]
pub fn extract_page(html: &str, page_url: &Url) -> FetchedPage {
    let document = Html::parse_document(html);

    let mut walker = Walker::new(page_url);
    walker.walk(document.root_element());

    let content = collapse_whitespace(&walker.text);
    let mut links = walker.links;
    links.truncate(MAX_LINKS);

    FetchedPage {
        title: walker.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        content: truncate_chars(&content, MAX_CONTENT_CHARS),
        links,
    }
}

// Accumulates everything we pull out of the document while walking it
struct Walker<'u> {
    page_url: &'u Url,
    title: Option<String>,
    text: String,
    links: Vec<PageLink>,
    seen: HashSet<String>,
}

impl<'u> Walker<'u> {
    fn new(page_url: &'u Url) -> Self {
        Self {
            page_url,
            title: None,
            text: String::new(),
            links: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    // Separate adjacent text nodes; whitespace is collapsed later
                    self.text.push_str(text);
                    self.text.push(' ');
                }
                Node::Element(_) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let name = child.value().name();

                    if STRIPPED_ELEMENTS.contains(&name) {
                        continue;
                    }
                    if name == "title" && self.title.is_none() {
                        self.title = Some(collapse_whitespace(&child.text().collect::<String>()));
                    }
                    if name == "a" {
                        self.push_link(child);
                    }

                    self.walk(child);
                }
                // Comments, doctypes, processing instructions
                _ => {}
            }
        }
    }

    fn push_link(&mut self, anchor: ElementRef<'_>) {
        let Some(href) = anchor.value().attr("href") else {
            return;
        };

        let text = collapse_whitespace(&anchor.text().collect::<String>());
        if text.is_empty() {
            return;
        }

        let Some(url) = resolve_same_domain(self.page_url, href) else {
            return;
        };

        // First occurrence wins
        if self.seen.insert(url.clone()) {
            self.links.push(PageLink { url, text });
        }
    }
}

// Resolves `href` against the page and keeps it only if it stays on the
// same host and port. The fragment is dropped so "#section" links collapse
// onto the page itself.
fn resolve_same_domain(page_url: &Url, href: &str) -> Option<String> {
    let mut resolved = page_url.join(href.trim()).ok()?;

    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    if resolved.host_str() != page_url.host_str()
        || resolved.port_or_known_default() != page_url.port_or_known_default()
    {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
