// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - ask: run the full crawl-and-answer agent for one question
// - links: fetch a single page and show which of its links look relevant
//
// Anything not given as a flag comes from the environment (see config.rs).
// =============================================================================

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "site-scout",
    version,
    about = "Answer questions about a website by crawling it with an LLM agent",
    long_about = "site-scout starts at a website's URL, reads pages one at a time and asks a \
                  language model after each page whether it knows enough to answer. \
                  It follows only links on the same site."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question about a website
    ///
    /// Example: site-scout ask "How do I get a refund?" --url https://shop.example.com
    Ask {
        /// The question to answer
        question: String,

        /// Website to start from (defaults to DEFAULT_WEBSITE_URL)
        #[arg(long, short = 'u')]
        url: Option<String>,

        /// Print the result as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Page fetch timeout in seconds (overrides REQUEST_TIMEOUT)
        #[arg(long)]
        timeout: Option<u64>,

        /// Model name (overrides LLM_MODEL)
        #[arg(long, short = 'm')]
        model: Option<String>,
    },

    /// Fetch one page and rank its links against a question
    ///
    /// Example: site-scout links https://shop.example.com --question "refund policy"
    Links {
        /// Page to fetch
        url: String,

        /// Question to score links against (without it, only helpful-page
        /// words like "faq" or "support" count)
        #[arg(long, short = 'q', default_value = "")]
        question: String,

        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from([
            "site-scout",
            "ask",
            "How do I get a refund?",
            "--url",
            "example.com",
            "--json",
        ]);
        match cli.command {
            Commands::Ask {
                question,
                url,
                json,
                timeout,
                model,
            } => {
                assert_eq!(question, "How do I get a refund?");
                assert_eq!(url.as_deref(), Some("example.com"));
                assert!(json);
                assert_eq!(timeout, None);
                assert_eq!(model, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_links_default_question() {
        let cli = Cli::parse_from(["site-scout", "links", "https://example.com"]);
        match cli.command {
            Commands::Links { url, question, json } => {
                assert_eq!(url, "https://example.com");
                assert_eq!(question, "");
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
