// src/lib.rs
// =============================================================================
// site-scout answers a question about a website by crawling it one page at a
// time and letting a language model decide when it has read enough.
//
// Modules:
// - scoring: keyword extraction, link scoring, content trimming
// - fetch: the page fetcher contract and its reqwest implementation
// - crawl: the frontier of discovered URLs and the crawl step
// - agent: the decide/answer steps and the run loop tying them together
// - llm: the language model contract and an OpenAI-compatible client
// - config: environment-driven settings
// =============================================================================

pub mod agent;
pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod llm;
pub mod scoring;

pub use agent::{RunResult, SiteAgent};
pub use config::Config;
pub use error::{AgentError, FetchError, ModelError};
pub use fetch::{HttpFetcher, PageFetcher};
pub use llm::{LanguageModel, OpenAiModel};
