// src/error.rs
// =============================================================================
// Typed errors for the library side of site-scout.
//
// There are three families:
// - FetchError: a single page could not be fetched or parsed. The crawl
//   swallows these (the page is marked visited and the run continues).
// - ModelError: the language model call failed. This ends the run.
// - AgentError: what `run` hands back to the caller.
//
// The binary wraps these in anyhow for printing, the library never does.
// =============================================================================

use thiserror::Error;

/// Why a page fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed at all
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport-level failure (DNS, connect, TLS, timeout, ...)
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),

    /// The body could not be decoded or turned into text
    #[error("parsing failed: {0}")]
    Parse(String),
}

impl FetchError {
    /// True for the network side of the taxonomy, false for parse failures
    /// (an unparseable URL counts as one).
    pub fn is_network(&self) -> bool {
        !matches!(self, FetchError::Parse(_) | FetchError::InvalidUrl { .. })
    }
}

/// Failure of the language model collaborator.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no API key configured (set LLM_API_KEY)")]
    MissingApiKey,

    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model API returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// The API answered but without any choice to read
    #[error("model returned no completion")]
    EmptyResponse,
}

/// Errors surfaced by a run. Everything else is recovered inside the loop.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}
