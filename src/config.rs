// src/config.rs
// =============================================================================
// Runtime configuration, read from the environment (and a .env file).
//
// Variables:
//   LLM_API_KEY          API key for the chat completions endpoint
//   LLM_BASE_URL         endpoint base, default https://api.openai.com/v1
//   LLM_MODEL            model name, default gpt-4o-mini
//   LLM_TIMEOUT          seconds per model call, default 120
//   REQUEST_TIMEOUT      seconds per page fetch, default 10
//   DEFAULT_WEBSITE_URL  site used when `ask` is given no --url
//   RUST_LOG             log filter, default info
//
// Command-line flags override whatever is loaded here.
// =============================================================================

use anyhow::{bail, Context, Result};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub llm_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub default_website_url: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            llm_timeout_secs: 120,
            request_timeout_secs: 10,
            default_website_url: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key -> value lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();

        config.api_key = get("LLM_API_KEY");
        if let Some(val) = get("LLM_BASE_URL") {
            config.base_url = val;
        }
        if let Some(val) = get("LLM_MODEL") {
            config.model = val;
        }
        if let Some(val) = get("LLM_TIMEOUT") {
            config.llm_timeout_secs = val
                .trim()
                .parse()
                .context("LLM_TIMEOUT must be a whole number of seconds")?;
        }
        if let Some(val) = get("REQUEST_TIMEOUT") {
            config.request_timeout_secs = val
                .trim()
                .parse()
                .context("REQUEST_TIMEOUT must be a whole number of seconds")?;
        }
        config.default_website_url = get("DEFAULT_WEBSITE_URL");
        if let Some(val) = get("RUST_LOG") {
            config.log_level = val;
        }

        Ok(config)
    }

    /// Fails fast on values that would make every run misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT must be at least 1 second");
        }
        if self.llm_timeout_secs == 0 {
            bail!("LLM_TIMEOUT must be at least 1 second");
        }
        if self.model.trim().is_empty() {
            bail!("LLM_MODEL cannot be empty");
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}
