// src/llm/mod.rs
// =============================================================================
// The language model contract: a prompt goes in, a completion comes out.
//
// The agent never retries a failed call. A ModelError ends the run, and
// transport details (auth, endpoints, timeouts) stay inside the client.
// =============================================================================

mod openai;

pub use openai::OpenAiModel;

use async_trait::async_trait;

use crate::error::ModelError;

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends `prompt` as a single user message and returns the reply text.
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}
