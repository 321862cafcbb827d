// src/agent/answer.rs
// =============================================================================
// The answer step: hand every collected page to the model and return what it
// writes, verbatim. This is the terminal state of a run.
// =============================================================================

use tracing::{debug, info};

use super::RunState;
use crate::error::ModelError;
use crate::llm::LanguageModel;

/// Returned without calling the model when no page produced any content.
pub const NO_INFORMATION_ANSWER: &str =
    "I couldn't find any relevant information on the website to answer your question.";

const PAGE_DELIMITER: &str = "\n---\n";

pub async fn answer_step(
    state: &RunState,
    model: &dyn LanguageModel,
) -> Result<String, ModelError> {
    if state.frontier.records().is_empty() {
        info!("no content collected, returning fallback answer");
        return Ok(NO_INFORMATION_ANSWER.to_string());
    }

    let prompt = build_answer_prompt(state);
    debug!(
        prompt_chars = prompt.len(),
        pages = state.frontier.records().len(),
        "asking model for the final answer"
    );

    model.complete(&prompt).await
}

pub fn build_answer_prompt(state: &RunState) -> String {
    // Full content here, unlike the decision prompt
    let context = state
        .frontier
        .records()
        .iter()
        .map(|page| format!("From {} ({}):\n{}\n", page.title, page.url, page.content))
        .collect::<Vec<_>>()
        .join(PAGE_DELIMITER);

    format!(
        "Using the information gathered from the website below, answer the user's question.\n\
         \n\
         QUESTION: {question}\n\
         \n\
         INFORMATION FROM WEBSITE:\n\
         {context}\n\
         Give a helpful, accurate answer based only on the information above. Structure it \
         clearly and cite the pages (title or URL) you relied on. If the information is \
         incomplete, say what is missing.\n\
         \n\
         ANSWER:",
        question = state.question.text,
    )
}
