// src/agent/decision.rs
// =============================================================================
// The decision step: show the model what we have so far and let it choose
// between exploring one more page and answering now.
//
// How it works:
// 1. Summarize collected pages (500 chars each) and up to 10 unvisited URLs
// 2. Nothing collected and nothing to visit -> answer, without a model call
// 3. Otherwise prompt the model and parse the ```yaml block it returns
// 4. Anything we can't parse becomes "answer", so a confused model can never
//    keep the loop spinning
// 5. For "explore", map the model's URL back onto a frontier index and queue
//    it. If that fails, we answer anyway.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, info, warn};

use super::{RunState, Transition};
use crate::error::ModelError;
use crate::llm::LanguageModel;
use crate::scoring::truncate_chars;

/// Characters of each page shown to the model while deciding
pub const DECISION_CONTENT_CHARS: usize = 500;

/// Maximum unvisited URLs offered to the model
pub const MAX_CANDIDATES: usize = 10;

/// Visited-page count after which the model is told to wrap up. This is
/// advice in the prompt, not a limit the loop enforces.
pub const VISITED_PAGE_BUDGET: usize = 5;

pub const NO_DATA_REASONING: &str = "No data to process";
const PARSE_FAILURE_REASONING: &str = "Failed to parse decision";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Explore,
    Answer,
}

/// The model's verdict for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub reasoning: String,
    /// Only meaningful when action is Explore
    pub next_url: Option<String>,
}

impl Decision {
    fn answer(reasoning: impl Into<String>) -> Self {
        Self {
            action: Action::Answer,
            reasoning: reasoning.into(),
            next_url: None,
        }
    }
}

/// What the decision step did, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    pub decision: Decision,
    pub transition: Transition,
    /// The frontier index queued for the next crawl, if any
    pub queued: Option<usize>,
}

/// A collected page as shown to the model.
#[derive(Debug, Clone)]
pub struct CollectedInfo {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// Everything the decision prompt is built from.
#[derive(Debug, Clone)]
pub struct DecisionContext {
    pub question: String,
    pub collected: Vec<CollectedInfo>,
    pub candidates: Vec<String>,
    pub visited_count: usize,
    pub pending_count: usize,
}

impl DecisionContext {
    pub fn build(state: &RunState) -> Self {
        let frontier = &state.frontier;

        let collected = frontier
            .records()
            .iter()
            .map(|record| CollectedInfo {
                url: record.url.clone(),
                title: record.title.clone(),
                content: truncate_chars(&record.content, DECISION_CONTENT_CHARS),
            })
            .collect();

        // Before the first visit there is nothing to choose between
        let candidates = if frontier.visited().is_empty() {
            Vec::new()
        } else {
            frontier
                .unvisited()
                .take(MAX_CANDIDATES)
                .map(|(_, url)| url.to_string())
                .collect()
        };

        Self {
            question: state.question.text.clone(),
            collected,
            candidates,
            visited_count: frontier.visited().len(),
            pending_count: frontier.pending_len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.collected.is_empty() && self.candidates.is_empty()
    }
}

/// Runs one decision step. Only a failing model call is an error.
pub async fn decision_step(
    state: &mut RunState,
    model: &dyn LanguageModel,
) -> Result<DecisionOutcome, ModelError> {
    let context = DecisionContext::build(state);

    if context.is_empty() {
        info!("no content and no candidates, answering");
        return Ok(DecisionOutcome {
            decision: Decision::answer(NO_DATA_REASONING),
            transition: Transition::Answer,
            queued: None,
        });
    }

    let prompt = build_decision_prompt(&context);
    debug!(
        prompt_chars = prompt.len(),
        candidates = context.candidates.len(),
        "asking model for a decision"
    );

    let response = model.complete(&prompt).await?;
    let decision = parse_decision(&response);

    info!(action = ?decision.action, reasoning = %decision.reasoning.trim(), "model decided");

    let queued = match (&decision.action, &decision.next_url) {
        (Action::Explore, Some(next_url)) => queue_requested_url(state, next_url),
        (Action::Explore, None) => {
            warn!("model chose explore without a next_url");
            None
        }
        (Action::Answer, _) => None,
    };

    let transition = if queued.is_some() {
        Transition::Explore
    } else {
        Transition::Answer
    };

    Ok(DecisionOutcome {
        decision,
        transition,
        queued,
    })
}

// Resolves the model's URL and queues it if it hasn't been seen to already
fn queue_requested_url(state: &mut RunState, next_url: &str) -> Option<usize> {
    let Some(index) = match_discovered_url(state.frontier.discovered(), next_url) else {
        warn!(next_url = %next_url, "requested URL matches nothing discovered, answering instead");
        return None;
    };

    if !state.frontier.requeue(index) {
        warn!(index, "requested URL was already visited or queued, answering instead");
        return None;
    }

    debug!(index, url = ?state.frontier.url(index), "queued for exploration");
    Some(index)
}

/// Finds the discovered URL the model most likely meant.
///
/// An exact match wins. Otherwise any discovered URL that contains, or is
/// contained in, `next_url` qualifies and the longest one is picked (the
/// earliest on ties), so the bare site root doesn't shadow deeper pages.
/// Taking the first qualifying URL would almost always return the root,
/// since it is discovered first and is a prefix of every other page.
pub fn match_discovered_url(discovered: &[String], next_url: &str) -> Option<usize> {
    let target = next_url.trim();
    if target.is_empty() {
        return None;
    }

    if let Some(index) = discovered.iter().position(|url| url == target) {
        return Some(index);
    }

    discovered
        .iter()
        .enumerate()
        .filter(|(_, url)| target.contains(url.as_str()) || url.contains(target))
        .min_by_key(|(index, url)| (Reverse(url.len()), *index))
        .map(|(index, _)| index)
}

pub fn build_decision_prompt(context: &DecisionContext) -> String {
    let collected = if context.collected.is_empty() {
        "No information collected yet.\n".to_string()
    } else {
        context
            .collected
            .iter()
            .map(|info| {
                format!(
                    "Page: {} ({})\nContent: {}\n\n",
                    info.title, info.url, info.content
                )
            })
            .collect::<String>()
    };

    let candidates = if context.candidates.is_empty() {
        "No more URLs available.".to_string()
    } else {
        context
            .candidates
            .iter()
            .map(|url| format!("- {url}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"You are a web research agent. Decide what to do next to answer a user's question about a website.

QUESTION: {question}

INFORMATION COLLECTED SO FAR:
{collected}
UNVISITED URLS YOU CAN EXPLORE:
{candidates}

CURRENT STATUS:
- Pages visited: {visited}
- Pages already queued: {pending}
- Unvisited URLs listed: {listed}

DECISION RULES:
1. If the information collected is enough to answer the question well, choose "answer".
2. If {budget} or more pages have been visited, choose "answer".
3. If no unvisited URLs are listed, choose "answer".
4. Otherwise, if a listed URL looks likely to hold what is missing, choose "explore".

Reply with a YAML block in exactly this shape:

```yaml
action: explore  # or answer
reasoning: |
  Why you chose this action and what you are still looking for
next_url: |
  Only when exploring: one URL copied exactly from the list above
```"#,
        question = context.question,
        visited = context.visited_count,
        pending = context.pending_count,
        listed = context.candidates.len(),
        budget = VISITED_PAGE_BUDGET,
    )
}

// The block as the model writes it; every field is optional here and
// validated afterwards
#[derive(Debug, Default, Deserialize)]
struct RawDecision {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    next_url: Option<String>,
}

/// Parses the model's reply. Never fails: anything unusable is an answer.
pub fn parse_decision(response: &str) -> Decision {
    let Some(block) = yaml_block(response) else {
        warn!("no yaml block in model response");
        return Decision::answer(PARSE_FAILURE_REASONING);
    };

    let raw: RawDecision = match serde_yaml::from_str(block) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "decision block is not valid yaml");
            return Decision::answer(format!("{PARSE_FAILURE_REASONING}: {e}"));
        }
    };

    let action = match raw.action.as_deref().map(|a| a.trim().to_lowercase()).as_deref() {
        Some("explore") => Action::Explore,
        Some("answer") => Action::Answer,
        other => {
            warn!(action = ?other, "missing or invalid action");
            return Decision::answer(format!(
                "{PARSE_FAILURE_REASONING}: invalid action {other:?}"
            ));
        }
    };

    Decision {
        action,
        reasoning: raw.reasoning.unwrap_or_default().trim().to_string(),
        next_url: raw
            .next_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty()),
    }
}

// Returns the text between "```yaml" and the next "```"
fn yaml_block(response: &str) -> Option<&str> {
    const OPEN: &str = "```yaml";
    const CLOSE: &str = "```";

    let start = response.find(OPEN)? + OPEN.len();
    let end = response[start..].find(CLOSE)? + start;
    Some(response[start..end].trim())
}
