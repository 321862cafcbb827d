// src/agent/mod.rs
// =============================================================================
// The crawl-and-answer agent.
//
// A run is a small state machine:
//
//     Crawl -> Decide -> Crawl    (model chose to explore a queued page)
//                     -> Answer   (anything else; terminal)
//
// Each call to `SiteAgent::run` builds a fresh RunState (question, keywords,
// frontier) and owns it until the run ends. Nothing is shared between runs.
//
// There is no hard cap on cycles. The prompt asks the model to stop after a
// few pages, and every explore must queue a page that was never visited, so
// the loop ends once the discovered pages run out.
// =============================================================================

mod answer;
mod decision;

pub use answer::{answer_step, build_answer_prompt, NO_INFORMATION_ANSWER};
pub use decision::{
    build_decision_prompt, decision_step, match_discovered_url, parse_decision, Action, Decision,
    DecisionContext, DecisionOutcome, MAX_CANDIDATES, NO_DATA_REASONING, VISITED_PAGE_BUDGET,
};

use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{info, instrument};

use crate::crawl::{crawl_step, Frontier, PageRecord};
use crate::error::AgentError;
use crate::fetch::PageFetcher;
use crate::llm::LanguageModel;
use crate::scoring::extract_keywords;

/// Default timeout for a single page fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// The user's question and the keywords derived from it. Read-only for a run.
#[derive(Debug, Clone)]
pub struct QuestionContext {
    pub text: String,
    pub keywords: Vec<String>,
}

impl QuestionContext {
    pub fn new(question: &str) -> Self {
        Self {
            text: question.to_string(),
            keywords: extract_keywords(question),
        }
    }
}

/// Mutable state of one run, passed explicitly between the steps.
#[derive(Debug)]
pub struct RunState {
    pub question: QuestionContext,
    pub frontier: Frontier,
}

impl RunState {
    /// Fresh state with `start_url` queued as index 0.
    pub fn new(question: &str, start_url: &str) -> Self {
        let mut frontier = Frontier::new();
        frontier.enqueue_seed(start_url);

        Self {
            question: QuestionContext::new(question),
            frontier,
        }
    }
}

/// Where the decision step sends the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Explore,
    Answer,
}

// The three states of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Crawl,
    Decide,
    Answer,
}

/// A visited page that produced content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExploredPage {
    pub url: String,
    pub title: String,
}

/// Final snapshot of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub question: String,
    pub answer: String,
    /// Every URL discovered, by index
    pub discovered: Vec<String>,
    /// Indices that were fetched (or attempted)
    pub visited: BTreeSet<usize>,
    /// Content of every successfully fetched page, in fetch order
    pub pages: Vec<PageRecord>,
    /// How many crawl steps ran
    pub cycles: usize,
}

impl RunResult {
    fn from_state(state: RunState, answer: String, cycles: usize) -> Self {
        let (discovered, visited, pages) = state.frontier.into_parts();
        Self {
            question: state.question.text,
            answer,
            discovered,
            visited,
            pages,
            cycles,
        }
    }

    pub fn pages_visited(&self) -> usize {
        self.visited.len()
    }

    /// URL and title of each visited page that has content, by index.
    pub fn explored_pages(&self) -> Vec<ExploredPage> {
        self.visited
            .iter()
            .filter_map(|index| self.pages.iter().find(|page| page.index == *index))
            .map(|page| ExploredPage {
                url: page.url.clone(),
                title: page.title.clone(),
            })
            .collect()
    }
}

/// Answers questions about a website by crawling it with `F` and thinking
/// with `M`.
pub struct SiteAgent<F, M> {
    fetcher: F,
    model: M,
    fetch_timeout: Duration,
}

impl<F, M> SiteAgent<F, M>
where
    F: PageFetcher,
    M: LanguageModel,
{
    pub fn new(fetcher: F, model: M) -> Self {
        Self {
            fetcher,
            model,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Runs the crawl/decide loop until the model answers.
    ///
    /// Fetch failures and unparseable decisions are absorbed along the way;
    /// the only error is a failing model call (or blank input).
    #[instrument(skip(self))]
    pub async fn run(&self, question: &str, start_url: &str) -> Result<RunResult, AgentError> {
        if question.trim().is_empty() {
            return Err(AgentError::InvalidInput("question cannot be empty".to_string()));
        }
        if start_url.trim().is_empty() {
            return Err(AgentError::InvalidInput("start URL cannot be empty".to_string()));
        }

        // Fresh state for every run: only the start URL is known
        let mut state = RunState::new(question, start_url);
        info!(keywords = ?state.question.keywords, "starting run");

        let mut step = Step::Crawl;
        let mut cycles = 0;

        loop {
            step = match step {
                // Fetch the next queued page (a failure just marks it visited)
                Step::Crawl => {
                    crawl_step(&mut state, &self.fetcher, self.fetch_timeout).await;
                    cycles += 1;
                    Step::Decide
                }
                // Ask the model whether to keep going; explore has already
                // queued the chosen page when it comes back
                Step::Decide => match decision_step(&mut state, &self.model).await?.transition {
                    Transition::Explore => Step::Crawl,
                    Transition::Answer => Step::Answer,
                },
                // Draft the answer from everything collected and stop
                Step::Answer => {
                    let answer = answer_step(&state, &self.model).await?;
                    info!(
                        cycles,
                        visited = state.frontier.visited().len(),
                        pages = state.frontier.records().len(),
                        "run finished"
                    );
                    return Ok(RunResult::from_state(state, answer, cycles));
                }
            };
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{ScriptedFetcher, ScriptedModel};
    use super::*;
    use crate::fetch::{FetchedPage, PageLink};

    const SEED: &str = "https://shop.example.com/";

    fn link(url: &str, text: &str) -> PageLink {
        PageLink {
            url: url.to_string(),
            text: text.to_string(),
        }
    }

    fn home_page() -> FetchedPage {
        FetchedPage {
            title: "Shop".to_string(),
            content: "Welcome to the shop. We sell shirts.".to_string(),
            links: vec![
                link("https://shop.example.com/returns", "Returns Policy"),
                link("https://shop.example.com/contact", "Contact Us"),
            ],
        }
    }

    fn returns_page() -> FetchedPage {
        FetchedPage {
            title: "Returns".to_string(),
            content: "Items can be returned. A refund is issued within 14 days.".to_string(),
            links: vec![link("https://shop.example.com/", "Home")],
        }
    }

    fn explore(url: &str) -> String {
        format!("```yaml\naction: explore\nreasoning: need the policy\nnext_url: {url}\n```")
    }

    const ANSWER_DECISION: &str = "```yaml\naction: answer\nreasoning: found it\n```";

    #[tokio::test]
    async fn test_explore_then_answer() {
        let fetcher = ScriptedFetcher::new()
            .page(SEED, home_page())
            .page("https://shop.example.com/returns", returns_page());
        let model = ScriptedModel::new()
            .reply(&explore("https://shop.example.com/returns"))
            .reply(ANSWER_DECISION)
            .reply("Refunds are issued within 14 days.");
        let agent = SiteAgent::new(fetcher, model);

        let result = agent.run("How do I get a refund?", SEED).await.unwrap();

        assert_eq!(result.answer, "Refunds are issued within 14 days.");
        assert_eq!(result.cycles, 2);
        assert_eq!(result.pages_visited(), 2);
        assert_eq!(result.pages.len(), 2);
        assert_eq!(
            result.discovered,
            vec![
                SEED.to_string(),
                "https://shop.example.com/returns".to_string(),
                "https://shop.example.com/contact".to_string(),
            ]
        );
        assert_eq!(
            result.explored_pages(),
            vec![
                ExploredPage {
                    url: SEED.to_string(),
                    title: "Shop".to_string(),
                },
                ExploredPage {
                    url: "https://shop.example.com/returns".to_string(),
                    title: "Returns".to_string(),
                },
            ]
        );

        let prompts = agent.model.prompts();
        assert_eq!(prompts.len(), 3);
        // The final prompt carries the trimmed content of both pages
        assert!(prompts[2].contains("A refund is issued within 14 days"));
        assert!(prompts[2].contains("From Shop (https://shop.example.com/)"));
    }

    #[tokio::test]
    async fn test_fetcher_always_failing_still_finishes() {
        let agent = SiteAgent::new(ScriptedFetcher::new(), ScriptedModel::new());

        let result = agent.run("How do I get a refund?", SEED).await.unwrap();

        assert_eq!(result.answer, NO_INFORMATION_ANSWER);
        assert!(result.answer.contains("couldn't find any"));
        assert_eq!(result.cycles, 1);
        assert_eq!(result.pages_visited(), 1);
        assert!(result.pages.is_empty());
        assert_eq!(agent.model.calls(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_decision_stops_after_one_cycle() {
        let fetcher = ScriptedFetcher::new().page(SEED, home_page());
        let model = ScriptedModel::new()
            .reply("Sure! I'd love to keep exploring the returns page.")
            .reply("Best effort answer.");
        let agent = SiteAgent::new(fetcher, model);

        let result = agent.run("How do I get a refund?", SEED).await.unwrap();

        assert_eq!(result.cycles, 1);
        assert_eq!(result.answer, "Best effort answer.");
        assert_eq!(agent.fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_model_decision_falls_back_to_answer() {
        use crate::llm::OpenAiModel;
        use serde_json::json;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        // First call (the decision) comes back blank, the second is the answer
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": ""}}]
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Refunds take 14 days."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = OpenAiModel::new(
            server.uri(),
            "test-key",
            "test-model",
            Duration::from_secs(5),
        )
        .unwrap();
        let fetcher = ScriptedFetcher::new().page(SEED, home_page());
        let agent = SiteAgent::new(fetcher, model);

        let result = agent.run("How do I get a refund?", SEED).await.unwrap();

        assert_eq!(result.answer, "Refunds take 14 days.");
        assert_eq!(result.cycles, 1);
        assert_eq!(result.pages_visited(), 1);
    }

    #[tokio::test]
    async fn test_explore_to_unknown_url_ends_the_run_early() {
        // The model asks for a page that was never discovered. The loop
        // answers with what it has instead of retrying, even though
        // /returns was still unvisited.
        let fetcher = ScriptedFetcher::new().page(SEED, home_page());
        let model = ScriptedModel::new()
            .reply(&explore("https://elsewhere.example.org/refunds"))
            .reply("Partial answer.");
        let agent = SiteAgent::new(fetcher, model);

        let result = agent.run("How do I get a refund?", SEED).await.unwrap();

        assert_eq!(result.cycles, 1);
        assert_eq!(result.answer, "Partial answer.");
        assert!(!result.visited.contains(&1));
    }

    #[tokio::test]
    async fn test_failed_explored_page_keeps_going() {
        // /returns can't be fetched; the run carries on with the seed page
        let fetcher = ScriptedFetcher::new().page(SEED, home_page());
        let model = ScriptedModel::new()
            .reply(&explore("https://shop.example.com/returns"))
            .reply(ANSWER_DECISION)
            .reply("Answer from the home page.");
        let agent = SiteAgent::new(fetcher, model);

        let result = agent.run("How do I get a refund?", SEED).await.unwrap();

        assert_eq!(result.cycles, 2);
        assert_eq!(result.pages_visited(), 2);
        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.explored_pages().len(), 1);
        assert_eq!(result.answer, "Answer from the home page.");
    }

    #[tokio::test]
    async fn test_explore_loop_ends_when_pages_run_out() {
        // A model that always wants the returns page: the second request
        // points at a visited page, so the loop answers.
        let fetcher = ScriptedFetcher::new()
            .page(SEED, home_page())
            .page("https://shop.example.com/returns", returns_page());
        let model = ScriptedModel::new()
            .reply(&explore("https://shop.example.com/returns"))
            .reply(&explore("https://shop.example.com/returns"))
            .reply("Done.");
        let agent = SiteAgent::new(fetcher, model);

        let result = agent.run("How do I get a refund?", SEED).await.unwrap();

        assert_eq!(result.cycles, 2);
        assert_eq!(result.answer, "Done.");
    }

    #[tokio::test]
    async fn test_model_failure_is_fatal() {
        let fetcher = ScriptedFetcher::new().page(SEED, home_page());
        let agent = SiteAgent::new(fetcher, ScriptedModel::new());

        let err = agent.run("How do I get a refund?", SEED).await.unwrap_err();

        assert!(matches!(err, AgentError::Model(_)));
    }

    #[tokio::test]
    async fn test_blank_inputs_rejected() {
        let agent = SiteAgent::new(ScriptedFetcher::new(), ScriptedModel::new());

        assert!(matches!(
            agent.run("   ", SEED).await,
            Err(AgentError::InvalidInput(_))
        ));
        assert!(matches!(
            agent.run("How do I get a refund?", "").await,
            Err(AgentError::InvalidInput(_))
        ));
        assert_eq!(agent.fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_runs_do_not_share_state() {
        let fetcher = ScriptedFetcher::new().page(SEED, home_page());
        let model = ScriptedModel::new()
            .reply(ANSWER_DECISION)
            .reply("First.")
            .reply(ANSWER_DECISION)
            .reply("Second.");
        let agent = SiteAgent::new(fetcher, model);

        let first = agent.run("How do I get a refund?", SEED).await.unwrap();
        let second = agent.run("What do you sell?", SEED).await.unwrap();

        assert_eq!(first.answer, "First.");
        assert_eq!(second.answer, "Second.");
        assert_eq!(second.question, "What do you sell?");
        assert_eq!(second.discovered.len(), 3);
        assert_eq!(second.pages_visited(), 1);
    }
}
