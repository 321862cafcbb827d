// src/main.rs
// =============================================================================
// This is the entry point of the site-scout CLI.
//
// What happens here:
// 1. Load configuration (.env + environment) and set up logging
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the result as text or JSON
// 5. Exit with proper code (0 = success, 2 = error)
//
// Logs go to stderr so `--json` output on stdout stays machine-readable.
// =============================================================================

mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use site_scout::agent::ExploredPage;
use site_scout::fetch::normalize_start_url;
use site_scout::scoring::{extract_keywords, navigation_strategy, rank_links, ScoredLink};
use site_scout::{Config, HttpFetcher, OpenAiModel, PageFetcher, RunResult, SiteAgent};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_logging(&config.log_level);

    match cli.command {
        Commands::Ask {
            question,
            url,
            json,
            timeout,
            model,
        } => {
            let mut config = config;
            if let Some(secs) = timeout {
                config.request_timeout_secs = secs;
            }
            if let Some(model) = model {
                config.model = model;
            }
            config.validate()?;
            handle_ask(&config, &question, url, json).await
        }
        Commands::Links {
            url,
            question,
            json,
        } => {
            config.validate()?;
            handle_links(&config, &url, &question, json).await
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// What `ask --json` prints
#[derive(Serialize)]
struct AskOutput<'a> {
    answer: &'a str,
    status: &'static str,
    pages_visited: usize,
    urls_explored: Vec<ExploredPage>,
}

// Handles the 'ask' subcommand
async fn handle_ask(
    config: &Config,
    question: &str,
    url: Option<String>,
    json: bool,
) -> Result<()> {
    // --url wins, then DEFAULT_WEBSITE_URL
    let raw_url = url
        .or_else(|| config.default_website_url.clone())
        .ok_or_else(|| anyhow!("no website given: pass --url or set DEFAULT_WEBSITE_URL"))?;
    let start_url = normalize_start_url(&raw_url)?;

    // Build the two collaborators the agent needs
    let api_key = config.api_key.clone().unwrap_or_default();
    let model = OpenAiModel::new(&config.base_url, api_key, &config.model, config.llm_timeout())
        .context("could not set up the language model client")?;
    let fetcher = HttpFetcher::new()?;

    let agent = SiteAgent::new(fetcher, model).with_fetch_timeout(config.fetch_timeout());

    if !json {
        println!("🔍 Exploring {} to answer: {}", start_url, question);
    }

    // Crawl and decide until the model answers
    let result = agent.run(question, &start_url).await?;

    if json {
        print_ask_json(&result)
    } else {
        print_ask_text(&result);
        Ok(())
    }
}

fn print_ask_json(result: &RunResult) -> Result<()> {
    let output = AskOutput {
        answer: &result.answer,
        status: "success",
        pages_visited: result.pages_visited(),
        urls_explored: result.explored_pages(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_ask_text(result: &RunResult) {
    println!("\n{}\n", result.answer.trim());
    println!("{}", "=".repeat(80));
    println!("📄 Pages visited: {}", result.pages_visited());
    for page in result.explored_pages() {
        println!("   {} ({})", page.title, page.url);
    }
}

// What `links --json` prints
#[derive(Serialize)]
struct LinksOutput<'a> {
    url: &'a str,
    title: &'a str,
    keywords: &'a [String],
    ranked: &'a [ScoredLink],
    strategy: site_scout::scoring::NavigationStrategy,
}

// Handles the 'links' subcommand
async fn handle_links(config: &Config, url: &str, question: &str, json: bool) -> Result<()> {
    let url = normalize_start_url(url)?;
    let fetcher = HttpFetcher::new()?;

    let page = fetcher
        .fetch(&url, config.fetch_timeout())
        .await
        .with_context(|| format!("could not fetch {url}"))?;

    let keywords = extract_keywords(question);
    let ranked = rank_links(&page.links, &keywords);
    let strategy = navigation_strategy(&url, &keywords, &page.links);

    if json {
        let output = LinksOutput {
            url: &url,
            title: &page.title,
            keywords: &keywords,
            ranked: &ranked,
            strategy,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("📄 {} ({})", page.title, url);
    let keyword_list = if keywords.is_empty() {
        "(none)".to_string()
    } else {
        keywords.join(", ")
    };
    println!("🔑 Keywords: {}", keyword_list);
    println!("   {} link(s) on page, {} relevant\n", page.links.len(), ranked.len());

    print_table(&ranked);

    println!();
    for note in &strategy.reasoning {
        println!("💡 {}", note);
    }
    Ok(())
}

// Prints ranked links as a human-readable table in the terminal
fn print_table(ranked: &[ScoredLink]) {
    println!("{:<6} {:<60} {:<30}", "SCORE", "URL", "TEXT");
    println!("{}", "=".repeat(96));

    for link in ranked {
        // Truncate URL if too long for display
        let url_display = if link.url.chars().count() > 57 {
            format!("{}...", link.url.chars().take(57).collect::<String>())
        } else {
            link.url.clone()
        };

        println!("{:<6} {:<60} {:<30}", link.score, url_display, link.text);
    }
}
