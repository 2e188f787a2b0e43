//! # EHR News Digest
//!
//! A thin orchestration service for healthcare-IT news: it queries NewsAPI
//! for articles matching free text and/or predefined categories, merges
//! and deduplicates the results, asks an OpenAI-compatible chat model for
//! a bullet-point digest per query group, and serves the result on a
//! local dashboard.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... OPENAI_API_KEY=... ehr_news_digest --port 8051
//! ```
//!
//! ## Architecture
//!
//! Each dashboard interaction runs a sequential pipeline:
//! 1. **Compose**: build one news-API query per selected category (or one
//!    free-text query)
//! 2. **Fetch**: one HTTP request per query, fanned out concurrently
//! 3. **Aggregate**: merge results, deduplicate by URL, cap the total
//! 4. **Summarize**: one completion request per query group
//!
//! No state persists across interactions except the static category
//! catalog; both API keys are required at startup.

use clap::Parser;
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod catalog;
mod cli;
mod digest;
mod error;
mod fetch;
mod models;
mod query;
mod server;
mod summarize;
mod utils;

use cli::Cli;
use error::Error;
use fetch::{NewsApiClient, NewsSource};
use server::AppState;
use summarize::{OpenAiClient, Summarizer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn StdError>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("ehr_news_digest starting up");

    let args = Cli::parse();
    debug!(
        port = args.port,
        model = %args.model,
        page_size = args.page_size,
        max_articles = args.max_articles,
        "Parsed CLI arguments"
    );

    // Missing keys are fatal before anything binds or dials out.
    let news_api_key = args
        .news_api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| Error::Configuration("NEWS_API_KEY is not set".to_string()))?;
    let openai_api_key = args
        .openai_api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| Error::Configuration("OPENAI_API_KEY is not set".to_string()))?;

    let news: Arc<dyn NewsSource> = Arc::new(NewsApiClient::new(news_api_key, args.page_size)?);
    let summarizer = Summarizer::new(Arc::new(OpenAiClient::new(openai_api_key, args.model)?));
    info!(categories = catalog::CATEGORIES.len(), "Category catalog loaded");

    let app = server::create_app(AppState {
        news,
        summarizer,
        max_articles: args.max_articles,
    });

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Dashboard listening");
    axum::serve(listener, app).await?;

    Ok(())
}
