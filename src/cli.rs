//! Command-line interface definitions for the digest server.
//!
//! This module defines the CLI arguments and options using the `clap`
//! crate. The two API keys are usually supplied via environment variables;
//! everything else has a sensible default.

use clap::Parser;

/// Command-line arguments for the digest server.
///
/// # Examples
///
/// ```sh
/// # Keys from the environment, defaults for everything else
/// NEWS_API_KEY=... OPENAI_API_KEY=... ehr_news_digest
///
/// # Custom port and a larger digest
/// ehr_news_digest --port 9000 --max-articles 40
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// NewsAPI key (https://newsapi.org)
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// OpenAI API key for summarization
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Port the dashboard listens on
    #[arg(short, long, env = "PORT", default_value_t = 8051)]
    pub port: u16,

    /// Chat model used for summarization
    #[arg(long, default_value = "gpt-4o-mini")]
    pub model: String,

    /// Articles requested from the news API per query
    #[arg(long, default_value_t = 5)]
    pub page_size: u32,

    /// Cap on total articles in one digest
    #[arg(long, default_value_t = 25)]
    pub max_articles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["ehr_news_digest"]);
        assert_eq!(cli.port, 8051);
        assert_eq!(cli.model, "gpt-4o-mini");
        assert_eq!(cli.page_size, 5);
        assert_eq!(cli.max_articles, 25);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "ehr_news_digest",
            "--news-api-key",
            "news-key",
            "--openai-api-key",
            "openai-key",
            "--port",
            "9000",
            "--max-articles",
            "40",
        ]);

        assert_eq!(cli.news_api_key.as_deref(), Some("news-key"));
        assert_eq!(cli.openai_api_key.as_deref(), Some("openai-key"));
        assert_eq!(cli.port, 9000);
        assert_eq!(cli.max_articles, 40);
    }
}
