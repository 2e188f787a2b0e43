//! News fetching from the NewsAPI `/v2/everything` endpoint.
//!
//! One HTTP GET is issued per composed query, with fixed language, sort,
//! and page-size parameters. Failures are typed: [`Error::RateLimited`]
//! when the API signals quota exhaustion (HTTP 429 or an error envelope
//! with code `rateLimited`), [`Error::Fetch`] for everything else. Errors
//! are surfaced to the caller and reported to the user; nothing here
//! retries.
//!
//! The [`NewsSource`] trait is the seam for tests and alternative
//! backends; [`NewsApiClient`] is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::models::{Article, NewsApiResponse};
use crate::query::ComposedQuery;

const NEWS_API_URL: &str = "https://newsapi.org/v2/everything";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("ehr_news_digest/", env!("CARGO_PKG_VERSION"));

/// A searchable source of news articles.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch articles matching one composed query.
    async fn search(&self, query: &ComposedQuery) -> Result<Vec<Article>>;
}

/// NewsAPI client with a shared connection pool and explicit timeout.
pub struct NewsApiClient {
    http: Client,
    api_key: String,
    page_size: u32,
}

impl NewsApiClient {
    pub fn new(api_key: String, page_size: u32) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build news HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_key,
            page_size,
        })
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    #[instrument(level = "info", skip_all, fields(label = %query.label))]
    async fn search(&self, query: &ComposedQuery) -> Result<Vec<Article>> {
        debug!(query = %query.query, "Requesting news search");

        let page_size = self.page_size.to_string();
        let response = self
            .http
            .get(NEWS_API_URL)
            .query(&[
                ("q", query.query.as_str()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(label = %query.label, "News API rate limit hit");
            return Err(Error::RateLimited);
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("failed to read response: {e}")))?;
        let body: NewsApiResponse = serde_json::from_str(&text)
            .map_err(|e| Error::Fetch(format!("unexpected response (HTTP {status}): {e}")))?;

        if !status.is_success() || body.status != "ok" {
            if body.code.as_deref() == Some("rateLimited") {
                warn!(label = %query.label, "News API rate limit hit");
                return Err(Error::RateLimited);
            }
            let message = body
                .message
                .unwrap_or_else(|| format!("news API returned HTTP {status}"));
            warn!(label = %query.label, %status, %message, "News API returned an error");
            return Err(Error::Fetch(message));
        }

        let articles: Vec<Article> = body
            .articles
            .into_iter()
            .filter_map(|raw| raw.into_article(Some(query.label.as_str())))
            .collect();

        info!(
            label = %query.label,
            count = articles.len(),
            total_available = body.total_results,
            "Fetched articles"
        );
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let client = NewsApiClient::new("test-key".to_string(), 5);
        assert!(client.is_ok());
    }
}
