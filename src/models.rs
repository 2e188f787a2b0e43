//! Data models for search requests, articles, and summaries.
//!
//! This module defines the core data structures used throughout the service:
//! - [`SearchRequest`]: the transient per-interaction search criteria
//! - [`Article`]: a normalized news article from the search API
//! - [`Summary`]: the bullet-point digest produced for one query group
//! - Wire types ([`NewsApiResponse`] and friends) matching NewsAPI's JSON
//!
//! A fresh `SearchRequest` is built for every interaction and discarded
//! after the digest is produced; only the static category catalog outlives
//! a request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Search criteria supplied by the user for one interaction.
///
/// At least one of the two fields must be non-empty before the request is
/// dispatched; [`SearchRequest::has_criteria`] is the single source of
/// truth for that rule, mirrored by the dashboard's submit-button state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    /// Free-text search terms, passed to the news API verbatim.
    #[serde(default)]
    pub free_text: Option<String>,
    /// Names of selected catalog categories.
    #[serde(default)]
    pub categories: Vec<String>,
}

impl SearchRequest {
    /// Whether this request carries any usable search criteria.
    ///
    /// Pure derived state: whitespace-only free text counts as empty.
    pub fn has_criteria(&self) -> bool {
        let has_text = self
            .free_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        has_text || !self.categories.is_empty()
    }

    /// Free text with surrounding whitespace removed, if any remains.
    pub fn trimmed_text(&self) -> Option<&str> {
        self.free_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// A news article normalized from the search API response.
///
/// The `url` is the article's identity: the aggregator guarantees no two
/// articles in a digest share one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// The publishing outlet's name (e.g. "Healthcare IT News").
    pub source: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    /// The query group this article was fetched for (category name, or the
    /// free text itself for uncategorized searches).
    #[serde(default)]
    pub category: Option<String>,
}

impl Article {
    /// Extract the domain name (before .com/.org/etc) from the article URL.
    /// For example: "https://www.healthcareitnews.com/story" -> "healthcareitnews"
    pub fn host_tag(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?;
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() >= 2 {
            Some(parts[parts.len() - 2].to_string())
        } else {
            None
        }
    }
}

/// The bullet-point digest produced for one query group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// The category name or free-text query this summary covers.
    pub label: String,
    pub bullet_points: Vec<String>,
}

// ---------------------------------------------------------------------------
// NewsAPI wire types
// ---------------------------------------------------------------------------

/// Top-level NewsAPI `/v2/everything` response envelope.
///
/// On success `status` is `"ok"`; on failure the envelope carries `code`
/// and `message` instead of articles (e.g. `code = "rateLimited"`).
#[derive(Debug, Deserialize)]
pub struct NewsApiResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "totalResults")]
    pub total_results: u32,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// One article object as NewsAPI returns it. Every field may be absent.
#[derive(Debug, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

impl RawArticle {
    /// Normalize into an [`Article`] tagged with the query group it was
    /// fetched for. Returns `None` for records without a URL or title,
    /// which cannot be deduplicated or usefully displayed.
    pub fn into_article(self, category: Option<&str>) -> Option<Article> {
        let url = self.url?;
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        Some(Article {
            title,
            source: self
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| "unknown".to_string()),
            url,
            // Missing dates sort as oldest so they are elided first.
            published_at: self.published_at.unwrap_or(DateTime::UNIX_EPOCH),
            description: self.description.unwrap_or_default(),
            category: category.map(str::to_string),
        })
    }
}
