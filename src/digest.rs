//! The per-interaction digest pipeline.
//!
//! Each user interaction runs the same sequence: compose queries, fetch
//! each query (concurrently, results kept in query order), merge and
//! deduplicate, then summarize each query group. Per-call fetch and
//! summarization failures are collected as user-visible messages instead
//! of aborting the digest; the pipeline only fails outright when the
//! request is invalid or no query produced anything at all.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::aggregate;
use crate::error::Result;
use crate::fetch::NewsSource;
use crate::models::{Article, SearchRequest, Summary};
use crate::query::{self, ComposedQuery};
use crate::summarize::Summarizer;

/// Concurrent in-flight requests per external API. The fan-out is an
/// optimization only; results are collected in query order so the
/// aggregator's first-seen tie-break stays deterministic.
const FETCH_CONCURRENCY: usize = 4;
const SUMMARY_CONCURRENCY: usize = 4;

/// Everything one interaction produces: the deduplicated article set
/// (newest first), one summary per query group that succeeded, and
/// user-visible messages for the calls that failed.
#[derive(Debug, Serialize)]
pub struct Digest {
    pub articles: Vec<Article>,
    pub summaries: Vec<Summary>,
    pub errors: Vec<String>,
}

/// Run the full pipeline for one search request.
///
/// Fails with [`Error::InvalidRequest`] before any network call when the
/// request has no criteria, and with the first fetch error when every
/// query failed and nothing was fetched. Partial failures are reported in
/// [`Digest::errors`].
#[instrument(level = "info", skip_all)]
pub async fn run_digest(
    news: &dyn NewsSource,
    summarizer: &Summarizer,
    max_articles: usize,
    request: &SearchRequest,
) -> Result<Digest> {
    let queries = query::compose_queries(request)?;
    info!(queries = queries.len(), "Composed search queries");

    let results: Vec<(String, Result<Vec<Article>>)> =
        stream::iter(queries.iter().cloned().map(|q| fetch_one(news, q)))
            .buffered(FETCH_CONCURRENCY)
            .collect()
            .await;

    let mut lists = Vec::new();
    let mut errors = Vec::new();
    let mut first_failure = None;
    for (label, result) in results {
        match result {
            Ok(articles) => lists.push(articles),
            Err(e) => {
                warn!(label = %label, error = %e, "Query failed; continuing with the others");
                errors.push(format!("{label}: {e}"));
                if first_failure.is_none() {
                    first_failure = Some(e);
                }
            }
        }
    }

    let articles = aggregate::merge_articles(lists, max_articles);
    if articles.is_empty() {
        if let Some(e) = first_failure {
            return Err(e);
        }
        info!("No articles matched any query");
        return Ok(Digest {
            articles,
            summaries: Vec::new(),
            errors,
        });
    }

    let groups = group_by_label(&queries, &articles);
    let summary_results: Vec<(String, Result<Summary>)> = stream::iter(groups)
        .map(|(label, group)| async move {
            let result = summarizer.summarize_group(&label, &group).await;
            (label, result)
        })
        .buffered(SUMMARY_CONCURRENCY)
        .collect()
        .await;

    let mut summaries = Vec::new();
    for (label, result) in summary_results {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                warn!(label = %label, error = %e, "Summarization failed; omitting this group");
                errors.push(format!("{label}: {e}"));
            }
        }
    }

    let mut articles = articles;
    aggregate::sort_newest_first(&mut articles);

    info!(
        articles = articles.len(),
        summaries = summaries.len(),
        errors = errors.len(),
        "Digest complete"
    );
    Ok(Digest {
        articles,
        summaries,
        errors,
    })
}

/// Fetch a single query's articles, tagging the result with its label.
/// Takes the query by value so the returned future does not borrow the
/// `queries` collection per-item; that per-item borrow is what makes the
/// buffered-stream future fail the handler's higher-ranked lifetime bound.
async fn fetch_one(
    news: &dyn NewsSource,
    q: ComposedQuery,
) -> (String, Result<Vec<Article>>) {
    let result = news.search(&q).await;
    (q.label, result)
}

/// Partition the article set into per-query groups, in query order.
/// Groups that ended up empty after deduplication are dropped.
fn group_by_label(queries: &[ComposedQuery], articles: &[Article]) -> Vec<(String, Vec<Article>)> {
    queries
        .iter()
        .filter_map(|q| {
            let group: Vec<Article> = articles
                .iter()
                .filter(|a| a.category.as_deref() == Some(q.label.as_str()))
                .cloned()
                .collect();
            (!group.is_empty()).then(|| (q.label.clone(), group))
        })
        .collect()
}
