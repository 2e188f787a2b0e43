//! Article aggregation: merge per-query result lists into one set.
//!
//! The URL is the article's identity. When the same URL appears in the
//! results of two queries, the first-encountered record wins, so an
//! article keeps the category tag of the query that found it first.

use itertools::Itertools;
use tracing::debug;

use crate::models::Article;

/// Merge the per-query lists, drop duplicate URLs keeping the first-seen
/// record, and cap the total at `cap`. Output order is first-seen order.
pub fn merge_articles(lists: Vec<Vec<Article>>, cap: usize) -> Vec<Article> {
    let raw_count: usize = lists.iter().map(Vec::len).sum();
    let merged: Vec<Article> = lists
        .into_iter()
        .flatten()
        .unique_by(|article| article.url.clone())
        .take(cap)
        .collect();
    debug!(
        raw = raw_count,
        deduplicated = merged.len(),
        cap,
        "Merged query results"
    );
    merged
}

/// Order articles newest first, for rendering and summary priority.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn article(url: &str, category: &str) -> Article {
        Article {
            title: format!("Article at {url}"),
            source: "test".to_string(),
            url: url.to_string(),
            published_at: Utc::now(),
            description: String::new(),
            category: Some(category.to_string()),
        }
    }

    #[test]
    fn test_duplicate_urls_keep_first_seen_record() {
        let first = vec![article("https://a.com/1", "first")];
        let second = vec![
            article("https://a.com/1", "second"),
            article("https://a.com/2", "second"),
        ];

        let merged = merge_articles(vec![first, second], 10);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].url, "https://a.com/1");
        // Tie-break: the record from the first query wins.
        assert_eq!(merged[0].category.as_deref(), Some("first"));
    }

    #[test]
    fn test_overlapping_lists_shrink() {
        let first = vec![article("https://a.com/1", "x"), article("https://a.com/2", "x")];
        let second = vec![article("https://a.com/2", "y"), article("https://a.com/3", "y")];

        let merged = merge_articles(vec![first, second], 10);
        assert!(merged.len() < 4);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_cap_is_exact() {
        let lists: Vec<Vec<Article>> = (0..3)
            .map(|i| {
                (0..4)
                    .map(|j| article(&format!("https://a.com/{i}/{j}"), "x"))
                    .collect()
            })
            .collect();

        let merged = merge_articles(lists, 7);
        assert_eq!(merged.len(), 7);
    }

    #[test]
    fn test_order_is_first_seen() {
        let merged = merge_articles(
            vec![
                vec![article("https://a.com/b", "x")],
                vec![article("https://a.com/a", "y")],
            ],
            10,
        );
        assert_eq!(merged[0].url, "https://a.com/b");
        assert_eq!(merged[1].url, "https://a.com/a");
    }

    #[test]
    fn test_sort_newest_first() {
        let now = Utc::now();
        let mut old = article("https://a.com/old", "x");
        old.published_at = now - Duration::days(2);
        let mut new = article("https://a.com/new", "x");
        new.published_at = now;

        let mut articles = vec![old, new];
        sort_newest_first(&mut articles);
        assert_eq!(articles[0].url, "https://a.com/new");
    }
}
