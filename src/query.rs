//! Query composition: turn a [`SearchRequest`] into news-API query strings.
//!
//! Composition rules:
//! - free text only: one query, the text passed through verbatim
//! - categories only: one query per category, the category's terms
//!   OR-joined and constrained by the healthcare context clause
//! - both: one query per category, the free text ANDed in front
//!
//! Composition is pure; validation happens here, before any network
//! dispatch, and mirrors the dashboard's submit-button rule.

use crate::catalog::{self, Category};
use crate::error::{Error, Result};
use crate::models::SearchRequest;

/// Keeps category queries anchored to healthcare news even when a term
/// (e.g. "CMS", "ONC") is ambiguous outside the domain.
const HEALTHCARE_CONTEXT: &str = "(healthcare OR health OR medical OR EHR OR EMR)";

/// A final search expression ready to send to the news API, labelled with
/// the group it will be summarized under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedQuery {
    /// Category name, or the free text itself for uncategorized searches.
    pub label: String,
    pub query: String,
}

/// Compose one query per selected category, or a single free-text query.
///
/// Fails with [`Error::InvalidRequest`] when the request carries no
/// criteria at all or names a category that is not in the catalog.
pub fn compose_queries(request: &SearchRequest) -> Result<Vec<ComposedQuery>> {
    if !request.has_criteria() {
        return Err(Error::InvalidRequest(
            "enter a search term or select at least one category".to_string(),
        ));
    }

    let free_text = request.trimmed_text();

    if request.categories.is_empty() {
        // Validation above guarantees free text is present here.
        let text = free_text.expect("has_criteria requires text when no categories");
        return Ok(vec![ComposedQuery {
            label: text.to_string(),
            query: text.to_string(),
        }]);
    }

    request
        .categories
        .iter()
        .map(|name| {
            let category = catalog::find(name)
                .ok_or_else(|| Error::InvalidRequest(format!("unknown category: {name}")))?;
            Ok(ComposedQuery {
                label: category.name.to_string(),
                query: category_query(category, free_text),
            })
        })
        .collect()
}

fn category_query(category: &Category, free_text: Option<&str>) -> String {
    let terms = category.query_terms.join(" OR ");
    match free_text {
        Some(text) => format!("({text}) AND ({terms}) AND {HEALTHCARE_CONTEXT}"),
        None => format!("({terms}) AND {HEALTHCARE_CONTEXT}"),
    }
}
