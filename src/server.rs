//! The dashboard web surface.
//!
//! Three routes: the embedded dashboard page, the category list the page
//! populates its checkboxes from, and the digest endpoint that runs the
//! pipeline. Pipeline errors map onto HTTP statuses here; partial
//! failures ride inside a successful digest as `errors[]`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog;
use crate::digest::{self, Digest};
use crate::error::Error;
use crate::fetch::NewsSource;
use crate::models::SearchRequest;
use crate::summarize::Summarizer;

const INDEX_HTML: &str = include_str!("dashboard.html");

/// Shared per-process state: the two API clients and the digest cap.
/// Immutable after startup; every request reads, nothing writes.
pub struct AppState {
    pub news: Arc<dyn NewsSource>,
    pub summarizer: Summarizer,
    pub max_articles: usize,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/categories", get(list_categories))
        .route("/api/digest", post(create_digest))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn list_categories() -> Json<Vec<&'static str>> {
    Json(catalog::names())
}

async fn create_digest(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Digest>, ApiError> {
    let digest = digest::run_digest(
        state.news.as_ref(),
        &state.summarizer,
        state.max_articles,
        &request,
    )
    .await?;
    Ok(Json(digest))
}

/// Wrapper that maps pipeline errors onto HTTP statuses.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Error::Fetch(_) | Error::Summarization(_) => StatusCode::BAD_GATEWAY,
            Error::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
