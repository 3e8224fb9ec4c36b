use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::content::MessageResponse;
use crate::search::relevance::{self, SearchResult};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub suggestions: Vec<String>,
}

/// `GET /api/v1/search?q=…` — rank the aggregate against a query.
///
/// Scans the current catalog snapshot; nothing is refetched per query.
/// Non-blank queries land in the history.
pub async fn search_handler(
    State(state): State<crate::state::AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let snapshot = state.catalog.snapshot();
    let now = Utc::now();

    let results = relevance::search(&snapshot, &params.q, now);
    let suggestions = relevance::suggestions(&snapshot, &params.q);

    if !params.q.trim().is_empty() {
        state.history.record(&params.q);
    }

    Json(SearchResponse {
        query: params.q,
        results,
        suggestions,
    })
}

/// `GET /api/v1/search/history` — recent queries, most recent first.
pub async fn history_handler(State(state): State<crate::state::AppState>) -> Json<Vec<String>> {
    Json(state.history.entries())
}

/// `DELETE /api/v1/search/history` — forget all recent queries.
pub async fn clear_history_handler(
    State(state): State<crate::state::AppState>,
) -> Json<MessageResponse> {
    state.history.clear();
    Json(MessageResponse {
        message: "Search history cleared".to_string(),
    })
}
