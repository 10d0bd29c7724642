use axum::extract::{Path, Query};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::error::AppError;
use crate::services::SearchOutcome;
use crate::state::AppState;

#[derive(Deserialize)]
struct SearchQueryParams {
    #[serde(default)]
    query: String,
    #[serde(default)]
    offset: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/latest-semester", get(latest_semester))
        .route("/search/{semester}", get(search))
        .with_state(state)
}

fn json_bytes(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], bytes).into_response()
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.ping().await?;
    Ok(StatusCode::OK)
}

async fn latest_semester(State(state): State<AppState>) -> Result<Response, AppError> {
    let payload = state.registry.latest_payload().await?;
    Ok(json_bytes(payload))
}

async fn search(
    State(state): State<AppState>,
    Path(semester): Path<String>,
    Query(params): Query<SearchQueryParams>,
) -> Result<Response, AppError> {
    match state
        .search
        .search(&semester, &params.query, params.offset)
        .await?
    {
        SearchOutcome::Results(payload) => Ok(json_bytes(payload)),
        SearchOutcome::InvalidSemester => Err(AppError::InvalidSemester),
    }
}
