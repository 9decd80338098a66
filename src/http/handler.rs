//! HTTP handlers for the recommendation API

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use crate::recommend::{DemographicFilter, RecommendError, Recommender, DEFAULT_TOP_K};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Request body for item-seeded recommendations.
#[derive(Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub books: Vec<String>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Request body for demographic-cohort recommendations.
#[derive(Deserialize)]
pub struct DemographicsRequest {
    #[serde(flatten)]
    pub filter: DemographicFilter,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn validation_response(err: RecommendError) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// Handler for `POST /recommend`.
///
/// With an empty book list this degrades to the popularity ranking instead
/// of failing, with an explanatory message.
pub async fn recommend_handler(
    State(recommender): State<Arc<Recommender>>,
    Json(payload): Json<RecommendRequest>,
) -> impl IntoResponse {
    if payload.books.is_empty() {
        let popular = recommender.recommend_popular(payload.top_k);
        return Json(json!({
            "message": "Showing popular books since none were specified.",
            "recommendations": popular,
        }))
        .into_response();
    }

    match recommender.recommend_from_items(&payload.books, payload.top_k) {
        Ok(records) => Json(json!({ "recommendations": records })).into_response(),
        Err(e) => validation_response(e),
    }
}

/// Handler for `POST /recommend_new_user`. Unlike `/recommend`, an empty
/// book list here is a client error.
pub async fn recommend_new_user_handler(
    State(recommender): State<Arc<Recommender>>,
    Json(payload): Json<RecommendRequest>,
) -> impl IntoResponse {
    if payload.books.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No books provided" })),
        )
            .into_response();
    }

    match recommender.recommend_from_items(&payload.books, payload.top_k) {
        Ok(records) => Json(json!({ "recommendations": records })).into_response(),
        Err(e) => validation_response(e),
    }
}

/// Handler for `POST /recommend_by_demographics`.
pub async fn recommend_by_demographics_handler(
    State(recommender): State<Arc<Recommender>>,
    Json(payload): Json<DemographicsRequest>,
) -> impl IntoResponse {
    match recommender.recommend_from_users(&payload.filter, payload.top_k) {
        Ok(records) => Json(json!({ "recommendations": records })).into_response(),
        Err(e) => validation_response(e),
    }
}

/// Handler for system status
pub async fn status_handler(State(recommender): State<Arc<Recommender>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "data": {
            "books": recommender.catalog().len(),
            "users": recommender.users().len(),
            "ratings": recommender.ratings().len(),
            "nodes": recommender.model().node_count(),
        }
    }))
}
