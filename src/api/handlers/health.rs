/*
 * Responsibility
 * - GET / (疎通確認の文字列) と GET /health (JSON)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn root() -> &'static str {
    "API is running!"
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
