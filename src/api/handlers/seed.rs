/*
 * Responsibility
 * - POST /api/blogs/seed (development 専用)
 * - 全 post を削除 → 固定サンプルを投入 (確認なし / dry-run なし)
 * - development 以外では store に触れずに 403
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{dto::posts::PostResponse, handlers::posts::rows_to_response},
    error::AppError,
    services::seed::seed_posts,
    state::AppState,
};

pub async fn seed_posts_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<PostResponse>>), AppError> {
    if !state.app_env.is_development() {
        tracing::warn!(app_env = ?state.app_env, "seed requested outside development");
        return Err(AppError::forbidden(
            "Forbidden: seed route is disabled in production",
        ));
    }

    let rows = state.store.replace_all(&seed_posts()).await.map_err(|e| {
        tracing::error!(error = ?e, "error seeding blog posts");
        AppError::internal("Failed to seed blog posts")
    })?;

    tracing::info!(count = rows.len(), "blog posts seeded");

    Ok((StatusCode::CREATED, Json(rows_to_response(&state, rows)?)))
}
