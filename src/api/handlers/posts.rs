/*
 * Responsibility
 * - /api/blogs 系 handler (list / create / get)
 * - Path の {post_id} は公開 ID → extractor で復号化して内部 ID に変換して受け取る
 * - store のエラーはここで tracing に出し、クライアントには不透明な 500 を返す
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    api::{
        dto::posts::{CreatePostRequest, PostResponse},
        extractors::{MaybeAuthCtx, PublicPostId},
    },
    error::AppError,
    repos::PostRow,
    state::AppState,
};

pub(crate) fn row_to_response(state: &AppState, row: PostRow) -> Result<PostResponse, AppError> {
    let public_id = state.id_codec.encode(row.post_id).map_err(|e| {
        tracing::error!(error = %e, post_id = row.post_id, "failed to encode public id");
        AppError::from(e)
    })?;

    Ok(PostResponse {
        id: public_id,
        title: row.title,
        content: row.content,
        created_at: row.created_at,
    })
}

pub(crate) fn rows_to_response(
    state: &AppState,
    rows: Vec<PostRow>,
) -> Result<Vec<PostResponse>, AppError> {
    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(state, row)?);
    }
    Ok(res)
}

pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let rows = state.store.list().await.map_err(|e| {
        tracing::error!(error = ?e, "error fetching blog posts");
        AppError::internal("Server error retrieving posts")
    })?;

    Ok(Json(rows_to_response(&state, rows)?))
}

pub async fn create_post(
    State(state): State<AppState>,
    MaybeAuthCtx(auth): MaybeAuthCtx,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected create payload");
        AppError::bad_request("INVALID_JSON", rejection.body_text())
    })?;

    let new_post = req.validate().map_err(AppError::validation)?;

    let row = state.store.create(&new_post).await.map_err(|e| {
        tracing::error!(error = ?e, "error creating blog post");
        AppError::internal("Server error creating blog post")
    })?;

    tracing::info!(
        post_id = row.post_id,
        author = auth.as_ref().map(|a| a.email.as_str()),
        subject = auth.as_ref().map(|a| a.subject.as_str()),
        "blog post created"
    );

    let res = row_to_response(&state, row)?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn get_post(
    State(state): State<AppState>,
    post_id: PublicPostId,
) -> Result<Json<PostResponse>, AppError> {
    let row = state
        .store
        .get(post_id.id)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, post_id = post_id.id, "error fetching blog post");
            AppError::internal("Server error retrieving post")
        })?
        .ok_or(AppError::not_found("post"))?;

    Ok(Json(row_to_response(&state, row)?))
}
