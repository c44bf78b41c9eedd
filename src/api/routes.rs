/*
 * Responsibility
 * - /api 配下の URL 構造を定義
 * - 書き込み (create / seed) だけに認可 middleware を掛ける
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    posts::{create_post, get_post, list_posts},
    seed::seed_posts_handler,
};
use crate::middleware::auth::write::protect;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/blogs",
            get(list_posts).merge(protect(post(create_post), state.clone())),
        )
        .route("/blogs/seed", protect(post(seed_posts_handler), state))
        .route("/blogs/{post_id}", get(get_post))
}
