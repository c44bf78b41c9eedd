//! 書き込み系 endpoint (create / seed) の認可 middleware
//!
//! - `Authorization: Bearer <jwt>` を取り出し、AuthPolicy に判定を任せる
//! - 許可された場合は AuthCtx を extensions に入れる (handler は MaybeAuthCtx で受け取る)
//! - 読み取り系には掛けない

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::policy::Denied;
use crate::state::AppState;

/// 個々の MethodRouter に認可を掛ける。
///
/// 例：
/// ```ignore
/// .route("/blogs/seed", middleware::auth::write::protect(post(seed), state.clone()))
/// ```
pub fn protect(route: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    route.route_layer(middleware::from_fn_with_state(state, write_middleware))
}

// auth scheme は大文字小文字を区別しない ("Bearer" / "bearer")
fn bearer_token(req: &Request<Body>) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_at_checked(7)?;
    if !scheme.eq_ignore_ascii_case("bearer ") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}

async fn write_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_ctx = match state.auth.authorize(bearer_token(&req)) {
        Ok(ctx) => ctx,
        Err(Denied::Unauthenticated) => return Err(AppError::Unauthorized),
        Err(Denied::NotAdmin) => return Err(AppError::forbidden("admin access required")),
    };

    // middleware → extractor への受け渡し
    if let Some(ctx) = auth_ctx {
        req.extensions_mut().insert(ctx);
    }

    Ok(next.run(req).await)
}
