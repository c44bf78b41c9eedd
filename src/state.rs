/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - store: Arc<dyn PostStore>, id_codec, app_env, auth policy
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - リクエスト間で post の状態は持たない (store が唯一の所有者)
 */
use std::sync::Arc;

use crate::config::AppEnv;
use crate::repos::PostStore;
use crate::services::{auth::AuthPolicy, id_codec::IdCodec};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub id_codec: IdCodec,
    pub app_env: AppEnv,
    pub auth: AuthPolicy,
}

impl AppState {
    pub fn new(
        store: Arc<dyn PostStore>,
        id_codec: IdCodec,
        app_env: AppEnv,
        auth: AuthPolicy,
    ) -> Self {
        Self {
            store,
            id_codec,
            app_env,
            auth,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend_name())
            .field("app_env", &self.app_env)
            .field("auth_open", &self.auth.is_open())
            .finish()
    }
}
