/**
 * Responsibility
 * - store が上位に伝える意味の定義
 * - 上位 (handler) はこれを不透明な 5xx に変換する
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("migration error")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
