/*
 * Responsibility
 * - middleware の公開インターフェース
 * - http / cors / security_headers は Router 全体、auth::write は書き込み route のみ
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
