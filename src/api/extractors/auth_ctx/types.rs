/*
 * Responsibility
 * - Handler から見える「認可済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは services/auth 側の責務
 */

/// 認可済み (admin) の書き込みリクエストに付与されるコンテキスト
///
/// - `subject` は identity provider の `sub`
/// - `email` は allow-list と照合済みの email (lowercase)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: String,
    pub email: String,
}

impl AuthCtx {
    pub fn new(subject: String, email: String) -> Self {
        Self { subject, email }
    }
}
