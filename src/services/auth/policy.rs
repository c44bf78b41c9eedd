/*
 * Responsibility
 * - 書き込み系 endpoint (create / seed) の認可方針
 * - Open: 検証なし (鍵が未設定の場合)
 * - AdminToken: Bearer JWT を検証し、email が allow-list に含まれることを要求
 */
use std::sync::Arc;

use crate::api::extractors::AuthCtx;
use crate::services::auth::AuthService;

#[derive(Debug, PartialEq, Eq)]
pub enum Denied {
    // token がない / 検証に失敗した
    Unauthenticated,
    // token は正しいが admin ではない
    NotAdmin,
}

#[derive(Clone, Debug)]
pub enum AuthPolicy {
    Open,
    AdminToken {
        service: Arc<AuthService>,
        admin_emails: Arc<[String]>,
    },
}

impl AuthPolicy {
    pub fn admin_token(service: Arc<AuthService>, admin_emails: Vec<String>) -> Self {
        let admin_emails = admin_emails
            .into_iter()
            .map(|e| e.trim().to_ascii_lowercase())
            .collect::<Vec<_>>()
            .into();

        Self::AdminToken {
            service,
            admin_emails,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// bearer token (Authorization ヘッダから取り出したもの) を認可する。
    ///
    /// `Open` の場合は token を見ずに `Ok(None)` を返す。
    pub fn authorize(&self, bearer: Option<&str>) -> Result<Option<AuthCtx>, Denied> {
        let (service, admin_emails) = match self {
            Self::Open => return Ok(None),
            Self::AdminToken {
                service,
                admin_emails,
            } => (service, admin_emails),
        };

        let token = bearer.ok_or(Denied::Unauthenticated)?;

        let verified = service.verify_verified(token).map_err(|err| {
            tracing::warn!(error = %err, "access token verification failed");
            Denied::Unauthenticated
        })?;

        if !admin_emails.iter().any(|e| *e == verified.email) {
            tracing::warn!(email = %verified.email, "write attempt by non-admin");
            return Err(Denied::NotAdmin);
        }

        Ok(Some(AuthCtx::new(verified.subject, verified.email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::access_jwt::test_keys::*;

    fn policy() -> AuthPolicy {
        let service = AuthService::new(PUBLIC_PEM, ISSUER, AUDIENCE, 0).unwrap();
        AuthPolicy::admin_token(Arc::new(service), vec![" Admin@Example.com ".to_string()])
    }

    #[test]
    fn open_policy_ignores_tokens() {
        assert_eq!(AuthPolicy::Open.authorize(None).unwrap().map(|c| c.email), None);
        assert!(AuthPolicy::Open.authorize(Some("garbage")).is_ok());
    }

    #[test]
    fn admin_token_requires_allow_listed_email() {
        let policy = policy();

        let ctx = policy
            .authorize(Some(&token_for("admin@example.com")))
            .unwrap()
            .unwrap();
        assert_eq!(ctx.email, "admin@example.com");

        assert_eq!(
            policy.authorize(Some(&token_for("reader@example.com"))).unwrap_err(),
            Denied::NotAdmin
        );
        assert_eq!(policy.authorize(None).unwrap_err(), Denied::Unauthenticated);
        assert_eq!(
            policy.authorize(Some("not.a.jwt")).unwrap_err(),
            Denied::Unauthenticated
        );
    }
}
