/// Factory: build `AuthPolicy` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthPolicy, AuthService};

pub fn build_auth_policy(config: &Config) -> anyhow::Result<AuthPolicy> {
    let Some(auth) = &config.admin_auth else {
        tracing::warn!("ACCESS_JWT_PUBLIC_KEY_PEM is not set; write endpoints accept any caller");
        return Ok(AuthPolicy::Open);
    };

    if config.admin_emails.is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty; every write request will be rejected");
    }

    let service = AuthService::new(
        &auth.access_jwt_public_key_pem,
        &auth.issuer,
        &auth.audience,
        auth.leeway_seconds,
    )
    .map_err(anyhow::Error::msg)?;

    Ok(AuthPolicy::admin_token(
        Arc::new(service),
        config.admin_emails.clone(),
    ))
}
