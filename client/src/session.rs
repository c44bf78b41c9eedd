/*
 * Responsibility
 * - identity provider の認証状態に応じて保護ページの描画を制御する (Loading / login redirect / render)
 * - admin 判定は固定 allow-list との email 照合のみ (nav の "New Post" 表示用)
 *
 * Notes
 * - ローカルには session 状態を持たない。毎回 provider に問い合わせる
 * - 書き込みの本当の認可は API 側 (AuthPolicy) の責務
 */
use std::fmt::Write as _;

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Loading,
    Unauthenticated,
    Authenticated(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// External identity provider, injected by the front-end.
pub trait IdentityProvider: Send + Sync {
    fn state(&self) -> AuthState;

    fn login_with_redirect(&self);

    fn logout(&self, return_to: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate<T> {
    Placeholder(&'static str),
    Redirected,
    Render(T),
}

pub struct SessionGate<'a> {
    provider: &'a dyn IdentityProvider,
}

impl<'a> SessionGate<'a> {
    pub fn new(provider: &'a dyn IdentityProvider) -> Self {
        Self { provider }
    }

    /// Build `child` only for an authenticated session.
    pub fn guard<T>(&self, child: impl FnOnce(&User) -> T) -> Gate<T> {
        match self.provider.state() {
            AuthState::Loading => Gate::Placeholder("Loading..."),
            AuthState::Unauthenticated => {
                tracing::info!("no session, redirecting to login");
                self.provider.login_with_redirect();
                Gate::Redirected
            }
            AuthState::Authenticated(user) => Gate::Render(child(&user)),
        }
    }

    /// Nav bar "Login". `false` when a session already exists.
    pub fn login(&self) -> bool {
        match self.provider.state() {
            AuthState::Authenticated(_) => false,
            _ => {
                self.provider.login_with_redirect();
                true
            }
        }
    }

    /// Nav bar "Logout": the provider sends the user back to the site origin.
    /// Returns that origin, or `None` when nobody is signed in.
    pub fn logout(&self, site: &Url) -> Option<String> {
        self.provider.state().user()?;
        let return_to = site.origin().ascii_serialization();
        self.provider.logout(&return_to);
        Some(return_to)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: Vec<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| e.as_ref().trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    pub fn is_admin(&self, state: &AuthState) -> bool {
        state.user().is_some_and(|user| {
            let email = user.email.trim().to_ascii_lowercase();
            self.emails.iter().any(|e| *e == email)
        })
    }
}

pub fn render_nav(state: &AuthState, admins: &AdminAllowList) -> String {
    let mut out = String::from("Home | Blog");
    if admins.is_admin(state) {
        out.push_str(" | New Post");
    }
    match state {
        AuthState::Loading => {}
        AuthState::Unauthenticated => out.push_str(" | Login"),
        AuthState::Authenticated(user) => {
            let _ = write!(out, " | Welcome, {} | Logout", user.email);
        }
    }
    out
}

/// Provider backed by a fixed email, or none. Login and logout only log
/// where the browser would be sent.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    email: Option<String>,
    login_url: String,
}

impl StaticIdentity {
    pub fn new(email: Option<String>, login_url: impl Into<String>) -> Self {
        Self {
            email: email.filter(|e| !e.trim().is_empty()),
            login_url: login_url.into(),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn state(&self) -> AuthState {
        match &self.email {
            Some(email) => AuthState::Authenticated(User {
                email: email.clone(),
            }),
            None => AuthState::Unauthenticated,
        }
    }

    fn login_with_redirect(&self) {
        tracing::info!(login_url = %self.login_url, "login required");
    }

    fn logout(&self, return_to: &str) {
        tracing::info!(return_to, "logged out");
    }
}
