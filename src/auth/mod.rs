//! Authentication, session, and route-protection layer.
//!
//! Flow Overview: the route guard resolves the request's session (signed
//! token first, legacy cookies as fallback) and gates the path against the
//! process-wide route policy. Login handlers call the credential or
//! federated authenticator, which resolve an identity against the remote
//! backend; the token issuer then mints the signed session cookie.

pub mod credentials;
pub mod error;
pub mod federated;
pub mod guard;
pub mod routes;
pub mod session;
pub mod token;

use axum::http::HeaderMap;
use secrecy::SecretString;
use tracing::debug;

use crate::backend::BackendClient;
use routes::RoutePolicy;
use session::{cookie_value, CookieSession, SESSION_TOKEN_COOKIE};
use token::SessionTokenIssuer;

const DEFAULT_SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_LANDING_PATH: &str = "/home";
const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_ERROR_PATH: &str = "/auth/error";

/// Static gateway configuration, constructed once at process start and
/// passed by reference into the guard and the handlers.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    landing_path: String,
    login_path: String,
    error_path: String,
    session_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            landing_path: DEFAULT_LANDING_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            error_path: DEFAULT_ERROR_PATH.to_string(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_landing_path(mut self, path: String) -> Self {
        self.landing_path = path;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn error_path(&self) -> &str {
        &self.error_path
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    /// Only mark cookies secure when the frontend is served over HTTPS.
    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}

/// Identity-provider client credentials, treated as opaque configuration.
#[derive(Clone)]
pub struct ProviderCredentials {
    client_id: String,
    client_secret: SecretString,
}

impl ProviderCredentials {
    #[must_use]
    pub fn new(client_id: String, client_secret: SecretString) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }

    /// A federated login attempted without a configured provider maps to
    /// the `Configuration` error code.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty()
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Shared per-process auth state: configuration, route policy, token
/// issuer, and the backend client.
pub struct AuthState {
    config: AuthConfig,
    policy: RoutePolicy,
    issuer: SessionTokenIssuer,
    backend: BackendClient,
    provider: ProviderCredentials,
}

impl AuthState {
    #[must_use]
    pub fn new(
        config: AuthConfig,
        policy: RoutePolicy,
        issuer: SessionTokenIssuer,
        backend: BackendClient,
        provider: ProviderCredentials,
    ) -> Self {
        Self {
            config,
            policy,
            issuer,
            backend,
            provider,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    #[must_use]
    pub fn issuer(&self) -> &SessionTokenIssuer {
        &self.issuer
    }

    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    #[must_use]
    pub fn provider(&self) -> &ProviderCredentials {
        &self.provider
    }

    /// Resolve whether the request carries a valid session.
    ///
    /// The signed session token is authoritative; a missing or broken token
    /// degrades to the legacy cookie check, never to an error.
    #[must_use]
    pub fn session_established(&self, headers: &HeaderMap) -> bool {
        if let Some(token) = cookie_value(headers, SESSION_TOKEN_COOKIE) {
            match self.issuer.verify(&token) {
                Ok(_) => return true,
                Err(err) => debug!("Session token rejected: {err}"),
            }
        }
        CookieSession::from_headers(headers).is_some()
    }
}
