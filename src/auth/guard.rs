//! Route guard: gates every incoming request before any page logic runs.

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::auth::{
    routes::{RouteClass, RoutePolicy},
    AuthConfig, AuthState,
};

/// Decision produced for a single request. First match wins: exclusions,
/// then the protected rule, then the auth-only rule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GuardDecision {
    PassThrough,
    RedirectToLogin,
    RedirectToLanding,
}

/// Pure decision function over the route policy.
#[must_use]
pub fn decide(policy: &RoutePolicy, path: &str, authenticated: bool) -> GuardDecision {
    if policy.is_excluded(path) {
        return GuardDecision::PassThrough;
    }

    match policy.classify(path) {
        RouteClass::Protected if !authenticated => GuardDecision::RedirectToLogin,
        RouteClass::AuthOnly if authenticated => GuardDecision::RedirectToLanding,
        _ => GuardDecision::PassThrough,
    }
}

/// Login redirect carrying the original path so the caller can return
/// after signing in.
#[must_use]
pub fn login_redirect(config: &AuthConfig, path: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("{}?redirect={encoded}", config.login_path())
}

/// Axum middleware wrapping [`decide`]. Session resolution failures have
/// already degraded to "no session" inside `AuthState::session_established`,
/// so a broken token never fails the pipeline.
pub async fn route_guard(
    Extension(state): Extension<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let authenticated = state.session_established(request.headers());

    match decide(state.policy(), &path, authenticated) {
        GuardDecision::PassThrough => next.run(request).await,
        GuardDecision::RedirectToLogin => {
            debug!("Redirecting unauthenticated request for {path} to login");
            Redirect::temporary(&login_redirect(state.config(), &path)).into_response()
        }
        GuardDecision::RedirectToLanding => {
            debug!("Redirecting authenticated request for {path} to landing");
            Redirect::temporary(state.config().landing_path()).into_response()
        }
    }
}
