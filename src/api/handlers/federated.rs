//! Federated (OAuth) login endpoint.
//!
//! Exchange failures are fatal to the attempt: the flow lands on the error
//! page with a stable code instead of silently issuing a session backed by
//! tokens from a different flow.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
};
use std::sync::Arc;
use tracing::{error, instrument, warn};

use super::{login::LoginResponse, session::session_cookies};
use crate::auth::{
    error::AuthErrorCode,
    federated::ProviderProfile,
    token::TokenError,
    AuthConfig, AuthState,
};

#[utoipa::path(
    post,
    path = "/api/auth/federated",
    request_body = ProviderProfile,
    responses(
        (status = 200, description = "Federated login successful", body = LoginResponse, content_type = "application/json"),
        (status = 307, description = "Exchange or configuration failure; redirect to the error page"),
        (status = 400, description = "Missing profile payload"),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn federated_login(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<ProviderProfile>>,
) -> Response {
    let profile = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    if !state.provider().is_configured() {
        warn!("Federated login attempted without a configured provider");
        return error_redirect(state.config(), AuthErrorCode::Configuration);
    }

    let session = match state
        .issuer()
        .issue_federated(state.backend(), &profile)
        .await
    {
        Ok(session) => session,
        Err(TokenError::Exchange(reason)) => {
            error!("Federated authentication failed: {reason}");
            return error_redirect(state.config(), AuthErrorCode::Callback);
        }
        Err(err) => {
            error!("Failed to mint session token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to establish session".to_string(),
            )
                .into_response();
        }
    };

    let cookies = match session_cookies(state.config(), &session.token, &session.grant) {
        Ok(cookies) => cookies,
        Err(err) => {
            error!("Failed to build session cookies: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to establish session".to_string(),
            )
                .into_response();
        }
    };

    let mut headers = HeaderMap::new();
    for cookie in cookies {
        headers.append(SET_COOKIE, cookie);
    }

    let body = LoginResponse {
        user: session.identity,
        access_token: session.grant.access_token,
        refresh_token: session.grant.refresh_token,
    };

    (StatusCode::OK, headers, Json(body)).into_response()
}

fn error_redirect(config: &AuthConfig, code: AuthErrorCode) -> Response {
    Redirect::temporary(&format!("{}?error={code}", config.error_path())).into_response()
}
