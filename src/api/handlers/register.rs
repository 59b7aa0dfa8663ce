//! Signup proxy: forwards a registration to the backend and establishes a
//! session on success, mirroring the credential login path.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

use super::{login::LoginResponse, session::session_cookies, valid_email, AuthFailure};
use crate::auth::{credentials::Identity, error::AuthErrorCode, federated::DEFAULT_TENANT_ROLE, AuthState};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Invalid or missing payload", body = AuthFailure),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn register(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Response {
    let request = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    if !valid_email(&request.email) {
        return rejected("Invalid email address".to_string());
    }

    if request.password.is_empty() {
        return rejected("Password must not be empty".to_string());
    }

    if request.password != request.password2 {
        return rejected("Passwords do not match".to_string());
    }

    let payload = json!({
        "username": request.username,
        "email": request.email,
        "password": request.password,
        "password2": request.password2,
        "first_name": request.first_name,
        "last_name": request.last_name,
        "role": request.role.as_deref().unwrap_or(DEFAULT_TENANT_ROLE),
    });

    let grant = match state.backend().register(&payload).await {
        Ok(grant) => grant,
        Err(err) => {
            error!("Registration rejected: {err:#}");
            return rejected(err.to_string());
        }
    };

    let identity = Identity::from_backend(&grant.user);

    let token = match state.issuer().issue_credentials(&identity) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to mint session token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to establish session".to_string(),
            )
                .into_response();
        }
    };

    let cookies = match session_cookies(state.config(), &token, &grant) {
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

    debug!("Registered user {}", identity.id);

    let mut headers = HeaderMap::new();
    for cookie in cookies {
        headers.append(SET_COOKIE, cookie);
    }

    let body = LoginResponse {
        user: identity,
        access_token: grant.access_token,
        refresh_token: grant.refresh_token,
    };

    (StatusCode::CREATED, headers, Json(body)).into_response()
}

fn rejected(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(AuthFailure::with_message(AuthErrorCode::Default, message)),
    )
        .into_response()
}
