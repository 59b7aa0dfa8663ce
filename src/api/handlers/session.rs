//! Session endpoints and the auth cookie builders.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::auth::{
    session::{
        cookie_value, encode_cookie_value, CookieSession, ACCESS_TOKEN_COOKIE,
        REFRESH_TOKEN_COOKIE, SESSION_TOKEN_COOKIE, USER_COOKIE,
    },
    AuthConfig, AuthState,
};
use crate::backend::AuthGrant;

const WEEK_SECONDS: i64 = 60 * 60 * 24 * 7;
const MONTH_SECONDS: i64 = 60 * 60 * 24 * 30;

/// Session view returned to clients.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub user: Option<Value>,
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let cookies = CookieSession::from_headers(&headers);

    // The signed token is authoritative for identity; the legacy cookies
    // fill in whatever the token does not carry.
    if let Some(token) = cookie_value(&headers, SESSION_TOKEN_COOKIE) {
        if let Some(session) = state.issuer().materialize(&token) {
            let (cookie_access, cookie_refresh) = cookies
                .map(|c| (Some(c.access_token), c.refresh_token))
                .unwrap_or((None, None));

            let response = SessionResponse {
                access_token: session.access_token.or(cookie_access),
                refresh_token: session.refresh_token.or(cookie_refresh),
                user: Some(json!(session.user)),
            };
            return (StatusCode::OK, Json(response)).into_response();
        }
    }

    match cookies {
        Some(session) => {
            let response = SessionResponse {
                access_token: Some(session.access_token),
                refresh_token: session.refresh_token,
                user: session.user,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let access_token = cookie_value(&headers, ACCESS_TOKEN_COOKIE);
    let refresh_token = cookie_value(&headers, REFRESH_TOKEN_COOKIE);

    // Revocation is best-effort; the cookies are cleared regardless.
    if let (Some(access), Some(refresh)) = (access_token, refresh_token) {
        if let Err(err) = state.backend().logout(&access, &refresh).await {
            error!("Failed to revoke refresh token: {err:#}");
        }
    }

    let mut response_headers = HeaderMap::new();
    for cookie in clear_cookies(state.config()) {
        response_headers.append(SET_COOKIE, cookie);
    }

    (StatusCode::NO_CONTENT, response_headers).into_response()
}

/// Build the full auth cookie set for a fresh login: the signed session
/// token plus the legacy client-readable cookies.
pub(super) fn session_cookies(
    config: &AuthConfig,
    session_token: &str,
    grant: &AuthGrant,
) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    let secure = config.session_cookie_secure();

    let mut cookies = vec![
        cookie(
            SESSION_TOKEN_COOKIE,
            session_token,
            config.session_ttl_seconds(),
            true,
            secure,
        )?,
        cookie(
            ACCESS_TOKEN_COOKIE,
            &grant.access_token,
            WEEK_SECONDS,
            false,
            secure,
        )?,
        cookie(
            USER_COOKIE,
            &encode_cookie_value(&grant.user_json.to_string()),
            WEEK_SECONDS,
            false,
            secure,
        )?,
    ];

    if let Some(refresh) = &grant.refresh_token {
        cookies.push(cookie(
            REFRESH_TOKEN_COOKIE,
            refresh,
            MONTH_SECONDS,
            false,
            secure,
        )?);
    }

    Ok(cookies)
}

/// Expire every auth cookie, even ones that were never set.
pub(super) fn clear_cookies(config: &AuthConfig) -> Vec<HeaderValue> {
    let secure = config.session_cookie_secure();
    [
        (SESSION_TOKEN_COOKIE, true),
        (ACCESS_TOKEN_COOKIE, false),
        (REFRESH_TOKEN_COOKIE, false),
        (USER_COOKIE, false),
    ]
    .into_iter()
    .filter_map(|(name, http_only)| cookie(name, "", 0, http_only, secure).ok())
    .collect()
}

fn cookie(
    name: &str,
    value: &str,
    max_age: i64,
    http_only: bool,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; SameSite=Lax; Max-Age={max_age}");
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> AuthConfig {
        AuthConfig::new("https://ethiotravel.dev".to_string())
    }

    fn grant() -> AuthGrant {
        AuthGrant {
            user: crate::backend::BackendUser {
                id: "7".to_string(),
                username: Some("abebe".to_string()),
                email: Some("abebe@example.com".to_string()),
                image: None,
            },
            user_json: json!({"id": 7, "username": "abebe"}),
            access_token: "acc".to_string(),
            refresh_token: Some("ref".to_string()),
        }
    }

    #[test]
    fn session_cookies_cover_the_full_set() {
        let cookies = session_cookies(&config(), "signed-token", &grant()).expect("cookies");
        let rendered: Vec<String> = cookies
            .iter()
            .map(|c| c.to_str().expect("cookie header").to_string())
            .collect();

        assert!(rendered
            .iter()
            .any(|c| c.starts_with("et_session=signed-token") && c.contains("HttpOnly")));
        assert!(rendered.iter().any(|c| c.starts_with("access_token=acc")));
        assert!(rendered.iter().any(|c| c.starts_with("refresh_token=ref")));
        assert!(rendered.iter().any(|c| c.starts_with("user=")));
        assert!(rendered.iter().all(|c| c.contains("Secure")));
        assert!(rendered.iter().all(|c| c.contains("SameSite=Lax")));
    }

    #[test]
    fn refresh_cookie_is_skipped_when_absent() {
        let mut grant = grant();
        grant.refresh_token = None;
        let cookies = session_cookies(&config(), "signed-token", &grant).expect("cookies");
        assert_eq!(cookies.len(), 3);
    }

    #[test]
    fn clear_cookies_expire_everything() {
        let cookies = clear_cookies(&config());
        assert_eq!(cookies.len(), 4);
        for cookie in cookies {
            let rendered = cookie.to_str().expect("cookie header");
            assert!(rendered.contains("Max-Age=0"));
        }
    }

    #[test]
    fn plain_http_frontend_skips_the_secure_attribute() {
        let config = AuthConfig::new("http://localhost:3000".to_string());
        let cookies = session_cookies(&config, "signed-token", &grant()).expect("cookies");
        for cookie in cookies {
            assert!(!cookie.to_str().expect("cookie header").contains("Secure"));
        }
    }
}
