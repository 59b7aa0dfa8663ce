//! End-to-end tests for the route guard and session endpoints, driven
//! through the full router with `tower::ServiceExt::oneshot`.

use anyhow::Result;
use axum::{
    body::Body,
    http::{
        header::{COOKIE, LOCATION},
        Request, StatusCode,
    },
    Router,
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use ethiotravel::{
    api,
    auth::{
        credentials::Identity, routes::RoutePolicy, token::SessionTokenIssuer, AuthConfig,
        AuthState, ProviderCredentials,
    },
    backend::BackendClient,
};

const TEST_SECRET: &str = "integration-test-secret";

fn state() -> Result<Arc<AuthState>> {
    let config = AuthConfig::new("https://ethiotravel.dev".to_string());
    let ttl = config.session_ttl_seconds();
    Ok(Arc::new(AuthState::new(
        config,
        RoutePolicy::defaults()?,
        SessionTokenIssuer::new(TEST_SECRET, ttl),
        // Never called by these tests; an unreachable host keeps it honest.
        BackendClient::new("https://backend.invalid/api")?,
        ProviderCredentials::new(String::new(), SecretString::default()),
    )))
}

fn app(state: &Arc<AuthState>) -> Result<Router> {
    api::app(state.clone())
}

fn minted_session(state: &Arc<AuthState>) -> Result<String> {
    let identity = Identity {
        id: "u1".to_string(),
        name: Some("Abebe".to_string()),
        email: Some("abebe@example.com".to_string()),
        image: None,
    };
    Ok(state.issuer().issue_credentials(&identity)?)
}

fn get(uri: &str, cookie: Option<&str>) -> Result<Request<Body>> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    Ok(builder.body(Body::empty())?)
}

#[tokio::test]
async fn protected_path_without_session_redirects_to_login() -> Result<()> {
    let state = state()?;
    let response = app(&state)?.oneshot(get("/profile", None)?).await?;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[LOCATION], "/login?redirect=%2Fprofile");
    Ok(())
}

#[tokio::test]
async fn protected_subpath_keeps_the_return_path() -> Result<()> {
    let state = state()?;
    let response = app(&state)?.oneshot(get("/blog/create", None)?).await?;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[LOCATION],
        "/login?redirect=%2Fblog%2Fcreate"
    );
    Ok(())
}

#[tokio::test]
async fn auth_page_with_valid_session_redirects_to_landing() -> Result<()> {
    let state = state()?;
    let token = minted_session(&state)?;
    let cookie = format!("et_session={token}");

    let response = app(&state)?.oneshot(get("/login", Some(&cookie))?).await?;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[LOCATION], "/home");
    Ok(())
}

#[tokio::test]
async fn auth_page_with_legacy_access_token_cookie_redirects() -> Result<()> {
    let state = state()?;
    let response = app(&state)?
        .oneshot(get("/signup", Some("access_token=opaque-bearer"))?)
        .await?;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[LOCATION], "/home");
    Ok(())
}

#[tokio::test]
async fn public_path_passes_through_unchanged() -> Result<()> {
    let state = state()?;
    let response = app(&state)?.oneshot(get("/blog", None)?).await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn auth_page_without_session_passes_through() -> Result<()> {
    let state = state()?;
    let response = app(&state)?.oneshot(get("/login", None)?).await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn protected_path_with_session_passes_through() -> Result<()> {
    let state = state()?;
    let token = minted_session(&state)?;
    let cookie = format!("et_session={token}");

    let response = app(&state)?.oneshot(get("/profile", Some(&cookie))?).await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn broken_session_token_degrades_to_anonymous() -> Result<()> {
    let state = state()?;
    let response = app(&state)?
        .oneshot(get("/profile", Some("et_session=garbage.token.here"))?)
        .await?;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[LOCATION], "/login?redirect=%2Fprofile");
    Ok(())
}

#[tokio::test]
async fn session_round_trip_preserves_user_id() -> Result<()> {
    let state = state()?;
    let token = minted_session(&state)?;
    let cookie = format!("et_session={token}");

    let response = app(&state)?
        .oneshot(get("/api/auth/session", Some(&cookie))?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await?.to_bytes();
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["user"]["id"], "u1");
    assert_eq!(body["user"]["email"], "abebe@example.com");
    Ok(())
}

#[tokio::test]
async fn malformed_user_cookie_still_yields_a_session() -> Result<()> {
    let state = state()?;
    let response = app(&state)?
        .oneshot(get(
            "/api/auth/session",
            Some("access_token=tok123; user={not json"),
        )?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await?.to_bytes();
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["access_token"], "tok123");
    assert_eq!(body["user"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn session_endpoint_without_cookies_is_no_content() -> Result<()> {
    let state = state()?;
    let response = app(&state)?.oneshot(get("/api/auth/session", None)?).await?;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn error_page_is_reachable_without_a_session() -> Result<()> {
    let state = state()?;
    let response = app(&state)?
        .oneshot(get("/auth/error?error=CredentialsSignin", None)?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await?.to_bytes();
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["error"], "CredentialsSignin");
    assert_eq!(body["description"], "The credentials you provided were invalid.");
    Ok(())
}

#[tokio::test]
async fn unknown_error_code_falls_back_to_default() -> Result<()> {
    let state = state()?;
    let response = app(&state)?
        .oneshot(get("/auth/error?error=Bogus", None)?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await?.to_bytes();
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["error"], "Default");
    Ok(())
}

#[tokio::test]
async fn health_reports_name_and_version() -> Result<()> {
    let state = state()?;
    let response = app(&state)?.oneshot(get("/health", None)?).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));
    let bytes = response.into_body().collect().await?.to_bytes();
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["name"], env!("CARGO_PKG_NAME"));
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookies_even_without_a_backend() -> Result<()> {
    let state = state()?;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .body(Body::empty())?;

    let response = app(&state)?.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared: Vec<&str> = response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert_eq!(cleared.len(), 4);
    assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));
    Ok(())
}
