use crate::auth::{self, AuthState};
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::login::login,
        handlers::federated::federated_login,
        handlers::register::register,
        handlers::session::session,
        handlers::session::logout,
        handlers::auth_error::auth_error,
    ),
    components(schemas(
        handlers::login::LoginRequest,
        handlers::login::LoginResponse,
        handlers::register::RegisterRequest,
        handlers::session::SessionResponse,
        handlers::auth_error::ErrorResponse,
        handlers::AuthFailure,
        crate::auth::credentials::Identity,
        crate::auth::federated::ProviderProfile,
    )),
    tags(
        (name = "auth", description = "Login, session, and logout endpoints"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Build the gateway router: auth endpoints, docs, and the page-shell
/// fallback, all behind the route guard.
///
/// # Errors
///
/// Returns an error if the configured frontend origin is not a valid URL.
pub fn app(state: Arc<AuthState>) -> Result<Router> {
    let frontend_origin = frontend_origin(state.config().frontend_base_url())?;
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::exact(frontend_origin))
        .allow_credentials(true);

    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/auth/error", get(handlers::auth_error::auth_error))
        .route("/api/auth/login", post(handlers::login::login))
        .route("/api/auth/federated", post(handlers::federated::federated_login))
        .route("/api/auth/register", post(handlers::register::register))
        .route("/api/auth/session", get(handlers::session::session))
        .route("/api/auth/logout", post(handlers::session::logout))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::pages::shell)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(state))
                .layer(middleware::from_fn(auth::guard::route_guard)),
        );

    Ok(router)
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, state: Arc<AuthState>) -> Result<()> {
    let app = app(state)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

fn frontend_origin(frontend_base_url: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(frontend_base_url)
        .with_context(|| format!("Invalid frontend base URL: {frontend_base_url}"))?;
    let host = parsed.host_str().ok_or_else(|| {
        anyhow!("Frontend base URL must include a valid host: {frontend_base_url}")
    })?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build frontend origin header")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontend_origin_strips_paths() {
        let origin = frontend_origin("https://ethiotravel.dev/some/page").expect("origin");
        assert_eq!(origin, "https://ethiotravel.dev");
    }

    #[test]
    fn frontend_origin_keeps_explicit_ports() {
        let origin = frontend_origin("http://localhost:3000").expect("origin");
        assert_eq!(origin, "http://localhost:3000");
    }

    #[test]
    fn frontend_origin_rejects_hostless_urls() {
        assert!(frontend_origin("not a url").is_err());
        assert!(frontend_origin("unix:/tmp/sock").is_err());
    }
}
