use crate::{
    api,
    auth::{
        routes::RoutePolicy, token::SessionTokenIssuer, AuthConfig, AuthState,
        ProviderCredentials,
    },
    backend::BackendClient,
    cli::globals::GlobalArgs,
};
use anyhow::Result;
use secrecy::ExposeSecret;
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub frontend_base_url: String,
    pub landing_path: String,
    pub session_ttl_seconds: i64,
}

/// Execute the server action.
///
/// # Errors
///
/// Returns an error if the backend URL is invalid, the route table is
/// ambiguous, or the server fails to start.
pub async fn execute(args: Args, globals: &GlobalArgs) -> Result<()> {
    let config = AuthConfig::new(args.frontend_base_url)
        .with_landing_path(args.landing_path)
        .with_session_ttl_seconds(args.session_ttl_seconds);

    let policy = RoutePolicy::defaults()?;

    let backend = BackendClient::new(&globals.backend_url)?;

    let issuer = SessionTokenIssuer::new(
        globals.session_secret.expose_secret(),
        config.session_ttl_seconds(),
    );

    let provider = ProviderCredentials::new(
        globals.idp_client_id.clone(),
        globals.idp_client_secret.clone(),
    );

    let state = Arc::new(AuthState::new(config, policy, issuer, backend, provider));

    api::new(args.port, state).await
}
