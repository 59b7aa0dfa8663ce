//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the server action and the process-wide
//! globals; secrets never leave `GlobalArgs`.

use crate::cli::{
    actions::{server, Action},
    globals::GlobalArgs,
};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action plus globals.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let backend_url = matches
        .get_one::<String>("backend-url")
        .cloned()
        .context("missing required argument: --backend-url")?;

    let session_secret = matches
        .get_one::<String>("session-secret")
        .cloned()
        .context("missing required argument: --session-secret")?;

    let frontend_base_url = matches
        .get_one::<String>("frontend-url")
        .cloned()
        .unwrap_or_else(|| "http://localhost:3000".to_string());

    let landing_path = matches
        .get_one::<String>("landing-path")
        .cloned()
        .unwrap_or_else(|| "/home".to_string());

    let session_ttl_seconds = matches
        .get_one::<i64>("session-ttl")
        .copied()
        .unwrap_or(604_800);

    let mut globals = GlobalArgs::new(backend_url);
    globals.set_session_secret(SecretString::from(session_secret));

    if let Some(client_id) = matches.get_one::<String>("idp-client-id") {
        let client_secret = matches
            .get_one::<String>("idp-client-secret")
            .cloned()
            .unwrap_or_default();
        globals.set_idp_client(client_id.clone(), SecretString::from(client_secret));
    }

    let action = Action::Server(server::Args {
        port,
        frontend_base_url,
        landing_path,
        session_ttl_seconds,
    });

    Ok((action, globals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn handler_builds_action_and_globals() {
        temp_env::with_vars(
            [
                ("ETHIOTRAVEL_BACKEND_URL", None::<&str>),
                ("ETHIOTRAVEL_SESSION_SECRET", None::<&str>),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec![
                    "ethiotravel",
                    "--backend-url",
                    "https://api.ethiotravel.dev/api",
                    "--session-secret",
                    "sekret",
                    "--landing-path",
                    "/",
                    "--idp-client-id",
                    "client-id",
                    "--idp-client-secret",
                    "client-secret",
                ]);

                let (action, globals) = handler(&matches).expect("handler");
                let Action::Server(args) = action;
                assert_eq!(args.port, 8080);
                assert_eq!(args.frontend_base_url, "http://localhost:3000");
                assert_eq!(args.landing_path, "/");
                assert_eq!(args.session_ttl_seconds, 604_800);
                assert_eq!(globals.backend_url, "https://api.ethiotravel.dev/api");
                assert_eq!(globals.session_secret.expose_secret(), "sekret");
                assert_eq!(globals.idp_client_id, "client-id");
            },
        );
    }
}
