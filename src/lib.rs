//! # EthioTravel Auth Gateway
//!
//! `ethiotravel` is the authentication gateway for the EthioTravel travel
//! discovery platform. It terminates the login flows (credential and
//! federated), mints and verifies signed session tokens, and gates page
//! routes before any page logic runs.
//!
//! ## Sessions
//!
//! Sessions are stateless: a signed HS256 token (`et_session` cookie) is the
//! single source of truth for identity during its validity window. The
//! gateway never keeps a server-side session table; the remote backend owns
//! user records and issues the underlying bearer tokens.
//!
//! Legacy cookie sessions (`access_token`, `refresh_token`, `user`) set by
//! the login proxy remain readable so that clients authenticated under the
//! older cookie scheme stay authenticated.
//!
//! ## Route protection
//!
//! Every incoming request passes through the route guard, which classifies
//! the path (public, protected, auth-only) against a single process-wide
//! table and decides allow / redirect-to-login / redirect-to-landing.
//! A malformed or expired session token degrades to anonymous access; it
//! never fails the request pipeline.

pub mod api;
pub mod auth;
pub mod backend;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
