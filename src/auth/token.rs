//! Session token issuer: mints and verifies the signed HS256 session token.
//!
//! The signed token is the single source of truth for identity during its
//! validity window. Backend access/refresh tokens ride along as custom
//! claims on the federated entry path; the backend is never re-consulted
//! while the token verifies.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::credentials::Identity;
use crate::auth::federated::{self, Exchange, ProviderProfile};
use crate::backend::{AuthGrant, BackendClient};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign session token")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("session token rejected")]
    Verify(#[source] jsonwebtoken::errors::Error),
    #[error("federated login exchange failed: {0}")]
    Exchange(String),
}

/// Claims carried by the session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Backend user id.
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Backend bearer token, present on the federated entry path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Session materialized from a verified token.
#[derive(Debug, Clone)]
pub struct TokenSession {
    pub user: Identity,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Result of the federated minting path: the signed token plus everything
/// the login handler needs to answer the request.
#[derive(Debug)]
pub struct FederatedSession {
    pub token: String,
    pub identity: Identity,
    pub grant: AuthGrant,
}

/// Mints and verifies signed session tokens.
pub struct SessionTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl SessionTokenIssuer {
    #[must_use]
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    /// Credentials entry: the identity was already resolved by the
    /// credential authenticator; record its id as the subject claim.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Sign`] if signing fails.
    pub fn issue_credentials(&self, identity: &Identity) -> Result<String, TokenError> {
        let claims = self.claims_for(identity, None, None);
        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Federated entry: run the exchange as part of minting. On success the
    /// backend tokens become custom claims and the subject is the backend
    /// user id; on failure minting aborts so the caller never holds a
    /// half-authenticated session.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Exchange`] when the backend denies the
    /// exchange, or [`TokenError::Sign`] if signing fails.
    pub async fn issue_federated(
        &self,
        client: &BackendClient,
        profile: &ProviderProfile,
    ) -> Result<FederatedSession, TokenError> {
        match federated::exchange(client, profile).await {
            Exchange::Granted(grant) => {
                let identity = Identity::from_backend(&grant.user);
                let claims = self.claims_for(
                    &identity,
                    Some(grant.access_token.clone()),
                    grant.refresh_token.clone(),
                );
                let token =
                    encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Sign)?;
                Ok(FederatedSession {
                    token,
                    identity,
                    grant,
                })
            }
            Exchange::Denied { reason } => Err(TokenError::Exchange(reason)),
        }
    }

    /// Verify a session token's signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Verify`] for malformed, tampered, or expired
    /// tokens.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(TokenError::Verify)
    }

    /// Materialize a session from a token, degrading to `None` on any
    /// verification failure.
    #[must_use]
    pub fn materialize(&self, token: &str) -> Option<TokenSession> {
        let claims = self.verify(token).ok()?;
        Some(TokenSession {
            user: Identity {
                id: claims.sub,
                name: claims.name,
                email: claims.email,
                image: claims.picture,
            },
            access_token: claims.access_token,
            refresh_token: claims.refresh_token,
        })
    }

    fn claims_for(
        &self,
        identity: &Identity,
        access_token: Option<String>,
        refresh_token: Option<String>,
    ) -> SessionClaims {
        let now = Utc::now().timestamp();
        SessionClaims {
            sub: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            picture: identity.image.clone(),
            access_token,
            refresh_token,
            iat: now,
            exp: now + self.ttl_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> SessionTokenIssuer {
        SessionTokenIssuer::new("unit-test-secret", 3600)
    }

    fn identity() -> Identity {
        Identity {
            id: "u1".to_string(),
            name: Some("Abebe".to_string()),
            email: Some("abebe@example.com".to_string()),
            image: Some("/media/abebe.png".to_string()),
        }
    }

    #[test]
    fn mint_then_verify_round_trips_the_subject() {
        let issuer = issuer();
        let token = issuer.issue_credentials(&identity()).expect("token");
        let claims = issuer.verify(&token).expect("claims");
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email.as_deref(), Some("abebe@example.com"));
        // Credentials entry never embeds backend tokens.
        assert!(claims.access_token.is_none());
        assert!(claims.refresh_token.is_none());
    }

    #[test]
    fn materialize_copies_subject_into_user_id() {
        let issuer = issuer();
        let token = issuer.issue_credentials(&identity()).expect("token");
        let session = issuer.materialize(&token).expect("session");
        assert_eq!(session.user.id, "u1");
        assert_eq!(session.user.name.as_deref(), Some("Abebe"));
    }

    #[test]
    fn reading_a_session_twice_is_idempotent() {
        let issuer = issuer();
        let token = issuer.issue_credentials(&identity()).expect("token");
        let first = issuer.materialize(&token).expect("first read");
        let second = issuer.materialize(&token).expect("second read");
        assert_eq!(first.user, second.user);
        assert_eq!(first.access_token, second.access_token);
        assert_eq!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let issuer = issuer();
        let token = issuer.issue_credentials(&identity()).expect("token");
        let mut tampered = token.clone();
        tampered.pop();
        assert!(issuer.verify(&tampered).is_err());
        assert!(issuer.materialize(&tampered).is_none());

        let other = SessionTokenIssuer::new("a-different-secret", 3600);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = issuer();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "u1".to_string(),
            name: None,
            email: None,
            picture: None,
            access_token: None,
            refresh_token: None,
            iat: now - 7200,
            // Past the verifier's default leeway.
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .expect("token");
        assert!(issuer.verify(&token).is_err());
        assert!(issuer.materialize(&token).is_none());
    }

    #[test]
    fn garbage_is_rejected_without_panicking() {
        let issuer = issuer();
        assert!(issuer.verify("").is_err());
        assert!(issuer.verify("not.a.token").is_err());
        assert!(issuer.materialize("{not json").is_none());
    }
}
