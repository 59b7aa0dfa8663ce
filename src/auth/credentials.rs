//! Credential authenticator: email/password login against the backend.

use serde::{Deserialize, Serialize};
use tracing::{error, instrument};
use utoipa::ToSchema;

use crate::backend::{AuthGrant, BackendClient, BackendUser};

/// Avatar substituted when the backend user record carries no image.
pub const PLACEHOLDER_AVATAR: &str = "/placeholder.svg?height=40&width=40";

/// Local user identity, mapped from a backend user record.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl Identity {
    /// Map the backend record's fields into the local identity shape.
    #[must_use]
    pub fn from_backend(user: &BackendUser) -> Self {
        let image = user
            .image
            .clone()
            .filter(|image| !image.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_AVATAR.to_string());

        Self {
            id: user.id.clone(),
            name: user.username.clone(),
            email: user.email.clone(),
            image: Some(image),
        }
    }
}

/// Successful credential authentication: the mapped identity plus the
/// backend-issued grant it was derived from.
#[derive(Clone, Debug)]
pub struct Authenticated {
    pub identity: Identity,
    pub grant: AuthGrant,
}

/// Validate an email/password pair against the backend.
///
/// Empty credentials short-circuit to `None` without a backend call. Any
/// non-success from the backend, including transport failures, also
/// resolves to `None`; this boundary never returns an error.
#[instrument(skip(client, password))]
pub async fn authenticate(
    client: &BackendClient,
    email: &str,
    password: &str,
) -> Option<Authenticated> {
    if email.is_empty() || password.is_empty() {
        return None;
    }

    match client.login(email, password).await {
        Ok(grant) => {
            let identity = Identity::from_backend(&grant.user);
            Some(Authenticated { identity, grant })
        }
        Err(err) => {
            error!("Login rejected: {err:#}");
            None
        }
    }
}
