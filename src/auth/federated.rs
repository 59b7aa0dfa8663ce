//! Federated authenticator: exchanges identity-provider profile claims for
//! backend-issued tokens.

use serde::{Deserialize, Serialize};
use tracing::{error, instrument};
use utoipa::ToSchema;

use crate::backend::{AuthGrant, BackendClient};

/// Tenant role assigned to every federated login.
pub const DEFAULT_TENANT_ROLE: &str = "user";

/// Username used when the profile carries neither a display name nor a
/// usable email local part.
const FALLBACK_USERNAME: &str = "google_user";

/// Narrow, validated view of an identity provider's profile claims.
///
/// Unknown provider fields are dropped at this boundary; missing fields
/// default during normalization instead of failing the exchange.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProviderProfile {
    pub email: Option<String>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

/// Normalized identity record sent to the backend's federated-login call.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FederatedRecord {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl FederatedRecord {
    /// Normalize provider claims: email defaults to empty, the username
    /// falls back from display name to the email local part to a fixed
    /// default, and names default to empty strings.
    #[must_use]
    pub fn from_profile(profile: &ProviderProfile) -> Self {
        let email = profile.email.clone().unwrap_or_default();

        let username = profile
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| {
                email
                    .split('@')
                    .next()
                    .filter(|local| !local.is_empty())
                    .map(String::from)
            })
            .unwrap_or_else(|| FALLBACK_USERNAME.to_string());

        Self {
            email,
            username,
            first_name: profile.given_name.clone().unwrap_or_default(),
            last_name: profile.family_name.clone().unwrap_or_default(),
            role: DEFAULT_TENANT_ROLE.to_string(),
        }
    }
}

/// Outcome of the federated-login exchange.
#[derive(Debug)]
pub enum Exchange {
    Granted(AuthGrant),
    Denied { reason: String },
}

/// Exchange provider claims for backend-issued tokens.
///
/// The exchange is always attempted, even for sparse profiles; the
/// backend's own success/failure governs the outcome. Backend errors are
/// resolved locally as `Denied`, never as a panic or an `Err`.
#[instrument(skip(client))]
pub async fn exchange(client: &BackendClient, profile: &ProviderProfile) -> Exchange {
    let record = FederatedRecord::from_profile(profile);

    match client.federated_login(&record).await {
        Ok(grant) => Exchange::Granted(grant),
        Err(err) => {
            error!("Federated login exchange failed: {err:#}");
            Exchange::Denied {
                reason: err.to_string(),
            }
        }
    }
}
