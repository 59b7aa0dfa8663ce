//! Client for the remote EthioTravel backend API.
//!
//! The backend owns user records and issues the underlying bearer tokens;
//! this module treats it as an opaque REST service. Every call is a single
//! request with no retry policy: a failed call surfaces immediately as an
//! authentication failure.

use anyhow::{anyhow, Context, Result};
use reqwest::{header::AUTHORIZATION, Client};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument};
use url::Url;

/// User record returned by the backend. Extra backend fields are dropped
/// here; the raw record stays available on [`AuthGrant::user_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendUser {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// Successful auth response: the user record plus the issued token pair.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub user: BackendUser,
    /// Raw user record as the backend sent it, kept for the `user` cookie.
    pub user_json: Value,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// HTTP client bound to the backend base URL.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    /// Build a client for the given base URL, e.g.
    /// `https://api.ethiotravel.dev/api`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unparseable, has no host, or uses a
    /// scheme other than http/https.
    pub fn new(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url).context("Error parsing backend URL")?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(anyhow!(
                    "Error parsing backend URL: unsupported scheme {scheme}"
                ))
            }
        }

        url.host()
            .ok_or_else(|| anyhow!("Error parsing backend URL: no host specified"))?;

        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `POST /users/login/` with an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// response missing the expected auth payload.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthGrant> {
        let login_url = self.endpoint("/users/login/");
        let payload = json!({
            "email": email,
            "password": password,
        });

        debug!("login URL: {login_url}");

        let response = self.http.post(&login_url).json(&payload).send().await?;

        grant_from_response(&login_url, response).await
    }

    /// `POST /users/google-login/` with a normalized federated record.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::login`].
    #[instrument(skip(self, record))]
    pub async fn federated_login<T: Serialize + ?Sized>(&self, record: &T) -> Result<AuthGrant> {
        let exchange_url = self.endpoint("/users/google-login/");

        let response = self.http.post(&exchange_url).json(record).send().await?;

        grant_from_response(&exchange_url, response).await
    }

    /// `POST /users/register/` with a signup payload.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::login`].
    #[instrument(skip(self, payload))]
    pub async fn register<T: Serialize + ?Sized>(&self, payload: &T) -> Result<AuthGrant> {
        let register_url = self.endpoint("/users/register/");

        let response = self.http.post(&register_url).json(payload).send().await?;

        grant_from_response(&register_url, response).await
    }

    /// `POST /users/logout/` to revoke a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self, access_token, refresh_token))]
    pub async fn logout(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        let logout_url = self.endpoint("/users/logout/");
        let payload = json!({ "refresh": refresh_token });

        let response = self
            .http
            .post(&logout_url)
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Value = response.json().await.unwrap_or_default();

            return Err(anyhow!(
                "{} - {}, {}",
                logout_url,
                status,
                body["message"].as_str().unwrap_or("")
            ));
        }

        Ok(())
    }
}

async fn grant_from_response(url: &str, response: reqwest::Response) -> Result<AuthGrant> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .context("Error parsing JSON response")?;

    if !status.is_success() {
        return Err(anyhow!(
            "{} - {}, {}",
            url,
            status,
            body["message"].as_str().unwrap_or("")
        ));
    }

    parse_grant(&body)
}

fn parse_grant(body: &Value) -> Result<AuthGrant> {
    let data = body
        .get("data")
        .ok_or_else(|| anyhow!("Error parsing JSON response: no data found"))?;

    let access_token = data["access_token"]
        .as_str()
        .ok_or_else(|| anyhow!("Error parsing JSON response: no access_token found"))?
        .to_string();

    let refresh_token = data["refresh_token"].as_str().map(String::from);

    let user_json = data
        .get("user")
        .cloned()
        .ok_or_else(|| anyhow!("Error parsing JSON response: no user found"))?;

    let user: BackendUser = serde_json::from_value(user_json.clone())
        .context("Error parsing JSON response: invalid user record")?;

    Ok(AuthGrant {
        user,
        user_json,
        access_token,
        refresh_token,
    })
}

// Backend ids arrive as numbers or strings depending on the endpoint.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "invalid user id: {other}"
        ))),
    }
}
