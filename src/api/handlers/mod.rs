pub mod auth_error;
pub mod federated;
pub mod health;
pub mod login;
pub mod pages;
pub mod register;
pub mod session;

// common helpers for the handlers

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::error::AuthErrorCode;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Inline error body rendered on failed interactive logins.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthFailure {
    pub error: String,
    pub message: String,
}

impl AuthFailure {
    #[must_use]
    pub fn from_code(code: AuthErrorCode) -> Self {
        Self {
            error: code.as_str().to_string(),
            message: code.description().to_string(),
        }
    }

    #[must_use]
    pub fn with_message(code: AuthErrorCode, message: String) -> Self {
        Self {
            error: code.as_str().to_string(),
            message,
        }
    }
}
