//! Authentication error page: maps stable error codes to their fixed
//! descriptions.

use axum::{
    extract::Query,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::error::AuthErrorCode;

#[derive(Deserialize, IntoParams, Debug)]
pub struct ErrorQuery {
    pub error: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub description: String,
}

#[utoipa::path(
    get,
    path = "/auth/error",
    params(ErrorQuery),
    responses(
        (status = 200, description = "Error description", body = ErrorResponse, content_type = "application/json"),
    ),
    tag = "auth"
)]
pub async fn auth_error(Query(query): Query<ErrorQuery>) -> impl IntoResponse {
    let code = AuthErrorCode::parse(query.error.as_deref());
    Json(ErrorResponse {
        error: code.as_str().to_string(),
        description: code.description().to_string(),
    })
}
