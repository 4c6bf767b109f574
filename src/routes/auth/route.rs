use axum::{Json, Router, http::StatusCode, routing::post};

use super::dto::TokenRequest;
use crate::config::APP_CONFIG;
use crate::extractor::JWT_MANAGER;
use crate::services::auth_service::{AuthService, TokenResponse};
use crate::services::error::ServiceError;
use crate::static_service::get_database_connection;

pub fn create_route() -> Router {
    Router::new().route("/api/v1/token", post(obtain_token))
}

/// Exchange email and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = crate::routes::error_mapper::ErrorBody)
    ),
    tag = "Authentication"
)]
pub async fn obtain_token(
    Json(payload): Json<TokenRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ServiceError> {
    let db = get_database_connection()?;
    let token = AuthService::new(db, &JWT_MANAGER, APP_CONFIG.jwt_expires_in_secs)
        .login(&payload.email, &payload.password)
        .await?;
    Ok((StatusCode::OK, Json(token)))
}
