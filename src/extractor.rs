use axum::extract::FromRequestParts;
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use http::request::Parts;
use once_cell::sync::Lazy;

use crate::config::APP_CONFIG;
use crate::services::access::Identity;
use crate::services::error::ServiceError;
use crate::utils::jwt::JwtManager;

pub static JWT_MANAGER: Lazy<JwtManager> = Lazy::new(|| JwtManager::new(&APP_CONFIG.jwt_secret));

/// Bearer identity of the caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthClaims(pub Identity);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ServiceError::unauthorized("Authentication credentials were not provided.")
                })?;

        let claims = JWT_MANAGER.decode_jwt(bearer.token())?;
        Ok(AuthClaims(claims.identity()?))
    }
}
