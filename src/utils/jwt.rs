use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::services::access::Identity;
use crate::services::error::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub sub: String,
    pub username: String,
    pub role: RoleEnum,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn identity(&self) -> Result<Identity, ServiceError> {
        let user_id = Uuid::parse_str(&self.sub)
            .map_err(|_| ServiceError::unauthorized("Token subject is not a valid user id."))?;
        Ok(Identity::new(user_id, self.role))
    }
}

/// HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 5;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn create_jwt(
        &self,
        user_id: Uuid,
        username: &str,
        role: RoleEnum,
        expires_in_secs: i64,
    ) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role,
            iat: now,
            exp: now + expires_in_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            ServiceError::internal("Failed to create token.")
        })
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenClaims, ServiceError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ServiceError::unauthorized("Token has expired.")
                }
                _ => ServiceError::unauthorized("Invalid token."),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::ServiceErrorKind;

    #[test]
    fn issued_token_decodes_to_identity() {
        let manager = JwtManager::new("test-secret");
        let user_id = Uuid::new_v4();

        let token = manager
            .create_jwt(user_id, "professor1", RoleEnum::Professor, 60)
            .unwrap();
        let claims = manager.decode_jwt(&token).unwrap();

        assert_eq!(claims.username, "professor1");
        let identity = claims.identity().unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, RoleEnum::Professor);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let manager = JwtManager::new("test-secret");
        let token = manager
            .create_jwt(Uuid::new_v4(), "ta1", RoleEnum::Ta, -3600)
            .unwrap();

        let err = manager.decode_jwt(&token).unwrap_err();
        assert_eq!(err.kind(), ServiceErrorKind::Unauthorized);
        assert_eq!(err.message(), "Token has expired.");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = JwtManager::new("one")
            .create_jwt(Uuid::new_v4(), "admin1", RoleEnum::Admin, 60)
            .unwrap();

        let err = JwtManager::new("two").decode_jwt(&token).unwrap_err();
        assert_eq!(err.kind(), ServiceErrorKind::Unauthorized);
    }
}
