use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::repositories::UserRepository;
use crate::services::error::{ServiceError, map_db_error};
use crate::utils::jwt::JwtManager;

const INVALID_CREDENTIALS: &str = "No active account found with the given credentials.";

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user_id: Uuid,
    pub role: RoleEnum,
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    jwt: &'a JwtManager,
    expires_in_secs: i64,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection, jwt: &'a JwtManager, expires_in_secs: i64) -> Self {
        Self {
            db,
            jwt,
            expires_in_secs,
        }
    }

    /// Verifies email and password and issues a bearer token. Unknown emails,
    /// wrong passwords and inactive accounts all yield the same 401.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ServiceError> {
        let users = UserRepository::new(self.db);
        let user = users
            .find_by_email(email)
            .await
            .map_err(map_db_error)?
            .filter(|user| user.is_active)
            .ok_or_else(|| ServiceError::unauthorized(INVALID_CREDENTIALS))?;

        let valid = bcrypt::verify(password, &user.password).map_err(|e| {
            tracing::error!(error = %e, user_id = %user.id, "Password verification failed");
            ServiceError::internal("Password verification error.")
        })?;
        if !valid {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
        }

        let access_token =
            self.jwt
                .create_jwt(user.id, &user.username, user.role, self.expires_in_secs)?;
        users
            .touch_last_login(user.id)
            .await
            .map_err(map_db_error)?;

        tracing::info!(user_id = %user.id, "Token issued");
        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.expires_in_secs,
            user_id: user.id,
            role: user.role,
        })
    }
}
