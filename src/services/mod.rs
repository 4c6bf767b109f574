pub mod academic_year_service;
pub mod access;
pub mod attachment_service;
pub mod auth_service;
pub mod course_attachment_service;
pub mod course_service;
pub mod error;
pub mod hierarchy_service;
pub mod replication_service;
pub mod request_service;
pub mod structure_service;
pub mod user_service;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::repositories::UserRepository;
use crate::services::error::{ServiceError, map_db_error};

/// Fails with a validation error naming the first id that has no user.
pub(crate) async fn ensure_users_exist(
    db: &DatabaseConnection,
    ids: &[Uuid],
) -> Result<(), ServiceError> {
    let missing = UserRepository::new(db)
        .missing_ids(ids)
        .await
        .map_err(map_db_error)?;
    match missing.first() {
        Some(id) => Err(ServiceError::validation(format!("User {id} does not exist."))),
        None => Ok(()),
    }
}
