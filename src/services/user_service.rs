use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::user;
use crate::repositories::user_repository::{NewUser, UserUpdate};
use crate::repositories::{OwnershipCascade, UserFilter, UserRepository};
use crate::services::access::{Identity, require_admin};
use crate::services::error::{ServiceError, map_db_error};
use crate::services::validation::{validate_email, validate_password};
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub struct UserInput {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: RoleEnum,
}

#[derive(Debug, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<RoleEnum>,
    pub is_active: Option<bool>,
}

pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        tracing::error!(error = %e, "Failed to hash password");
        ServiceError::internal("Failed to hash password.")
    })
}

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        identity: &Identity,
        filter: &UserFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<Paginated<user::Model>, ServiceError> {
        require_admin(identity)?;
        let (users, total) = UserRepository::new(self.db)
            .find_page(filter, page, ordering)
            .await
            .map_err(map_db_error)?;
        Ok(Paginated::new(users, total, page))
    }

    pub async fn get(&self, identity: &Identity, id: Uuid) -> Result<user::Model, ServiceError> {
        require_admin(identity)?;
        self.find(id).await
    }

    /// The caller's own record.
    pub async fn me(&self, identity: &Identity) -> Result<user::Model, ServiceError> {
        self.find(identity.user_id).await
    }

    pub async fn create(&self, identity: &Identity, input: UserInput) -> Result<user::Model, ServiceError> {
        require_admin(identity)?;
        self.provision(input).await
    }

    /// Creates a user without a caller check. Used by the admin endpoint and
    /// by startup seeding.
    pub async fn provision(&self, input: UserInput) -> Result<user::Model, ServiceError> {
        let username = input.username.trim().to_string();
        if username.is_empty() {
            return Err(ServiceError::validation("Username may not be blank."));
        }
        let email = validate_email(&input.email)?;
        validate_password(&input.password)?;
        self.ensure_email_free(&email, None).await?;

        let user = UserRepository::new(self.db)
            .create(NewUser {
                username,
                email,
                first_name: input.first_name.trim().to_string(),
                last_name: input.last_name.trim().to_string(),
                password_hash: hash_password(&input.password)?,
                role: input.role,
            })
            .await
            .map_err(map_db_error)?;

        tracing::info!(user_id = %user.id, role = user.role.label(), "User created");
        Ok(user)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<user::Model, ServiceError> {
        require_admin(identity)?;
        let user = self.find(id).await?;

        let username = match changes.username {
            Some(username) => {
                let username = username.trim().to_string();
                if username.is_empty() {
                    return Err(ServiceError::validation("Username may not be blank."));
                }
                Some(username)
            }
            None => None,
        };
        let email = match changes.email {
            Some(email) => {
                let email = validate_email(&email)?;
                self.ensure_email_free(&email, Some(id)).await?;
                Some(email)
            }
            None => None,
        };
        let password_hash = match changes.password {
            Some(password) => {
                validate_password(&password)?;
                Some(hash_password(&password)?)
            }
            None => None,
        };

        UserRepository::new(self.db)
            .update(
                user,
                UserUpdate {
                    username,
                    email,
                    first_name: changes.first_name,
                    last_name: changes.last_name,
                    password_hash,
                    role: changes.role,
                    is_active: changes.is_active,
                },
            )
            .await
            .map_err(map_db_error)
    }

    pub async fn delete(&self, identity: &Identity, id: Uuid) -> Result<(), ServiceError> {
        require_admin(identity)?;
        if identity.user_id == id {
            return Err(ServiceError::validation("You cannot delete your own account."));
        }
        self.find(id).await?;

        let txn = self.db.begin().await.map_err(map_db_error)?;
        OwnershipCascade::new(&txn)
            .delete_user(id)
            .await
            .map_err(map_db_error)?;
        txn.commit().await.map_err(map_db_error)?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        UserRepository::new(self.db)
            .find_by_id(id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| ServiceError::not_found("User not found."))
    }

    async fn ensure_email_free(&self, email: &str, except: Option<Uuid>) -> Result<(), ServiceError> {
        let existing = UserRepository::new(self.db)
            .find_by_email(email)
            .await
            .map_err(map_db_error)?;
        match existing {
            Some(user) if Some(user.id) != except => Err(ServiceError::conflict(
                "A user with this email already exists.",
            )),
            _ => Ok(()),
        }
    }
}
