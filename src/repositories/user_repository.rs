use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{icontains, non_empty};
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::user;
use crate::utils::pagination::{Ordering, PageRequest};

pub const USER_ORDERING: &[&str] = &["username", "email", "created_at"];

#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    pub role: Option<RoleEnum>,
    pub search: Option<String>,
}

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: RoleEnum,
}

#[derive(Debug, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<RoleEnum>,
    pub is_active: Option<bool>,
}

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(user_id).one(self.db).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<user::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        user::Entity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await
    }

    /// Ids from `ids` that have no user row.
    pub async fn missing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, DbErr> {
        let found: Vec<Uuid> = if ids.is_empty() {
            Vec::new()
        } else {
            user::Entity::find()
                .select_only()
                .column(user::Column::Id)
                .filter(user::Column::Id.is_in(ids.iter().copied()))
                .into_tuple()
                .all(self.db)
                .await?
        };
        Ok(ids.iter().filter(|id| !found.contains(id)).copied().collect())
    }

    pub async fn find_page(
        &self,
        filter: &UserFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<(Vec<user::Model>, u64), DbErr> {
        let mut query = user::Entity::find();

        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role));
        }
        if let Some(search) = non_empty(filter.search.as_deref()) {
            query = query.filter(icontains(user::Column::Username, search));
        }

        let total = query.clone().count(self.db).await?;

        let column = match ordering.field.as_str() {
            "username" => user::Column::Username,
            "email" => user::Column::Email,
            _ => user::Column::CreatedAt,
        };
        let users = query
            .order_by(column, ordering.order())
            .order_by_asc(user::Column::Id)
            .limit(page.page_size)
            .offset(page.offset())
            .all(self.db)
            .await?;

        Ok((users, total))
    }

    pub async fn create(&self, new_user: NewUser) -> Result<user::Model, DbErr> {
        let now = Utc::now().naive_utc();
        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            password: Set(new_user.password_hash),
            role: Set(new_user.role),
            is_active: Set(true),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(&self, model: user::Model, update: UserUpdate) -> Result<user::Model, DbErr> {
        let mut active: user::ActiveModel = model.into();

        if let Some(username) = update.username {
            active.username = Set(username);
        }
        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(first_name) = update.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(password_hash) = update.password_hash {
            active.password = Set(password_hash);
        }
        if let Some(role) = update.role {
            active.role = Set(role);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().naive_utc());

        active.update(self.db).await
    }

    pub async fn touch_last_login(&self, user_id: Uuid) -> Result<(), DbErr> {
        user::Entity::update_many()
            .col_expr(
                user::Column::LastLogin,
                sea_orm::sea_query::Expr::value(Utc::now().naive_utc()),
            )
            .filter(user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;
        Ok(())
    }
}
