use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use super::dto::{CreateUserRequest, UpdateUserRequest, UserQueryParams, UserResponse};
use crate::extractor::AuthClaims;
use crate::repositories::UserFilter;
use crate::repositories::user_repository::USER_ORDERING;
use crate::services::error::ServiceError;
use crate::services::user_service::UserService;
use crate::static_service::get_database_connection;
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/users", get(list_users).post(create_user))
        .route(
            "/api/v1/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/v1/user", get(current_user))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserQueryParams),
    responses(
        (status = 200, description = "Users", body = Paginated<UserResponse>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    AuthClaims(identity): AuthClaims,
    Query(params): Query<UserQueryParams>,
) -> Result<(StatusCode, Json<Paginated<UserResponse>>), ServiceError> {
    let ordering = Ordering::parse(params.ordering.as_deref(), USER_ORDERING, "-created_at")?;
    let filter = UserFilter {
        role: params.role,
        search: params.search,
    };
    let db = get_database_connection()?;
    let page = UserService::new(db)
        .list(
            &identity,
            &filter,
            PageRequest::new(params.page, params.page_size),
            &ordering,
        )
        .await?;
    Ok((StatusCode::OK, Json(page.map(UserResponse::from))))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input or duplicate email"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn create_user(
    AuthClaims(identity): AuthClaims,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ServiceError> {
    let db = get_database_connection()?;
    let user = UserService::new(db).create(&identity, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    AuthClaims(identity): AuthClaims,
    Path(user_id): Path<Uuid>,
) -> Result<(StatusCode, Json<UserResponse>), ServiceError> {
    let db = get_database_connection()?;
    let user = UserService::new(db).get(&identity, user_id).await?;
    Ok((StatusCode::OK, Json(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    AuthClaims(identity): AuthClaims,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ServiceError> {
    let db = get_database_connection()?;
    let user = UserService::new(db)
        .update(&identity, user_id, payload.into())
        .await?;
    Ok((StatusCode::OK, Json(user.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    AuthClaims(identity): AuthClaims,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    let db = get_database_connection()?;
    UserService::new(db).delete(&identity, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The authenticated caller
#[utoipa::path(
    get,
    path = "/api/v1/user",
    responses((status = 200, description = "Current user", body = UserResponse)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn current_user(
    AuthClaims(identity): AuthClaims,
) -> Result<(StatusCode, Json<UserResponse>), ServiceError> {
    let db = get_database_connection()?;
    let user = UserService::new(db).me(&identity).await?;
    Ok((StatusCode::OK, Json(user.into())))
}
