use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use super::dto::{CreatePointerRequest, PointerQueryParams, PointerResponse, UpdatePointerRequest};
use crate::extractor::AuthClaims;
use crate::repositories::PointerFilter;
use crate::repositories::pointer_repository::POINTER_ORDERING;
use crate::services::error::ServiceError;
use crate::services::hierarchy_service::HierarchyService;
use crate::static_service::{get_database_connection, get_file_store};
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/pointers", get(list_pointers).post(create_pointer))
        .route(
            "/api/v1/pointers/{pointer_id}",
            get(get_pointer).put(update_pointer).delete(delete_pointer),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/pointers",
    params(PointerQueryParams),
    responses((status = 200, description = "Pointers", body = Paginated<PointerResponse>)),
    security(("bearer_auth" = [])),
    tag = "Pointers"
)]
pub async fn list_pointers(
    AuthClaims(_identity): AuthClaims,
    Query(params): Query<PointerQueryParams>,
) -> Result<(StatusCode, Json<Paginated<PointerResponse>>), ServiceError> {
    let ordering = Ordering::parse(params.ordering.as_deref(), POINTER_ORDERING, "-created_at")?;
    let filter = PointerFilter {
        standard: params.standard,
        search: params.search,
    };
    let page = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .list_pointers(&filter, PageRequest::new(params.page, params.page_size), &ordering)
        .await?;
    Ok((StatusCode::OK, Json(page.map(PointerResponse::from))))
}

#[utoipa::path(
    post,
    path = "/api/v1/pointers",
    request_body = CreatePointerRequest,
    responses(
        (status = 201, description = "Pointer created", body = PointerResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Pointers"
)]
pub async fn create_pointer(
    AuthClaims(identity): AuthClaims,
    Json(payload): Json<CreatePointerRequest>,
) -> Result<(StatusCode, Json<PointerResponse>), ServiceError> {
    let pointer = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .create_pointer(&identity, payload.standard, &payload.title)
        .await?;
    Ok((StatusCode::CREATED, Json(pointer.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/pointers/{pointer_id}",
    params(("pointer_id" = Uuid, Path, description = "Pointer id")),
    responses(
        (status = 200, description = "Pointer", body = PointerResponse),
        (status = 404, description = "Pointer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Pointers"
)]
pub async fn get_pointer(
    AuthClaims(_identity): AuthClaims,
    Path(pointer_id): Path<Uuid>,
) -> Result<(StatusCode, Json<PointerResponse>), ServiceError> {
    let pointer = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .get_pointer(pointer_id)
        .await?;
    Ok((StatusCode::OK, Json(pointer.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/pointers/{pointer_id}",
    params(("pointer_id" = Uuid, Path, description = "Pointer id")),
    request_body = UpdatePointerRequest,
    responses(
        (status = 200, description = "Pointer updated", body = PointerResponse),
        (status = 404, description = "Pointer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Pointers"
)]
pub async fn update_pointer(
    AuthClaims(identity): AuthClaims,
    Path(pointer_id): Path<Uuid>,
    Json(payload): Json<UpdatePointerRequest>,
) -> Result<(StatusCode, Json<PointerResponse>), ServiceError> {
    let pointer = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .update_pointer(
            &identity,
            pointer_id,
            payload.standard,
            payload.title.as_deref(),
        )
        .await?;
    Ok((StatusCode::OK, Json(pointer.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/pointers/{pointer_id}",
    params(("pointer_id" = Uuid, Path, description = "Pointer id")),
    responses(
        (status = 204, description = "Pointer deleted with its elements and attachments"),
        (status = 404, description = "Pointer not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Pointers"
)]
pub async fn delete_pointer(
    AuthClaims(identity): AuthClaims,
    Path(pointer_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    HierarchyService::new(get_database_connection()?, get_file_store()?)
        .delete_pointer(&identity, pointer_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
