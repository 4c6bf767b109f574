use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use super::dto::{
    CreateStandardRequest, StandardQueryParams, StandardResponse, UpdateStandardRequest,
};
use crate::extractor::AuthClaims;
use crate::repositories::StandardFilter;
use crate::repositories::standard_repository::STANDARD_ORDERING;
use crate::services::error::ServiceError;
use crate::services::hierarchy_service::{HierarchyService, NewStandard, StandardChanges};
use crate::static_service::{get_database_connection, get_file_store};
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/v1/standards",
            get(list_standards).post(create_standard),
        )
        .route(
            "/api/v1/standards/{standard_id}",
            get(get_standard).put(update_standard).delete(delete_standard),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/standards",
    params(StandardQueryParams),
    responses((status = 200, description = "Standards", body = Paginated<StandardResponse>)),
    security(("bearer_auth" = [])),
    tag = "Standards"
)]
pub async fn list_standards(
    AuthClaims(_identity): AuthClaims,
    Query(params): Query<StandardQueryParams>,
) -> Result<(StatusCode, Json<Paginated<StandardResponse>>), ServiceError> {
    let ordering = Ordering::parse(params.ordering.as_deref(), STANDARD_ORDERING, "-created_at")?;
    let filter = StandardFilter {
        standard_type: params.standard_type,
        academic_year: params.academic_year,
        search: params.search,
    };
    let page = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .list_standards(&filter, PageRequest::new(params.page, params.page_size), &ordering)
        .await?;
    Ok((StatusCode::OK, Json(page.map(StandardResponse::from))))
}

#[utoipa::path(
    post,
    path = "/api/v1/standards",
    request_body = CreateStandardRequest,
    responses(
        (status = 201, description = "Standard created", body = StandardResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Standards"
)]
pub async fn create_standard(
    AuthClaims(identity): AuthClaims,
    Json(payload): Json<CreateStandardRequest>,
) -> Result<(StatusCode, Json<StandardResponse>), ServiceError> {
    let input = NewStandard {
        academic_year_id: payload.academic_year,
        title: payload.title,
        standard_type: payload.standard_type,
        assigned_to_ids: payload.assigned_to_ids,
    };
    let record = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .create_standard(&identity, input)
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/standards/{standard_id}",
    params(("standard_id" = Uuid, Path, description = "Standard id")),
    responses(
        (status = 200, description = "Standard", body = StandardResponse),
        (status = 404, description = "Standard not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Standards"
)]
pub async fn get_standard(
    AuthClaims(_identity): AuthClaims,
    Path(standard_id): Path<Uuid>,
) -> Result<(StatusCode, Json<StandardResponse>), ServiceError> {
    let record = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .get_standard(standard_id)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/standards/{standard_id}",
    params(("standard_id" = Uuid, Path, description = "Standard id")),
    request_body = UpdateStandardRequest,
    responses(
        (status = 200, description = "Standard updated", body = StandardResponse),
        (status = 404, description = "Standard not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Standards"
)]
pub async fn update_standard(
    AuthClaims(identity): AuthClaims,
    Path(standard_id): Path<Uuid>,
    Json(payload): Json<UpdateStandardRequest>,
) -> Result<(StatusCode, Json<StandardResponse>), ServiceError> {
    let changes = StandardChanges {
        academic_year_id: payload.academic_year,
        title: payload.title,
        standard_type: payload.standard_type,
        assigned_to_ids: payload.assigned_to_ids,
    };
    let record = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .update_standard(&identity, standard_id, changes)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/standards/{standard_id}",
    params(("standard_id" = Uuid, Path, description = "Standard id")),
    responses(
        (status = 204, description = "Standard deleted with its pointers, elements and attachments"),
        (status = 404, description = "Standard not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Standards"
)]
pub async fn delete_standard(
    AuthClaims(identity): AuthClaims,
    Path(standard_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    HierarchyService::new(get_database_connection()?, get_file_store()?)
        .delete_standard(&identity, standard_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
