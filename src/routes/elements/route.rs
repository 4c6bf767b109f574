use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use super::dto::{CreateElementRequest, ElementQueryParams, ElementResponse, UpdateElementRequest};
use crate::extractor::AuthClaims;
use crate::repositories::ElementFilter;
use crate::repositories::element_repository::ELEMENT_ORDERING;
use crate::services::error::ServiceError;
use crate::services::hierarchy_service::HierarchyService;
use crate::static_service::{get_database_connection, get_file_store};
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/elements", get(list_elements).post(create_element))
        .route(
            "/api/v1/elements/{element_id}",
            get(get_element).put(update_element).delete(delete_element),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/elements",
    params(ElementQueryParams),
    responses((status = 200, description = "Elements", body = Paginated<ElementResponse>)),
    security(("bearer_auth" = [])),
    tag = "Elements"
)]
pub async fn list_elements(
    AuthClaims(_identity): AuthClaims,
    Query(params): Query<ElementQueryParams>,
) -> Result<(StatusCode, Json<Paginated<ElementResponse>>), ServiceError> {
    let ordering = Ordering::parse(params.ordering.as_deref(), ELEMENT_ORDERING, "-created_at")?;
    let filter = ElementFilter {
        pointer: params.pointer,
        search: params.search,
    };
    let page = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .list_elements(&filter, PageRequest::new(params.page, params.page_size), &ordering)
        .await?;
    Ok((StatusCode::OK, Json(page.map(ElementResponse::from))))
}

#[utoipa::path(
    post,
    path = "/api/v1/elements",
    request_body = CreateElementRequest,
    responses(
        (status = 201, description = "Element created", body = ElementResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Elements"
)]
pub async fn create_element(
    AuthClaims(identity): AuthClaims,
    Json(payload): Json<CreateElementRequest>,
) -> Result<(StatusCode, Json<ElementResponse>), ServiceError> {
    let element = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .create_element(&identity, payload.pointer, &payload.title)
        .await?;
    Ok((StatusCode::CREATED, Json(element.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/elements/{element_id}",
    params(("element_id" = Uuid, Path, description = "Element id")),
    responses(
        (status = 200, description = "Element", body = ElementResponse),
        (status = 404, description = "Element not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Elements"
)]
pub async fn get_element(
    AuthClaims(_identity): AuthClaims,
    Path(element_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ElementResponse>), ServiceError> {
    let element = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .get_element(element_id)
        .await?;
    Ok((StatusCode::OK, Json(element.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/elements/{element_id}",
    params(("element_id" = Uuid, Path, description = "Element id")),
    request_body = UpdateElementRequest,
    responses(
        (status = 200, description = "Element updated", body = ElementResponse),
        (status = 404, description = "Element not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Elements"
)]
pub async fn update_element(
    AuthClaims(identity): AuthClaims,
    Path(element_id): Path<Uuid>,
    Json(payload): Json<UpdateElementRequest>,
) -> Result<(StatusCode, Json<ElementResponse>), ServiceError> {
    let element = HierarchyService::new(get_database_connection()?, get_file_store()?)
        .update_element(
            &identity,
            element_id,
            payload.pointer,
            payload.title.as_deref(),
        )
        .await?;
    Ok((StatusCode::OK, Json(element.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/elements/{element_id}",
    params(("element_id" = Uuid, Path, description = "Element id")),
    responses(
        (status = 204, description = "Element deleted with its attachments"),
        (status = 404, description = "Element not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Elements"
)]
pub async fn delete_element(
    AuthClaims(identity): AuthClaims,
    Path(element_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    HierarchyService::new(get_database_connection()?, get_file_store()?)
        .delete_element(&identity, element_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
