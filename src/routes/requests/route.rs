use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    CreateRequestRequest, RequestQueryParams, RequestResponse, UpdateRequestRequest,
};
use crate::extractor::AuthClaims;
use crate::repositories::RequestFilter;
use crate::repositories::request_repository::REQUEST_ORDERING;
use crate::services::error::ServiceError;
use crate::services::request_service::RequestService;
use crate::static_service::get_database_connection;
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/requests", get(list_requests).post(create_request))
        .route(
            "/api/v1/requests/{request_id}",
            get(get_request).put(update_request).delete(delete_request),
        )
        .route("/api/v1/requests/{request_id}/approve", post(approve_request))
        .route("/api/v1/requests/{request_id}/reject", post(reject_request))
        .route("/api/v1/requests/{request_id}/cancel", post(cancel_request))
}

/// Admins see every request, everyone else only requests they made or received
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    params(RequestQueryParams),
    responses((status = 200, description = "Requests", body = Paginated<RequestResponse>)),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn list_requests(
    AuthClaims(identity): AuthClaims,
    Query(params): Query<RequestQueryParams>,
) -> Result<(StatusCode, Json<Paginated<RequestResponse>>), ServiceError> {
    let ordering = Ordering::parse(params.ordering.as_deref(), REQUEST_ORDERING, "-created_at")?;
    let filter = RequestFilter {
        status: params.status,
        requester: params.requester,
        receiver: params.receiver,
        search: params.search,
        involving: None,
    };
    let page = RequestService::new(get_database_connection()?)
        .list(
            &identity,
            filter,
            PageRequest::new(params.page, params.page_size),
            &ordering,
        )
        .await?;
    Ok((StatusCode::OK, Json(page.map(RequestResponse::from))))
}

/// Ask the uploader of an attachment for download access
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body = CreateRequestRequest,
    responses(
        (status = 201, description = "Request created", body = RequestResponse),
        (status = 400, description = "Attachment missing, empty or without uploader")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn create_request(
    AuthClaims(identity): AuthClaims,
    Json(payload): Json<CreateRequestRequest>,
) -> Result<(StatusCode, Json<RequestResponse>), ServiceError> {
    let record = RequestService::new(get_database_connection()?)
        .create(&identity, payload.made_on)
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/{request_id}",
    params(("request_id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request with the attachment it targets", body = RequestResponse),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn get_request(
    AuthClaims(identity): AuthClaims,
    Path(request_id): Path<Uuid>,
) -> Result<(StatusCode, Json<RequestResponse>), ServiceError> {
    let record = RequestService::new(get_database_connection()?)
        .get(&identity, request_id)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/requests/{request_id}",
    params(("request_id" = Uuid, Path, description = "Request id")),
    request_body = UpdateRequestRequest,
    responses(
        (status = 200, description = "Status changed", body = RequestResponse),
        (status = 400, description = "Request is no longer pending"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn update_request(
    AuthClaims(identity): AuthClaims,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<UpdateRequestRequest>,
) -> Result<(StatusCode, Json<RequestResponse>), ServiceError> {
    let record = RequestService::new(get_database_connection()?)
        .set_status(&identity, request_id, payload.status)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/requests/{request_id}",
    params(("request_id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn delete_request(
    AuthClaims(identity): AuthClaims,
    Path(request_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    RequestService::new(get_database_connection()?)
        .delete(&identity, request_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Receiver or admin grants the requester download access
#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/approve",
    params(("request_id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request approved", body = RequestResponse),
        (status = 400, description = "Request is no longer pending"),
        (status = 403, description = "Only the receiver or an admin can approve")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn approve_request(
    AuthClaims(identity): AuthClaims,
    Path(request_id): Path<Uuid>,
) -> Result<(StatusCode, Json<RequestResponse>), ServiceError> {
    let record = RequestService::new(get_database_connection()?)
        .approve(&identity, request_id)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/reject",
    params(("request_id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request rejected", body = RequestResponse),
        (status = 400, description = "Request is no longer pending"),
        (status = 403, description = "Only the receiver or an admin can reject")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn reject_request(
    AuthClaims(identity): AuthClaims,
    Path(request_id): Path<Uuid>,
) -> Result<(StatusCode, Json<RequestResponse>), ServiceError> {
    let record = RequestService::new(get_database_connection()?)
        .reject(&identity, request_id)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/cancel",
    params(("request_id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request canceled", body = RequestResponse),
        (status = 400, description = "Request is no longer pending"),
        (status = 403, description = "Only the requester or an admin can cancel")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn cancel_request(
    AuthClaims(identity): AuthClaims,
    Path(request_id): Path<Uuid>,
) -> Result<(StatusCode, Json<RequestResponse>), ServiceError> {
    let record = RequestService::new(get_database_connection()?)
        .cancel(&identity, request_id)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}
