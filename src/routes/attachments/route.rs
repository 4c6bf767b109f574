use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{delete, get, post},
};
use uuid::Uuid;

use super::dto::{
    AttachmentQueryParams, AttachmentResponse, CreateAttachmentRequest, UpdateAttachmentRequest,
    UploadForm,
};
use crate::config::APP_CONFIG;
use crate::extractor::AuthClaims;
use crate::repositories::AttachmentFilter;
use crate::repositories::attachment_repository::ATTACHMENT_ORDERING;
use crate::routes::files::{download_response, parse_upload_form};
use crate::services::attachment_service::{AttachmentChanges, AttachmentService, NewAttachment};
use crate::services::error::ServiceError;
use crate::static_service::{get_database_connection, get_file_store};
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/v1/attachments",
            get(list_attachments).post(create_attachment),
        )
        .route(
            "/api/v1/attachments/{attachment_id}",
            get(get_attachment)
                .put(update_attachment)
                .delete(delete_attachment),
        )
        .route(
            "/api/v1/attachments/{attachment_id}/upload",
            post(upload_file).layer(DefaultBodyLimit::max(APP_CONFIG.max_upload_bytes)),
        )
        .route(
            "/api/v1/attachments/{attachment_id}/remove",
            delete(remove_file),
        )
        .route(
            "/api/v1/attachments/{attachment_id}/download",
            get(download_file),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/attachments",
    params(AttachmentQueryParams),
    responses((status = 200, description = "Attachments", body = Paginated<AttachmentResponse>)),
    security(("bearer_auth" = [])),
    tag = "Attachments"
)]
pub async fn list_attachments(
    AuthClaims(_identity): AuthClaims,
    Query(params): Query<AttachmentQueryParams>,
) -> Result<(StatusCode, Json<Paginated<AttachmentResponse>>), ServiceError> {
    let ordering = Ordering::parse(params.ordering.as_deref(), ATTACHMENT_ORDERING, "-created_at")?;
    let filter = AttachmentFilter {
        element: params.element,
        search: params.search,
    };
    let page = AttachmentService::new(get_database_connection()?, get_file_store()?)
        .list(&filter, PageRequest::new(params.page, params.page_size), &ordering)
        .await?;
    Ok((StatusCode::OK, Json(page.map(AttachmentResponse::from))))
}

#[utoipa::path(
    post,
    path = "/api/v1/attachments",
    request_body = CreateAttachmentRequest,
    responses(
        (status = 201, description = "Attachment placeholder created", body = AttachmentResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Attachments"
)]
pub async fn create_attachment(
    AuthClaims(identity): AuthClaims,
    Json(payload): Json<CreateAttachmentRequest>,
) -> Result<(StatusCode, Json<AttachmentResponse>), ServiceError> {
    let input = NewAttachment {
        element_id: payload.element,
        title: payload.title,
        shared_with_ids: payload.shared_with_ids,
    };
    let record = AttachmentService::new(get_database_connection()?, get_file_store()?)
        .create(&identity, input)
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/attachments/{attachment_id}",
    params(("attachment_id" = Uuid, Path, description = "Attachment id")),
    responses(
        (status = 200, description = "Attachment", body = AttachmentResponse),
        (status = 404, description = "Attachment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attachments"
)]
pub async fn get_attachment(
    AuthClaims(_identity): AuthClaims,
    Path(attachment_id): Path<Uuid>,
) -> Result<(StatusCode, Json<AttachmentResponse>), ServiceError> {
    let record = AttachmentService::new(get_database_connection()?, get_file_store()?)
        .get(attachment_id)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/attachments/{attachment_id}",
    params(("attachment_id" = Uuid, Path, description = "Attachment id")),
    request_body = UpdateAttachmentRequest,
    responses(
        (status = 200, description = "Attachment updated", body = AttachmentResponse),
        (status = 404, description = "Attachment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attachments"
)]
pub async fn update_attachment(
    AuthClaims(identity): AuthClaims,
    Path(attachment_id): Path<Uuid>,
    Json(payload): Json<UpdateAttachmentRequest>,
) -> Result<(StatusCode, Json<AttachmentResponse>), ServiceError> {
    let changes = AttachmentChanges {
        element_id: payload.element,
        title: payload.title,
        shared_with_ids: payload.shared_with_ids,
    };
    let record = AttachmentService::new(get_database_connection()?, get_file_store()?)
        .update(&identity, attachment_id, changes)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/attachments/{attachment_id}",
    params(("attachment_id" = Uuid, Path, description = "Attachment id")),
    responses(
        (status = 204, description = "Attachment deleted"),
        (status = 404, description = "Attachment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attachments"
)]
pub async fn delete_attachment(
    AuthClaims(identity): AuthClaims,
    Path(attachment_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    AttachmentService::new(get_database_connection()?, get_file_store()?)
        .delete(&identity, attachment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Store a file on an empty attachment placeholder
#[utoipa::path(
    post,
    path = "/api/v1/attachments/{attachment_id}/upload",
    params(("attachment_id" = Uuid, Path, description = "Attachment id")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = AttachmentResponse),
        (status = 400, description = "No file provided, or the attachment already has a file"),
        (status = 403, description = "Caller is not assigned to the standard"),
        (status = 404, description = "Attachment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attachments"
)]
pub async fn upload_file(
    AuthClaims(identity): AuthClaims,
    Path(attachment_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AttachmentResponse>), ServiceError> {
    let form = parse_upload_form(multipart).await?;
    let record = AttachmentService::new(get_database_connection()?, get_file_store()?)
        .upload(&identity, attachment_id, form.file)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

/// Clear the attachment's file, keeping the placeholder
#[utoipa::path(
    delete,
    path = "/api/v1/attachments/{attachment_id}/remove",
    params(("attachment_id" = Uuid, Path, description = "Attachment id")),
    responses(
        (status = 204, description = "File removed"),
        (status = 403, description = "Caller is not assigned to the standard"),
        (status = 404, description = "Attachment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attachments"
)]
pub async fn remove_file(
    AuthClaims(identity): AuthClaims,
    Path(attachment_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    AttachmentService::new(get_database_connection()?, get_file_store()?)
        .remove(&identity, attachment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/attachments/{attachment_id}/download",
    params(("attachment_id" = Uuid, Path, description = "Attachment id")),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 403, description = "Caller may not download this file"),
        (status = 404, description = "No file attached, or the file is missing on the server")
    ),
    security(("bearer_auth" = [])),
    tag = "Attachments"
)]
pub async fn download_file(
    AuthClaims(identity): AuthClaims,
    Path(attachment_id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let file = AttachmentService::new(get_database_connection()?, get_file_store()?)
        .download(&identity, attachment_id)
        .await?;
    Ok(download_response(file))
}
