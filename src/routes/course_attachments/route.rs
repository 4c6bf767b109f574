use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
};
use uuid::Uuid;

use super::dto::{CourseAttachmentForm, CourseAttachmentQueryParams, CourseAttachmentResponse};
use crate::config::APP_CONFIG;
use crate::extractor::AuthClaims;
use crate::repositories::CourseAttachmentFilter;
use crate::repositories::course_attachment_repository::COURSE_ATTACHMENT_ORDERING;
use crate::routes::files::{download_response, parse_upload_form};
use crate::services::course_attachment_service::CourseAttachmentService;
use crate::services::error::ServiceError;
use crate::static_service::{get_database_connection, get_file_store};
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/v1/course-attachments",
            get(list_course_attachments).post(create_course_attachment).layer(
                DefaultBodyLimit::max(APP_CONFIG.max_upload_bytes),
            ),
        )
        .route(
            "/api/v1/course-attachments/{course_attachment_id}",
            get(get_course_attachment).delete(delete_course_attachment),
        )
        .route(
            "/api/v1/course-attachments/{course_attachment_id}/download",
            get(download_course_attachment),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/course-attachments",
    params(CourseAttachmentQueryParams),
    responses((status = 200, description = "Course attachments", body = Paginated<CourseAttachmentResponse>)),
    security(("bearer_auth" = [])),
    tag = "Course Attachments"
)]
pub async fn list_course_attachments(
    AuthClaims(_identity): AuthClaims,
    Query(params): Query<CourseAttachmentQueryParams>,
) -> Result<(StatusCode, Json<Paginated<CourseAttachmentResponse>>), ServiceError> {
    let ordering = Ordering::parse(
        params.ordering.as_deref(),
        COURSE_ATTACHMENT_ORDERING,
        "-created_at",
    )?;
    let filter = CourseAttachmentFilter {
        course_file: params.course_file,
    };
    let page = CourseAttachmentService::new(get_database_connection()?, get_file_store()?)
        .list(&filter, PageRequest::new(params.page, params.page_size), &ordering)
        .await?;
    Ok((StatusCode::OK, Json(page.map(CourseAttachmentResponse::from))))
}

/// Upload a file to a course file. Professor of the course or admin
#[utoipa::path(
    post,
    path = "/api/v1/course-attachments",
    request_body(content = CourseAttachmentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Course attachment stored", body = CourseAttachmentResponse),
        (status = 400, description = "Missing course_file or file"),
        (status = 403, description = "Not the course professor")
    ),
    security(("bearer_auth" = [])),
    tag = "Course Attachments"
)]
pub async fn create_course_attachment(
    AuthClaims(identity): AuthClaims,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CourseAttachmentResponse>), ServiceError> {
    let form = parse_upload_form(multipart).await?;
    let attachment = CourseAttachmentService::new(get_database_connection()?, get_file_store()?)
        .create(&identity, form.course_file, form.file)
        .await?;
    Ok((StatusCode::CREATED, Json(attachment.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/course-attachments/{course_attachment_id}",
    params(("course_attachment_id" = Uuid, Path, description = "Course attachment id")),
    responses(
        (status = 200, description = "Course attachment", body = CourseAttachmentResponse),
        (status = 404, description = "Course attachment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Course Attachments"
)]
pub async fn get_course_attachment(
    AuthClaims(_identity): AuthClaims,
    Path(course_attachment_id): Path<Uuid>,
) -> Result<(StatusCode, Json<CourseAttachmentResponse>), ServiceError> {
    let attachment = CourseAttachmentService::new(get_database_connection()?, get_file_store()?)
        .get(course_attachment_id)
        .await?;
    Ok((StatusCode::OK, Json(attachment.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/course-attachments/{course_attachment_id}",
    params(("course_attachment_id" = Uuid, Path, description = "Course attachment id")),
    responses(
        (status = 204, description = "Course attachment deleted"),
        (status = 403, description = "Not the course professor"),
        (status = 404, description = "Course attachment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Course Attachments"
)]
pub async fn delete_course_attachment(
    AuthClaims(identity): AuthClaims,
    Path(course_attachment_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    CourseAttachmentService::new(get_database_connection()?, get_file_store()?)
        .delete(&identity, course_attachment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/course-attachments/{course_attachment_id}/download",
    params(("course_attachment_id" = Uuid, Path, description = "Course attachment id")),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 403, description = "Not the course professor"),
        (status = 404, description = "File missing on the server")
    ),
    security(("bearer_auth" = [])),
    tag = "Course Attachments"
)]
pub async fn download_course_attachment(
    AuthClaims(identity): AuthClaims,
    Path(course_attachment_id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let file = CourseAttachmentService::new(get_database_connection()?, get_file_store()?)
        .download(&identity, course_attachment_id)
        .await?;
    Ok(download_response(file))
}
