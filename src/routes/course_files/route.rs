use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use super::dto::{
    CourseFileQueryParams, CourseFileResponse, CreateCourseFileRequest, UpdateCourseFileRequest,
};
use crate::extractor::AuthClaims;
use crate::repositories::CourseFileFilter;
use crate::repositories::course_file_repository::COURSE_FILE_ORDERING;
use crate::services::course_service::CourseService;
use crate::services::error::ServiceError;
use crate::static_service::{get_database_connection, get_file_store};
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/v1/course-files",
            get(list_course_files).post(create_course_file),
        )
        .route(
            "/api/v1/course-files/{course_file_id}",
            get(get_course_file)
                .put(update_course_file)
                .delete(delete_course_file),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/course-files",
    params(CourseFileQueryParams),
    responses((status = 200, description = "Course files", body = Paginated<CourseFileResponse>)),
    security(("bearer_auth" = [])),
    tag = "Course Files"
)]
pub async fn list_course_files(
    AuthClaims(_identity): AuthClaims,
    Query(params): Query<CourseFileQueryParams>,
) -> Result<(StatusCode, Json<Paginated<CourseFileResponse>>), ServiceError> {
    let ordering =
        Ordering::parse(params.ordering.as_deref(), COURSE_FILE_ORDERING, "-created_at")?;
    let filter = CourseFileFilter {
        course: params.course,
        search: params.search,
    };
    let page = CourseService::new(get_database_connection()?, get_file_store()?)
        .list_course_files(&filter, PageRequest::new(params.page, params.page_size), &ordering)
        .await?;
    Ok((StatusCode::OK, Json(page.map(CourseFileResponse::from))))
}

#[utoipa::path(
    post,
    path = "/api/v1/course-files",
    request_body = CreateCourseFileRequest,
    responses(
        (status = 201, description = "Course file created", body = CourseFileResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Course Files"
)]
pub async fn create_course_file(
    AuthClaims(identity): AuthClaims,
    Json(payload): Json<CreateCourseFileRequest>,
) -> Result<(StatusCode, Json<CourseFileResponse>), ServiceError> {
    let file = CourseService::new(get_database_connection()?, get_file_store()?)
        .create_course_file(&identity, payload.course, &payload.title)
        .await?;
    Ok((StatusCode::CREATED, Json(file.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/course-files/{course_file_id}",
    params(("course_file_id" = Uuid, Path, description = "Course file id")),
    responses(
        (status = 200, description = "Course file", body = CourseFileResponse),
        (status = 404, description = "Course file not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Course Files"
)]
pub async fn get_course_file(
    AuthClaims(_identity): AuthClaims,
    Path(course_file_id): Path<Uuid>,
) -> Result<(StatusCode, Json<CourseFileResponse>), ServiceError> {
    let file = CourseService::new(get_database_connection()?, get_file_store()?)
        .get_course_file(course_file_id)
        .await?;
    Ok((StatusCode::OK, Json(file.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/course-files/{course_file_id}",
    params(("course_file_id" = Uuid, Path, description = "Course file id")),
    request_body = UpdateCourseFileRequest,
    responses(
        (status = 200, description = "Course file updated", body = CourseFileResponse),
        (status = 404, description = "Course file not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Course Files"
)]
pub async fn update_course_file(
    AuthClaims(identity): AuthClaims,
    Path(course_file_id): Path<Uuid>,
    Json(payload): Json<UpdateCourseFileRequest>,
) -> Result<(StatusCode, Json<CourseFileResponse>), ServiceError> {
    let file = CourseService::new(get_database_connection()?, get_file_store()?)
        .update_course_file(
            &identity,
            course_file_id,
            payload.course,
            payload.title.as_deref(),
        )
        .await?;
    Ok((StatusCode::OK, Json(file.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/course-files/{course_file_id}",
    params(("course_file_id" = Uuid, Path, description = "Course file id")),
    responses(
        (status = 204, description = "Course file deleted with its attachments"),
        (status = 404, description = "Course file not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Course Files"
)]
pub async fn delete_course_file(
    AuthClaims(identity): AuthClaims,
    Path(course_file_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    CourseService::new(get_database_connection()?, get_file_store()?)
        .delete_course_file(&identity, course_file_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
