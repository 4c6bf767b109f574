use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use super::dto::{CourseQueryParams, CourseResponse, CreateCourseRequest, UpdateCourseRequest};
use crate::extractor::AuthClaims;
use crate::repositories::CourseFilter;
use crate::repositories::course_repository::COURSE_ORDERING;
use crate::services::course_service::CourseService;
use crate::services::error::ServiceError;
use crate::static_service::{get_database_connection, get_file_store};
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/courses", get(list_courses).post(create_course))
        .route(
            "/api/v1/courses/{course_id}",
            get(get_course).put(update_course).delete(delete_course),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(CourseQueryParams),
    responses((status = 200, description = "Courses", body = Paginated<CourseResponse>)),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn list_courses(
    AuthClaims(_identity): AuthClaims,
    Query(params): Query<CourseQueryParams>,
) -> Result<(StatusCode, Json<Paginated<CourseResponse>>), ServiceError> {
    let ordering = Ordering::parse(params.ordering.as_deref(), COURSE_ORDERING, "-created_at")?;
    let filter = CourseFilter {
        academic_year: params.academic_year,
        level: params.level,
        semester: params.semester,
        department: params.department,
        search: params.search,
    };
    let page = CourseService::new(get_database_connection()?, get_file_store()?)
        .list_courses(&filter, PageRequest::new(params.page, params.page_size), &ordering)
        .await?;
    Ok((StatusCode::OK, Json(page.map(CourseResponse::from))))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn create_course(
    AuthClaims(identity): AuthClaims,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ServiceError> {
    let course = CourseService::new(get_database_connection()?, get_file_store()?)
        .create_course(&identity, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = CourseResponse),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn get_course(
    AuthClaims(_identity): AuthClaims,
    Path(course_id): Path<Uuid>,
) -> Result<(StatusCode, Json<CourseResponse>), ServiceError> {
    let course = CourseService::new(get_database_connection()?, get_file_store()?)
        .get_course(course_id)
        .await?;
    Ok((StatusCode::OK, Json(course.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course id")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    AuthClaims(identity): AuthClaims,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ServiceError> {
    let course = CourseService::new(get_database_connection()?, get_file_store()?)
        .update_course(&identity, course_id, payload.into())
        .await?;
    Ok((StatusCode::OK, Json(course.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 204, description = "Course deleted with its files and attachments"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn delete_course(
    AuthClaims(identity): AuthClaims,
    Path(course_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    CourseService::new(get_database_connection()?, get_file_store()?)
        .delete_course(&identity, course_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
