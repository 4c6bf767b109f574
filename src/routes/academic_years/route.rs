use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{
    AcademicYearQueryParams, AcademicYearRequest, AcademicYearResponse, NewYearResponse,
    UpdateAcademicYearRequest,
};
use crate::extractor::AuthClaims;
use crate::repositories::AcademicYearFilter;
use crate::repositories::academic_year_repository::{ACADEMIC_YEAR_ORDERING, AcademicYearUpdate};
use crate::services::academic_year_service::AcademicYearService;
use crate::services::error::ServiceError;
use crate::services::replication_service::{NewYear, ReplicationService};
use crate::services::structure_service::{StructureService, YearStructure};
use crate::static_service::{get_database_connection, get_file_store};
use crate::utils::pagination::{Ordering, PageRequest, Paginated};

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/v1/academic-years",
            get(list_academic_years).post(create_academic_year),
        )
        .route(
            "/api/v1/academic-years/create_new_year",
            post(create_new_year),
        )
        .route(
            "/api/v1/academic-years/{academic_year_id}",
            get(get_academic_year)
                .put(update_academic_year)
                .delete(delete_academic_year),
        )
        .route(
            "/api/v1/academic-years/{academic_year_id}/structure",
            get(academic_year_structure),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/academic-years",
    params(AcademicYearQueryParams),
    responses((status = 200, description = "Academic years", body = Paginated<AcademicYearResponse>)),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
pub async fn list_academic_years(
    AuthClaims(_identity): AuthClaims,
    Query(params): Query<AcademicYearQueryParams>,
) -> Result<(StatusCode, Json<Paginated<AcademicYearResponse>>), ServiceError> {
    let ordering = Ordering::parse(
        params.ordering.as_deref(),
        ACADEMIC_YEAR_ORDERING,
        "-start_date",
    )?;
    let filter = AcademicYearFilter {
        status: params.status,
    };
    let page = AcademicYearService::new(get_database_connection()?, get_file_store()?)
        .list(&filter, PageRequest::new(params.page, params.page_size), &ordering)
        .await?;
    Ok((StatusCode::OK, Json(page.map(AcademicYearResponse::from))))
}

#[utoipa::path(
    post,
    path = "/api/v1/academic-years",
    request_body = AcademicYearRequest,
    responses(
        (status = 201, description = "Academic year created", body = AcademicYearResponse),
        (status = 400, description = "End date must be after start date"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
pub async fn create_academic_year(
    AuthClaims(identity): AuthClaims,
    Json(payload): Json<AcademicYearRequest>,
) -> Result<(StatusCode, Json<AcademicYearResponse>), ServiceError> {
    let year = AcademicYearService::new(get_database_connection()?, get_file_store()?)
        .create(&identity, payload.status, payload.start_date, payload.end_date)
        .await?;
    Ok((StatusCode::CREATED, Json(year.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/academic-years/{academic_year_id}",
    params(("academic_year_id" = Uuid, Path, description = "Academic year id")),
    responses(
        (status = 200, description = "Academic year", body = AcademicYearResponse),
        (status = 404, description = "Academic year not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
pub async fn get_academic_year(
    AuthClaims(_identity): AuthClaims,
    Path(academic_year_id): Path<Uuid>,
) -> Result<(StatusCode, Json<AcademicYearResponse>), ServiceError> {
    let year = AcademicYearService::new(get_database_connection()?, get_file_store()?)
        .get(academic_year_id)
        .await?;
    Ok((StatusCode::OK, Json(year.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/academic-years/{academic_year_id}",
    params(("academic_year_id" = Uuid, Path, description = "Academic year id")),
    request_body = UpdateAcademicYearRequest,
    responses(
        (status = 200, description = "Academic year updated", body = AcademicYearResponse),
        (status = 404, description = "Academic year not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
pub async fn update_academic_year(
    AuthClaims(identity): AuthClaims,
    Path(academic_year_id): Path<Uuid>,
    Json(payload): Json<UpdateAcademicYearRequest>,
) -> Result<(StatusCode, Json<AcademicYearResponse>), ServiceError> {
    let update = AcademicYearUpdate {
        status: payload.status,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };
    let year = AcademicYearService::new(get_database_connection()?, get_file_store()?)
        .update(&identity, academic_year_id, update)
        .await?;
    Ok((StatusCode::OK, Json(year.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/academic-years/{academic_year_id}",
    params(("academic_year_id" = Uuid, Path, description = "Academic year id")),
    responses(
        (status = 204, description = "Academic year and everything it owns deleted"),
        (status = 404, description = "Academic year not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
pub async fn delete_academic_year(
    AuthClaims(identity): AuthClaims,
    Path(academic_year_id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    AcademicYearService::new(get_database_connection()?, get_file_store()?)
        .delete(&identity, academic_year_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Nested standards and courses of one year, without file contents
#[utoipa::path(
    get,
    path = "/api/v1/academic-years/{academic_year_id}/structure",
    params(("academic_year_id" = Uuid, Path, description = "Academic year id")),
    responses(
        (status = 200, description = "Year structure", body = YearStructure),
        (status = 404, description = "Academic year not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
pub async fn academic_year_structure(
    AuthClaims(_identity): AuthClaims,
    Path(academic_year_id): Path<Uuid>,
) -> Result<(StatusCode, Json<YearStructure>), ServiceError> {
    let structure = StructureService::new(get_database_connection()?)
        .structure(academic_year_id)
        .await?;
    Ok((StatusCode::OK, Json(structure)))
}

/// Create a year and copy the latest year's standards and courses into it
#[utoipa::path(
    post,
    path = "/api/v1/academic-years/create_new_year",
    request_body = AcademicYearRequest,
    responses(
        (status = 201, description = "Year created with copied structure", body = NewYearResponse),
        (status = 400, description = "Invalid dates"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No existing academic year to copy from")
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
pub async fn create_new_year(
    AuthClaims(identity): AuthClaims,
    Json(payload): Json<AcademicYearRequest>,
) -> Result<(StatusCode, Json<NewYearResponse>), ServiceError> {
    let outcome = ReplicationService::new(get_database_connection()?)
        .create_new_year(
            &identity,
            NewYear {
                start_date: payload.start_date,
                end_date: payload.end_date,
                status: payload.status,
            },
        )
        .await?;

    let detail = format!(
        "Successfully created new academic year {} with structure copied from {}.",
        outcome.academic_year.label(),
        outcome.source.label()
    );
    Ok((
        StatusCode::CREATED,
        Json(NewYearResponse {
            detail,
            academic_year: outcome.academic_year.into(),
            copied_count: outcome.copied,
        }),
    ))
}
