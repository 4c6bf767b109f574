use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::academic_year;
use crate::entities::sea_orm_active_enums::AcademicYearStatus;
use crate::services::replication_service::CopiedCounts;
use crate::utils::pagination::{default_page, default_page_size};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AcademicYearRequest {
    #[serde(default = "default_status")]
    pub status: AcademicYearStatus,

    #[schema(example = "2025-09-01")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-06-30")]
    pub end_date: NaiveDate,
}

fn default_status() -> AcademicYearStatus {
    AcademicYearStatus::Active
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAcademicYearRequest {
    pub status: Option<AcademicYearStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AcademicYearResponse {
    pub id: Uuid,
    pub status: AcademicYearStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<academic_year::Model> for AcademicYearResponse {
    fn from(year: academic_year::Model) -> Self {
        AcademicYearResponse {
            id: year.id,
            status: year.status,
            start_date: year.start_date,
            end_date: year.end_date,
            created_at: year.created_at,
            updated_at: year.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NewYearResponse {
    pub detail: String,
    pub academic_year: AcademicYearResponse,
    pub copied_count: CopiedCounts,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AcademicYearQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub status: Option<AcademicYearStatus>,
    /// `start_date`, `end_date` or `created_at`, prefixed with `-` for descending.
    pub ordering: Option<String>,
}
