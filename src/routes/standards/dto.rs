use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::StandardType;
use crate::services::hierarchy_service::StandardRecord;
use crate::utils::pagination::{default_page, default_page_size};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStandardRequest {
    pub academic_year: Uuid,

    #[schema(example = "Standard 1: Mission and Vision")]
    pub title: String,

    #[serde(rename = "type")]
    pub standard_type: StandardType,

    /// Users allowed to manage this standard's attachments.
    #[serde(default)]
    pub assigned_to_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStandardRequest {
    pub academic_year: Option<Uuid>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub standard_type: Option<StandardType>,
    /// Replaces the whole assignee set when present.
    pub assigned_to_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StandardResponse {
    pub id: Uuid,
    pub academic_year: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub standard_type: StandardType,
    pub assigned_to: Vec<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<StandardRecord> for StandardResponse {
    fn from(record: StandardRecord) -> Self {
        let standard = record.standard;
        StandardResponse {
            id: standard.id,
            academic_year: standard.academic_year_id,
            title: standard.title,
            standard_type: standard.r#type,
            assigned_to: record.assigned_to,
            created_at: standard.created_at,
            updated_at: standard.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StandardQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(rename = "type")]
    pub standard_type: Option<StandardType>,
    pub academic_year: Option<Uuid>,
    /// Matches title.
    pub search: Option<String>,
    /// `created_at` or `title`, prefixed with `-` for descending.
    pub ordering: Option<String>,
}
