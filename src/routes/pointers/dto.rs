use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::pointer;
use crate::utils::pagination::{default_page, default_page_size};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePointerRequest {
    pub standard: Uuid,

    #[schema(example = "Pointer 1.1")]
    pub title: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePointerRequest {
    pub standard: Option<Uuid>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PointerResponse {
    pub id: Uuid,
    pub standard: Uuid,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<pointer::Model> for PointerResponse {
    fn from(pointer: pointer::Model) -> Self {
        PointerResponse {
            id: pointer.id,
            standard: pointer.standard_id,
            title: pointer.title,
            created_at: pointer.created_at,
            updated_at: pointer.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PointerQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub standard: Option<Uuid>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}
