use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::element;
use crate::utils::pagination::{default_page, default_page_size};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateElementRequest {
    pub pointer: Uuid,

    #[schema(example = "Element 1.1.1")]
    pub title: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateElementRequest {
    pub pointer: Option<Uuid>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ElementResponse {
    pub id: Uuid,
    pub pointer: Uuid,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<element::Model> for ElementResponse {
    fn from(element: element::Model) -> Self {
        ElementResponse {
            id: element.id,
            pointer: element.pointer_id,
            title: element.title,
            created_at: element.created_at,
            updated_at: element.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ElementQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub pointer: Option<Uuid>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}
