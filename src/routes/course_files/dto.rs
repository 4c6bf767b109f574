use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::course_file;
use crate::utils::pagination::{default_page, default_page_size};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseFileRequest {
    pub course: Uuid,

    #[schema(example = "Syllabus")]
    pub title: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCourseFileRequest {
    pub course: Option<Uuid>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseFileResponse {
    pub id: Uuid,
    pub course: Uuid,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<course_file::Model> for CourseFileResponse {
    fn from(file: course_file::Model) -> Self {
        CourseFileResponse {
            id: file.id,
            course: file.course_id,
            title: file.title,
            created_at: file.created_at,
            updated_at: file.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CourseFileQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub course: Option<Uuid>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}
