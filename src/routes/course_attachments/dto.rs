use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::course_attachment;
use crate::utils::pagination::{default_page, default_page_size};

/// Multipart body of the create endpoint.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct CourseAttachmentForm {
    pub course_file: Uuid,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseAttachmentResponse {
    pub id: Uuid,
    pub course_file: Uuid,
    pub file_name: String,
    pub download_url: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<course_attachment::Model> for CourseAttachmentResponse {
    fn from(attachment: course_attachment::Model) -> Self {
        CourseAttachmentResponse {
            id: attachment.id,
            course_file: attachment.course_file_id,
            file_name: attachment.file_name,
            download_url: format!("/api/v1/course-attachments/{}/download", attachment.id),
            created_at: attachment.created_at,
            updated_at: attachment.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CourseAttachmentQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub course_file: Option<Uuid>,
    /// `created_at` or `-created_at`.
    pub ordering: Option<String>,
}
