use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::services::attachment_service::AttachmentRecord;
use crate::utils::pagination::{default_page, default_page_size};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAttachmentRequest {
    pub element: Uuid,

    /// May be empty.
    #[serde(default)]
    #[schema(example = "Course syllabus")]
    pub title: String,

    #[serde(default)]
    pub shared_with_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAttachmentRequest {
    pub element: Option<Uuid>,
    pub title: Option<String>,
    /// Replaces the whole share set when present.
    pub shared_with_ids: Option<Vec<Uuid>>,
}

/// Multipart body of the upload endpoint.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttachmentResponse {
    pub id: Uuid,
    pub element: Uuid,
    pub title: String,
    pub has_file: bool,
    pub file_name: Option<String>,
    pub download_url: Option<String>,
    pub uploaded_by: Option<Uuid>,
    pub uploaded_at: Option<NaiveDateTime>,
    pub shared_with: Vec<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AttachmentRecord> for AttachmentResponse {
    fn from(record: AttachmentRecord) -> Self {
        let attachment = record.attachment;
        let has_file = attachment.has_file();
        AttachmentResponse {
            id: attachment.id,
            element: attachment.element_id,
            title: attachment.title,
            has_file,
            file_name: attachment.file_name,
            download_url: has_file
                .then(|| format!("/api/v1/attachments/{}/download", attachment.id)),
            uploaded_by: attachment.uploaded_by,
            uploaded_at: attachment.uploaded_at,
            shared_with: record.shared_with,
            created_at: attachment.created_at,
            updated_at: attachment.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttachmentQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub element: Option<Uuid>,
    /// Matches title.
    pub search: Option<String>,
    /// `created_at` or `title`, prefixed with `-` for descending.
    pub ordering: Option<String>,
}
