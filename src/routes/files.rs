//! Multipart parsing and file download responses shared by the attachment
//! routes.

use axum::{
    body::Body,
    extract::Multipart,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::services::attachment_service::{DownloadedFile, UploadedFile};
use crate::services::error::ServiceError;

/// Fields of an upload form. Unknown parts are skipped.
#[derive(Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub course_file: Option<Uuid>,
}

pub async fn parse_upload_form(mut multipart: Multipart) -> Result<UploadForm, ServiceError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::validation(format!("Invalid multipart payload: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "upload.bin".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServiceError::validation(format!("Failed to read upload: {e}")))?;
                form.file = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "course_file" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ServiceError::validation(format!("Invalid course_file: {e}")))?;
                let id = Uuid::parse_str(raw.trim())
                    .map_err(|_| ServiceError::validation("course_file must be a valid UUID."))?;
                form.course_file = Some(id);
            }
            _ => continue,
        }
    }

    Ok(form)
}

/// Octet-stream response with an attachment disposition.
pub fn download_response(file: DownloadedFile) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        file.file_name.replace(['"', '\\'], "_"),
        urlencoding::encode(&file.file_name)
    );
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(file.bytes),
    )
        .into_response()
}
