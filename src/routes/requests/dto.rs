use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{RequestStatus, RoleEnum};
use crate::entities::{attachment, user};
use crate::services::request_service::RequestRecord;
use crate::utils::pagination::{default_page, default_page_size};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequestRequest {
    /// Attachment whose file the caller wants to download.
    pub made_on: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequestRequest {
    pub status: RequestStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: RoleEnum,
}

impl From<user::Model> for RequestUser {
    fn from(user: user::Model) -> Self {
        RequestUser {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

/// Attachment summary embedded in request details. Never carries the file.
#[derive(Debug, Serialize, ToSchema)]
pub struct RequestAttachment {
    pub id: Uuid,
    pub element: Uuid,
    pub title: String,
    pub file_name: Option<String>,
    pub has_file: bool,
}

impl From<attachment::Model> for RequestAttachment {
    fn from(attachment: attachment::Model) -> Self {
        let has_file = attachment.has_file();
        RequestAttachment {
            id: attachment.id,
            element: attachment.element_id,
            title: attachment.title,
            file_name: attachment.file_name,
            has_file,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestResponse {
    pub id: Uuid,
    pub requester: Option<RequestUser>,
    pub receiver: Option<RequestUser>,
    pub made_on: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub made_on_detail: Option<RequestAttachment>,
    pub status: RequestStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<RequestRecord> for RequestResponse {
    fn from(record: RequestRecord) -> Self {
        let request = record.request;
        RequestResponse {
            id: request.id,
            requester: record.requester.map(RequestUser::from),
            receiver: record.receiver.map(RequestUser::from),
            made_on: request.made_on_id,
            made_on_detail: record.made_on.map(RequestAttachment::from),
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RequestQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    pub status: Option<RequestStatus>,
    pub requester: Option<Uuid>,
    pub receiver: Option<Uuid>,
    /// Matches requester or receiver username.
    pub search: Option<String>,
    /// `created_at` or `-created_at`.
    pub ordering: Option<String>,
}
