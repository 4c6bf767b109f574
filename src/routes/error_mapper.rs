use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::error::{ServiceError, ServiceErrorKind};

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

fn status_code_for(kind: ServiceErrorKind) -> StatusCode {
    match kind {
        ServiceErrorKind::Validation | ServiceErrorKind::Conflict => StatusCode::BAD_REQUEST,
        ServiceErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ServiceErrorKind::Permission => StatusCode::FORBIDDEN,
        ServiceErrorKind::NotFound => StatusCode::NOT_FOUND,
        ServiceErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ServiceErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let body = ErrorBody {
            detail: self.message().to_string(),
            code: kind.code(),
            retryable: kind.is_retryable().then_some(true),
        };
        (status_code_for(kind), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn render(error: ServiceError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn conflict_renders_as_bad_request() {
        let (status, body) =
            render(ServiceError::conflict("Cannot approve a request with status 'Approved'.")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "CONFLICT");
        assert_eq!(body["detail"], "Cannot approve a request with status 'Approved'.");
        assert!(body.get("retryable").is_none());
    }

    #[tokio::test]
    async fn unavailable_is_marked_retryable() {
        let (status, body) = render(ServiceError::unavailable("Database is busy.")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["retryable"], true);
    }

    #[tokio::test]
    async fn permission_and_auth_statuses() {
        assert_eq!(render(ServiceError::permission("no")).await.0, StatusCode::FORBIDDEN);
        assert_eq!(render(ServiceError::unauthorized("no")).await.0, StatusCode::UNAUTHORIZED);
        assert_eq!(render(ServiceError::not_found("no")).await.0, StatusCode::NOT_FOUND);
    }
}
