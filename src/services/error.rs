use std::fmt;

use sea_orm::{DbErr, SqlErr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    Validation,
    Permission,
    NotFound,
    Conflict,
    Unauthorized,
    Unavailable,
    Internal,
}

impl ServiceErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceErrorKind::Validation => "VALIDATION_ERROR",
            ServiceErrorKind::Permission => "PERMISSION_DENIED",
            ServiceErrorKind::NotFound => "NOT_FOUND",
            ServiceErrorKind::Conflict => "CONFLICT",
            ServiceErrorKind::Unauthorized => "UNAUTHORIZED",
            ServiceErrorKind::Unavailable => "SERVICE_UNAVAILABLE",
            ServiceErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Only transient store failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceErrorKind::Unavailable)
    }
}

#[derive(Debug, Clone)]
pub struct ServiceError {
    kind: ServiceErrorKind,
    message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Validation, message)
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Permission, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Conflict, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Unauthorized, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Unavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Internal, message)
    }

    pub fn kind(&self) -> ServiceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.message)
    }
}

impl std::error::Error for ServiceError {}

pub fn map_db_error(error: DbErr) -> ServiceError {
    if let Some(sql_error) = error.sql_err() {
        match sql_error {
            SqlErr::UniqueConstraintViolation(message) => {
                tracing::debug!(%message, "Unique constraint violated");
                return ServiceError::conflict("A record with these values already exists.");
            }
            SqlErr::ForeignKeyConstraintViolation(message) => {
                tracing::debug!(%message, "Foreign key constraint violated");
                return ServiceError::conflict("The record is still referenced by other records.");
            }
            _ => {}
        }
    }

    match error {
        DbErr::RecordNotFound(message) => ServiceError::not_found(message),
        DbErr::RecordNotUpdated => ServiceError::not_found("Record no longer exists."),
        DbErr::ConnectionAcquire(e) => {
            tracing::error!(error = %e, "Database connection acquire failed");
            ServiceError::unavailable("Database is temporarily unavailable.")
        }
        DbErr::Conn(e) => {
            tracing::error!(error = %e, "Database connection failed");
            ServiceError::unavailable("Database is temporarily unavailable.")
        }
        DbErr::Json(message) | DbErr::Type(message) => ServiceError::validation(message),
        other => {
            let message = other.to_string();
            let lowered = message.to_ascii_lowercase();

            if lowered.contains("database is locked")
                || lowered.contains("deadlock")
                || lowered.contains("lock timeout")
                || lowered.contains("could not serialize")
                || lowered.contains("timed out")
            {
                tracing::warn!(error = %message, "Transient database failure");
                ServiceError::unavailable("Database is busy, please retry.")
            } else if lowered.contains("not null constraint failed")
                || lowered.contains("violates not-null constraint")
                || lowered.contains("check constraint")
            {
                ServiceError::validation(message)
            } else {
                tracing::error!(error = %message, "Database error");
                ServiceError::internal("Internal server error.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err = map_db_error(DbErr::RecordNotFound("Attachment not found.".into()));
        assert_eq!(err.kind(), ServiceErrorKind::NotFound);
        assert_eq!(err.message(), "Attachment not found.");
    }

    #[test]
    fn lock_contention_is_retryable() {
        let err = map_db_error(DbErr::Custom("database is locked".into()));
        assert_eq!(err.kind(), ServiceErrorKind::Unavailable);
        assert!(err.kind().is_retryable());
    }

    #[test]
    fn unknown_errors_hide_details() {
        let err = map_db_error(DbErr::Custom("relation \"x\" does not exist".into()));
        assert_eq!(err.kind(), ServiceErrorKind::Internal);
        assert_eq!(err.message(), "Internal server error.");
        assert!(!err.kind().is_retryable());
    }
}
