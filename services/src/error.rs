use sea_orm::{DbErr, SqlErr};
use util::media::UploadError;
use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("{0}")]
    Database(DbErr),
}

impl ServiceError {
    /// Bad request carrying the first violation, walking `field_order`.
    pub fn invalid(errors: &ValidationErrors, field_order: &[&str]) -> Self {
        Self::BadRequest(common::first_validation_error(errors, field_order))
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
            return Self::BadRequest("Duplicate field value entered".to_string());
        }
        match err {
            DbErr::RecordNotFound(msg) => Self::NotFound(msg),
            other => Self::Database(other),
        }
    }
}
