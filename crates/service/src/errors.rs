use thiserror::Error;

use models::errors::ModelError;

/// Application errors raised by the service layer. Every variant renders a human-readable message;
/// callers pick a response status by variant.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("System does not have a systemId")]
    MissingId,
    #[error("Path variable systemId does not match System.systemId")]
    IdMismatch { path: i32, body: Option<i32> },
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn system_not_found(system_id: i32) -> Self {
        Self::NotFound(format!("No System found for systemId[{}]", system_id))
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => Self::Validation(msg),
            ModelError::Db(msg) => Self::Db(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}
