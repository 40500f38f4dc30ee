use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::database::user_store::{Constraint, StoreError};
use crate::dto::user_dto::MessageResponse;
use crate::utils::validation::Violations;

pub const CONFLICT_MESSAGE: &str = "This email is already registered.";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(Violations),

    #[error("{}", CONFLICT_MESSAGE)]
    Conflict,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::Validation(violations) => {
                (StatusCode::BAD_REQUEST, Json(violations)).into_response()
            }
            Error::Conflict => (
                StatusCode::CONFLICT,
                Json(MessageResponse::new(CONFLICT_MESSAGE)),
            )
                .into_response(),
            other => {
                tracing::error!(error = ?other, "Error creating user: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageResponse::new(UNEXPECTED_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}

impl From<Violations> for Error {
    fn from(violations: Violations) -> Self {
        Error::Validation(violations)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation {
                constraint: Constraint::UsersEmailUnique,
            } => Error::Conflict,
            other => Error::Store(other),
        }
    }
}
