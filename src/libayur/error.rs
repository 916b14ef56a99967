use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::{dataset::DatasetError, quiz::QuizError};

pub const HERB_NOT_FOUND: &str = "Herb not found";

/// Errors a request handler can return.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::NotFound(detail) => (StatusCode::NOT_FOUND, *detail),
            AppError::Database(_) | AppError::LockPoisoned | AppError::Task(_) => {
                error!("[Server] {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Failures that stop the server from starting.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("{0}")]
    Dataset(#[from] DatasetError),

    #[error("{0}")]
    Quiz(#[from] QuizError),

    #[error("cannot open herb database: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid allowed origin `{0}`")]
    InvalidOrigin(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
