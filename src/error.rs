use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Terminal outcome of a request that did not produce file bytes.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("file not found")]
    NotFound,

    #[error("malformed range header")]
    BadRequest,

    #[error("range not satisfiable")]
    Unsatisfiable,

    #[error(transparent)]
    Io(io::Error),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::NotFound => StatusCode::NOT_FOUND,
            ServeError::BadRequest => StatusCode::BAD_REQUEST,
            ServeError::Unsatisfiable => StatusCode::RANGE_NOT_SATISFIABLE,
            ServeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<io::Error> for ServeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ServeError::NotFound,
            _ => ServeError::Io(err),
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        match &self {
            ServeError::Io(err) => tracing::error!(error = %err, "failed to read file"),
            other => tracing::warn!(status = %other.status(), "{other}"),
        }
        self.status().into_response()
    }
}
