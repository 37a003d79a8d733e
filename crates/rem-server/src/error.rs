use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Message returned when a request body is not a JSON object.
pub const MALFORMED_INPUT_MESSAGE: &str =
    "500. HTTP request body is not an object/array or valid JSON.";

/// Message returned for routes the API does not support.
pub const ROUTE_UNSUPPORTED_MESSAGE: &str = "404. The api does not support that.";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{}", MALFORMED_INPUT_MESSAGE)]
    MalformedInput,

    #[error("{}", ROUTE_UNSUPPORTED_MESSAGE)]
    RouteUnsupported,

    #[error(transparent)]
    Engine(#[from] rem_engine::EngineError),

    #[error("loader error: {0}")]
    Loader(#[from] rem_loader::LoaderError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::RouteUnsupported => StatusCode::NOT_FOUND,
            ServerError::MalformedInput
            | ServerError::Engine(_)
            | ServerError::Loader(_)
            | ServerError::Config(_)
            | ServerError::Io(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() && !matches!(self, ServerError::MalformedInput) {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
