use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use explorer_engine::error::ExecutionError;
use explorer_routes::ConfigError;
use serde_json::json;
use tracing::error;

#[derive(thiserror::Error, Debug)]
pub enum ExplorerServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl ExplorerServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Config(ConfigError::Model(_)) => StatusCode::BAD_REQUEST,
            Self::Config(
                ConfigError::UnknownRoute(_)
                | ConfigError::UnknownPlugin { .. }
                | ConfigError::UnknownFilter { .. },
            ) => StatusCode::NOT_FOUND,
            Self::Config(_) | Self::Execution(ExecutionError::Compile(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Execution(ExecutionError::Endpoint(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ExplorerServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
