use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

pub const MISSING_QUERY_MESSAGE: &str = "Missing query parameter 'q'";
pub const FILE_NOT_FOUND_MESSAGE: &str = "File not found";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Generation(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing_query() -> Self {
        Self::Validation(MISSING_QUERY_MESSAGE.to_string())
    }

    pub fn file_not_found() -> Self {
        Self::NotFound(FILE_NOT_FOUND_MESSAGE.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Generation(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(format!("{value:#}"))
    }
}

impl From<askama::Error> for ApiError {
    fn from(value: askama::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
