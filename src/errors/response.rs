use axum::{
    response::{IntoResponse, Response, Json},
    http::StatusCode,
};
use serde_json::json;
use crate::errors::{AppError, StoreError};

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::InvalidTransition { .. }
            | AppError::UnknownStatus(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(err) => store_status(err),
            AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Client mistakes that surface from the store are bad requests, the rest is ours
fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::DuplicateLogin(_) | StoreError::UnknownUser(_) => StatusCode::BAD_REQUEST,
        StoreError::Corrupt(_) | StoreError::Redis(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Store(
                err @ (StoreError::DuplicateLogin(_) | StoreError::UnknownUser(_)),
            ) => err.to_string(),
            // Backend details stay in the logs
            AppError::Store(err) => {
                tracing::error!("Store failure: {}", err);
                "Internal server error".to_string()
            }
            AppError::Export(err) => {
                tracing::error!("CSV export failure: {}", err);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
