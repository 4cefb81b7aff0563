use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use serde::{Deserialize, Serialize};

use crate::{auth::AuthError, predict::PredictError};

pub mod auth;
pub mod predict;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Error leaving a handler. Only `detail` reaches the client; `source` is
/// logged and dropped.
pub struct ApiError {
    status: StatusCode,
    detail: String,
    source: Option<anyhow::Error>,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
            source: None,
        }
    }

    fn internal(detail: &str, source: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.to_string(),
            source: Some(source),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(source) = &self.source {
            error!("ApiError ({}): {:?}", self.status, source);
        }
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingField | AuthError::DuplicateAccount => {
                ApiError::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            AuthError::InvalidCredentials => {
                ApiError::new(StatusCode::UNAUTHORIZED, err.to_string())
            }
            AuthError::StoreUnavailable(source) => {
                ApiError::internal("Internal server error", source)
            }
            AuthError::Internal(source) => ApiError::internal("Internal server error", source),
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::InvalidInput(detail) => ApiError::new(StatusCode::BAD_REQUEST, detail),
            PredictError::Upstream(source) => {
                error!("Prediction upstream failed: {source}");
                ApiError::new(StatusCode::BAD_GATEWAY, "Prediction service unavailable")
            }
        }
    }
}
