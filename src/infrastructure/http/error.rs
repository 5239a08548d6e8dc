//! HTTP Error Handling
//!
//! 业务错误统一返回 HTTP 200，通过 errno 区分

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{ApplicationError, SettingsError};

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    /// 远端语音服务或本地音频设备不可用
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn errno(&self) -> i32 {
        match self {
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
            ApiError::ServiceUnavailable(_) => errno::SERVICE_UNAVAILABLE,
        }
    }

    fn into_message(self) -> String {
        match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Internal(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errno = self.errno();
        match &self {
            ApiError::NotFound(msg) => tracing::warn!(errno, error = %msg, "Resource not found"),
            ApiError::BadRequest(msg) => tracing::warn!(errno, error = %msg, "Bad request"),
            ApiError::Internal(msg) => {
                tracing::error!(errno, error = %msg, "Internal server error")
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(errno, error = %msg, "Service unavailable")
            }
        }

        let body = ErrorResponse {
            errno,
            error: self.into_message(),
            data: None,
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::EmptyContent => ApiError::BadRequest(e.to_string()),
            ApplicationError::ReadError(msg) => ApiError::BadRequest(msg),
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::SynthesisFailed(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::CatalogUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::PlaybackBackendError(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(e: SettingsError) -> Self {
        match e {
            SettingsError::Invalid(msg) => ApiError::BadRequest(msg),
            SettingsError::PersistError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: ApiError) -> serde_json::Value {
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_business_errors_use_errno() {
        let json = body_json(ApiError::from(ApplicationError::EmptyContent)).await;
        assert_eq!(json["errno"], errno::BAD_REQUEST);
        assert!(json["data"].is_null());

        let json = body_json(ApiError::from(ApplicationError::SynthesisFailed(
            "HTTP 401".to_string(),
        )))
        .await;
        assert_eq!(json["errno"], errno::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"], "HTTP 401");
    }

    #[tokio::test]
    async fn test_settings_errors() {
        let json = body_json(SettingsError::Invalid("voice cannot be empty".into()).into()).await;
        assert_eq!(json["errno"], errno::BAD_REQUEST);

        let json = body_json(SettingsError::PersistError("read-only".into()).into()).await;
        assert_eq!(json["errno"], errno::INTERNAL_ERROR);
    }
}
