//! # API 响应结构
//!
//! Every failed request answers with an [`ErrorReason`] body
//! (`{"code": "...", "message": "..."}`) and the matching status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::{AuthError, ErrorCategory, SandboxError};
use crate::lerror;
use crate::logging::{LogComponent, LogStage};
use crate::simulation::{ErrorReason, Rejection};

const INTERNAL_MESSAGE: &str = "An internal error occurred while processing.";

/// 处理器统一错误出口
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub reason: ErrorReason,
}

/// 处理器返回类型
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            reason: ErrorReason::new(code, message),
        }
    }

    /// 400 with the given code
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    /// 400 `INVALID_REQUEST`
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::bad_request("INVALID_REQUEST", message)
    }
}

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        Self {
            status: rejection.status,
            reason: rejection.reason,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let (status, code) = err.to_http_response_parts();
        if status.is_server_error() {
            lerror!(
                "api",
                LogStage::Error,
                LogComponent::Auth,
                "auth_failure",
                &format!("Token lifecycle failure: {err}")
            );
        }
        Self::new(status, code, err.client_message())
    }
}

impl From<SandboxError> for ApiError {
    fn from(err: SandboxError) -> Self {
        if let SandboxError::Auth(auth) = err {
            return auth.into();
        }

        let (status, code) = err.to_http_response_parts();
        match err.category() {
            ErrorCategory::Client => Self::new(status, code, err.to_string()),
            ErrorCategory::Server => {
                lerror!(
                    "api",
                    LogStage::Error,
                    LogComponent::Api,
                    "internal_error",
                    &format!("Request failed: {err}")
                );
                Self::new(status, code, INTERNAL_MESSAGE)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.reason)).into_response()
    }
}
