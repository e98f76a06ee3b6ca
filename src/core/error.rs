//! 核心错误处理模块
//!
//! 处理器只负责返回 `CoreError`，统一由 `IntoResponse` 实现映射为 HTTP 状态码
//! 和 `{ success, error, message }` 响应体。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// 核心错误类型
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Server(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn product_not_found() -> Self {
        CoreError::NotFound("Product not found".to_string())
    }

    /// 对外暴露的错误类别名称
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::NotFound(_) => "NotFoundError",
            CoreError::Validation(_) => "ValidationError",
            CoreError::PayloadTooLarge(_) => "PayloadTooLargeError",
            CoreError::Server(_) => "ServerError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            CoreError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(kind = self.kind(), status = status.as_u16(), "请求处理失败: {}", self);

        let body = ErrorResponse::new(self.kind(), self.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_status_mapping() {
        let cases = [
            (CoreError::product_not_found(), "NotFoundError", StatusCode::NOT_FOUND),
            (
                CoreError::Validation("bad".into()),
                "ValidationError",
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::PayloadTooLarge("big".into()),
                "PayloadTooLargeError",
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                CoreError::Server("boom".into()),
                "ServerError",
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, kind, status) in cases {
            assert_eq!(err.kind(), kind);
            assert_eq!(err.status(), status);
        }
    }

    #[test]
    fn test_into_response_uses_mapped_status() {
        let response = CoreError::product_not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
