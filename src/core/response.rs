//! 核心响应处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 只包含 `message` 字段的简单响应体
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 分页列表响应
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub page: i64,
    pub limit: i64,
    pub total: usize,
    pub products: Vec<T>,
}

/// 删除成功响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse<T> {
    pub message: String,
    pub deleted_product: Vec<T>,
}

impl<T> DeletedResponse<T> {
    pub fn new(deleted: T) -> Self {
        Self {
            message: "Product deleted".to_string(),
            deleted_product: vec![deleted],
        }
    }
}

/// 中间件或处理器直接返回的拒绝响应，不经过统一错误映射
#[derive(Debug)]
pub struct Rejection {
    pub status: StatusCode,
    pub message: String,
}

impl Rejection {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized: Invalid or missing API key",
        )
    }

    pub fn missing_product_fields() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Validation error: 'name' and 'price' are required",
        )
    }

    pub fn missing_search_name() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Please provide a name to search")
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(MessageResponse {
                message: self.message,
            }),
        )
            .into_response()
    }
}
