//! 核心中间件模块

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};
use std::{error::Error as StdError, time::Instant};
use tracing::{info, warn};

use super::{error::CoreError, response::Rejection};
use crate::app::product::model::ProductPayload;
use crate::app::{AppState, PRODUCTS_PREFIX};

/// 认证请求头
pub const API_KEY_HEADER: &str = "x-api-key";

/// 请求体最大读取字节数
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// 请求日志中间件，只记录不拦截
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let timestamp = chrono::Utc::now().to_rfc3339();

    let response = next.run(req).await;

    info!(
        "{} {} at {} - {} - {}ms",
        method,
        uri,
        timestamp,
        response.status(),
        start.elapsed().as_millis()
    );

    response
}

/// API Key 认证中间件，只对 `/api/products` 及其子路径生效
pub async fn api_key_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !is_protected_path(req.uri().path()) {
        return next.run(req).await;
    }

    let authorized = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|key| key == state.config.api_key);

    if !authorized {
        warn!("认证失败: {} {}", req.method(), req.uri().path());
        return Rejection::unauthorized().into_response();
    }

    next.run(req).await
}

/// 路径是否位于产品前缀之下
pub fn is_protected_path(path: &str) -> bool {
    path.strip_prefix(PRODUCTS_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// 产品请求体校验中间件（创建/更新）
///
/// 解析后的 JSON 对象通过请求扩展传给处理器。
pub async fn validate_product_middleware(req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) if exceeds_limit(&e) => {
            return CoreError::PayloadTooLarge("request entity too large".to_string())
                .into_response()
        }
        Err(e) => {
            return CoreError::Validation(format!("Invalid request body: {}", e)).into_response()
        }
    };

    let fields = match parse_object(&bytes) {
        Ok(fields) => fields,
        Err(err) => return err.into_response(),
    };

    let payload = ProductPayload(fields);
    if !payload.has_required_fields() {
        return Rejection::missing_product_fields().into_response();
    }

    parts.extensions.insert(payload);
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// 沿错误链查找请求体长度超限错误
fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source = Some(err as &(dyn StdError + 'static));
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

/// 空请求体视为空对象；非对象的 JSON 也视为没有任何字段
fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, CoreError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(e) => Err(CoreError::Validation(format!("Invalid JSON body: {}", e))),
    }
}
