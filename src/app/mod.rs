//! 应用层：组装全部 HTTP 路由

pub mod product;

use axum::{
    http::Uri,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::{any::Any, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

use crate::config::AppConfig;
use crate::core::error::CoreError;
use crate::core::middleware::{api_key_auth_middleware, request_logging_middleware};
use crate::infrastructure::store::SharedStore;
use product::service::ProductService;

pub const PRODUCTS_PREFIX: &str = "/api/products";

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, store: SharedStore) -> Self {
        Self {
            product_service: ProductService::new(store),
            config: Arc::new(config),
        }
    }
}

/// 构建完整路由
///
/// 中间件顺序（由外到内）：panic 捕获、trace、请求日志、`/api/products` 前缀认证。
/// 回退处理器在 `layer` 之前注册，因此同样经过认证。
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .merge(product::routes())
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    api_key_auth_middleware,
                )),
        )
        .with_state(state)
}

async fn welcome() -> &'static str {
    "Welcome to the Product API! Go to /api/products to see all products."
}

async fn route_not_found(uri: Uri) -> CoreError {
    CoreError::NotFound(format!("Route not found: {}", uri.path()))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("处理器发生 panic: {}", detail);

    CoreError::Server("Something went wrong".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_panic_maps_to_server_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(String::from("boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
