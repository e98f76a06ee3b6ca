//! 产品模块：模型、业务服务、处理器与路由

pub mod handler;
pub mod model;
pub mod service;

use axum::{
    handler::Handler,
    middleware,
    routing::{get, MethodRouter},
    Router,
};

use crate::app::{AppState, PRODUCTS_PREFIX};
use crate::core::middleware::validate_product_middleware;

/// 产品路由，使用 `/api/products` 开头的完整路径
///
/// `/search` 与 `/stats` 是静态路径，优先于 `/:id` 匹配。
/// 认证由外层中间件按路径前缀统一处理。
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(PRODUCTS_PREFIX, collection_routes())
        .route(&format!("{}/", PRODUCTS_PREFIX), collection_routes())
        .route(
            &format!("{}/search", PRODUCTS_PREFIX),
            get(handler::search_products),
        )
        .route(
            &format!("{}/stats", PRODUCTS_PREFIX),
            get(handler::product_stats),
        )
        .route(
            &format!("{}/:id", PRODUCTS_PREFIX),
            get(handler::get_product)
                .put(
                    handler::update_product
                        .layer(middleware::from_fn(validate_product_middleware)),
                )
                .delete(handler::delete_product),
        )
}

/// 列表与创建，同时挂在带与不带结尾斜杠的路径上
fn collection_routes() -> MethodRouter<AppState> {
    get(handler::list_products).post(
        handler::create_product.layer(middleware::from_fn(validate_product_middleware)),
    )
}
