//! # Product Catalog API
//!
//! 一个基于 Axum 的内存产品目录服务，提供：
//! - 产品的增删改查 (CRUD)
//! - 按分类过滤、分页、按名称搜索
//! - 分类统计
//! - API Key 认证与统一错误处理

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{router, AppState};
pub use config::AppConfig;
pub use crate::core::error::{CoreError, CoreResult};
