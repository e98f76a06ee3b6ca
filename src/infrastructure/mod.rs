//! 基础设施层：日志与产品存储

pub mod logger;
pub mod store;
