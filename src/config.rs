//! 服务配置

use std::env;
use thiserror::Error;

/// 默认监听端口
pub const DEFAULT_PORT: u16 = 3000;
/// 产品接口共享密钥
pub const DEFAULT_API_KEY: &str = "secret123";

/// 配置错误类型
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT 配置无效 '{value}': {reason}")]
    InvalidPort { value: String, reason: String },
}

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP 服务端口
    pub port: u16,
    /// 请求头 `x-api-key` 需要匹配的密钥
    pub api_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置，仅 `PORT` 可配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("PORT") {
            config.port = value.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidPort {
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
