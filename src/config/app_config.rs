//! # 应用配置结构定义

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认浏览器 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: super::DatabaseConfig,
    /// 会话（flash 消息签名）配置
    pub session: SessionConfig,
    /// 站点检查配置
    pub checker: CheckerConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// 监听地址字符串，例如 `0.0.0.0:8000`
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 会话配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// flash cookie 签名密钥
    pub secret_key: Option<String>,
}

/// 非 2xx 响应的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// 记录任何状态码
    #[default]
    Record,
    /// 非 2xx 视为检查失败，不落库
    Reject,
}

impl std::str::FromStr for StatusPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "record" => Ok(Self::Record),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown status policy: {other}")),
        }
    }
}

/// 站点检查配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
    /// 请求头 User-Agent
    pub user_agent: String,
    /// 最多跟随的重定向次数
    pub max_redirects: usize,
    /// 非 2xx 状态码处理策略
    pub status_policy: StatusPolicy,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 10,
            status_policy: StatusPolicy::Record,
        }
    }
}

impl CheckerConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [database]
            url = "sqlite://./data/test.db"

            [checker]
            status_policy = "reject"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "sqlite://./data/test.db");
        assert_eq!(config.checker.status_policy, StatusPolicy::Reject);
        assert_eq!(config.checker.timeout_secs, 10);
        assert!(config.session.secret_key.is_none());
    }

    #[test]
    fn status_policy_from_str() {
        assert_eq!("Record".parse::<StatusPolicy>(), Ok(StatusPolicy::Record));
        assert_eq!(" reject ".parse::<StatusPolicy>(), Ok(StatusPolicy::Reject));
        assert!("strict".parse::<StatusPolicy>().is_err());
    }
}
