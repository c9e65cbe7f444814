//! # 配置管理模块
//!
//! 处理应用配置加载、环境变量覆盖和验证

mod app_config;
mod database;
mod manager;

pub use app_config::{AppConfig, CheckerConfig, ServerConfig, SessionConfig, StatusPolicy};
pub use database::DatabaseConfig;
pub use manager::ConfigManager;

use crate::ensure_config;
use crate::error::Result;

/// 验证配置有效性
pub(crate) fn validate_config(config: &AppConfig) -> Result<()> {
    ensure_config!(config.server.port != 0, "无效的服务器端口: {}", config.server.port);
    ensure_config!(
        config.server.host.parse::<std::net::IpAddr>().is_ok(),
        "无效的监听地址: {}",
        config.server.host
    );

    // 缺少数据库连接串属于启动致命错误
    ensure_config!(
        !config.database.url.trim().is_empty(),
        "DATABASE_URL is not set: database connection string is required"
    );

    ensure_config!(config.database.max_connections > 0, "数据库最大连接数必须大于0");
    ensure_config!(config.checker.timeout_secs > 0, "站点检查超时时间必须大于0");
    ensure_config!(
        !config.checker.user_agent.trim().is_empty(),
        "站点检查 User-Agent 不能为空"
    );

    Ok(())
}
