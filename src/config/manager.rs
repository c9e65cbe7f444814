//! # 配置管理器
//!
//! 统一的配置加载入口：可选的 TOML 文件 + 环境变量覆盖

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{AppConfig, StatusPolicy};
use crate::error::{AnalyzerError, Result};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "PAGE_ANALYZER_CONFIG_PATH";

/// 通用覆盖变量前缀，例如 `PAGE_ANALYZER_CHECKER_TIMEOUT_SECS`
const ENV_PREFIX: &str = "PAGE_ANALYZER_";

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 当前配置
    config: AppConfig,
    /// 配置文件来源（未使用文件时为 None）
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 从进程环境创建配置管理器
    ///
    /// `config_path` 优先于 `PAGE_ANALYZER_CONFIG_PATH`；两者都不存在时只使用默认值和环境变量。
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let env_path = env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let path = config_path.map(Path::to_path_buf).or(env_path);
        Self::from_parts(path.as_deref(), env::vars())
    }

    /// 从给定的文件与变量集合创建配置管理器
    pub fn from_parts<I>(config_path: Option<&Path>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = match config_path {
            Some(path) => Self::load_config_file(path)?,
            None => AppConfig::default(),
        };

        let overrides = Self::build_env_overrides(vars);
        Self::apply_env_overrides(&mut config, &overrides)?;

        super::validate_config(&config)?;

        info!("配置管理器初始化完成");
        info!(
            "- 配置文件: {}",
            config_path.map_or_else(|| "未使用".to_string(), |p| p.display().to_string())
        );
        info!("- 环境变量覆盖: {} 个", overrides.len());

        Ok(Self {
            config,
            source: config_path.map(Path::to_path_buf),
        })
    }

    /// 获取当前配置
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 取出配置
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// 配置文件来源
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 加载配置文件
    fn load_config_file(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            return Err(AnalyzerError::config(format!(
                "配置文件不存在: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalyzerError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| {
            AnalyzerError::config_with_source(
                format!("TOML解析失败 - 配置文件: {}", path.display()),
                e,
            )
        })
    }

    /// 构建环境变量覆盖映射
    ///
    /// 约定变量名（`DATABASE_URL`、`SECRET_KEY`、`PORT`）直接映射，
    /// `PAGE_ANALYZER_` 前缀变量映射为配置路径，例如
    /// `PAGE_ANALYZER_CHECKER_TIMEOUT_SECS` -> `checker.timeout.secs`。
    /// 监听地址只读 `PAGE_ANALYZER_SERVER_HOST`：部分 shell 会把主机名导出为 `HOST`。
    fn build_env_overrides<I>(vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut overrides = HashMap::new();

        for (key, value) in vars {
            let path = match key.as_str() {
                "DATABASE_URL" => Some("database.url".to_string()),
                "SECRET_KEY" => Some("session.secret.key".to_string()),
                "PORT" => Some("server.port".to_string()),
                _ => key
                    .strip_prefix(ENV_PREFIX)
                    .filter(|rest| *rest != "CONFIG_PATH")
                    .map(|rest| rest.to_lowercase().replace('_', ".")),
            };

            if let Some(path) = path {
                overrides.insert(path, value);
            }
        }

        debug!("发现 {} 个环境变量覆盖", overrides.len());
        overrides
    }

    /// 应用环境变量覆盖
    fn apply_env_overrides(
        config: &mut AppConfig,
        overrides: &HashMap<String, String>,
    ) -> Result<()> {
        for (path, value) in overrides {
            debug!(
                "应用环境变量覆盖: {} = {}",
                path,
                if path.contains("password") || path.contains("key") || path.contains("url") {
                    "***"
                } else {
                    value
                }
            );

            Self::apply_override_to_config(config, path, value)?;
        }
        Ok(())
    }

    /// 将单个覆盖值写入配置对象
    fn apply_override_to_config(config: &mut AppConfig, path: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => config.server.host = value.to_string(),
            ["server", "port"] => config.server.port = parse_value(value, "端口号")?,
            ["database", "url"] => config.database.url = value.to_string(),
            ["database", "max", "connections"] => {
                config.database.max_connections = parse_value(value, "最大连接数")?;
            }
            ["database", "connect", "timeout"] => {
                config.database.connect_timeout = parse_value(value, "连接超时时间")?;
            }
            ["session", "secret", "key"] => {
                config.session.secret_key = (!value.is_empty()).then(|| value.to_string());
            }
            ["checker", "timeout", "secs"] => {
                config.checker.timeout_secs = parse_value(value, "检查超时时间")?;
            }
            ["checker", "user", "agent"] => config.checker.user_agent = value.to_string(),
            ["checker", "max", "redirects"] => {
                config.checker.max_redirects = parse_value(value, "重定向次数")?;
            }
            ["checker", "status", "policy"] => {
                config.checker.status_policy = value
                    .parse::<StatusPolicy>()
                    .map_err(AnalyzerError::config)?;
            }
            _ => {
                warn!("未知的配置路径，忽略环境变量覆盖: {}", path);
            }
        }

        Ok(())
    }
}

fn parse_value<T>(value: &str, what: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse::<T>().map_err(|e| {
        AnalyzerError::config_with_source(format!("无效的{what}: {value}"), e)
    })
}
