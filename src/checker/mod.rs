//! # 站点检查
//!
//! 对规范化后的站点地址发起一次 GET 请求，记录状态码并提取页面信号。
//! 只有传输层失败（超时、DNS/连接失败、读取中断）才视为检查失败。

pub mod html;

use async_trait::async_trait;
use reqwest::{Client, redirect::Policy};
use std::time::Duration;
use thiserror::Error;

use crate::config::{CheckerConfig, StatusPolicy};
use crate::error::{AnalyzerError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, lwarn};

pub use html::{PageSignals, extract_signals, truncate_field};

/// 一次成功检查的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
    pub status_code: Option<u16>,
    pub h1: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl CheckResult {
    /// 由状态码与页面信号组装
    #[must_use]
    pub fn from_signals(status_code: u16, signals: PageSignals) -> Self {
        Self {
            status_code: Some(status_code),
            h1: signals.h1,
            title: signals.title,
            description: signals.description,
        }
    }
}

/// 检查失败的原因，不会落库
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("could not connect: {0}")]
    Connect(String),

    #[error("server responded with HTTP {0}")]
    HttpStatus(u16),

    #[error("transport error: {0}")]
    Transport(String),
}

impl CheckError {
    fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                seconds: timeout.as_secs(),
            }
        } else if err.is_connect() {
            Self::Connect(error_chain(err))
        } else {
            Self::Transport(error_chain(err))
        }
    }
}

/// reqwest 的顶层消息通常不含根因，拼接整个 source 链
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// 站点检查器
///
/// Web 层只依赖该 trait，测试中可以替换为不访问网络的实现。
#[async_trait]
pub trait SiteChecker: Send + Sync {
    /// 对 `url` 执行一次检查
    async fn check(&self, url: &str) -> std::result::Result<CheckResult, CheckError>;
}

/// 基于 reqwest 的检查器
#[derive(Debug, Clone)]
pub struct HttpSiteChecker {
    client: Client,
    timeout: Duration,
    status_policy: StatusPolicy,
}

impl HttpSiteChecker {
    /// 按配置创建检查器
    pub fn new(config: &CheckerConfig) -> Result<Self> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| AnalyzerError::internal_with_source("创建站点检查 HTTP 客户端失败", e))?;

        Ok(Self {
            client,
            timeout,
            status_policy: config.status_policy,
        })
    }

    /// 当前的状态码策略
    #[must_use]
    pub const fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }
}

#[async_trait]
impl SiteChecker for HttpSiteChecker {
    async fn check(&self, url: &str) -> std::result::Result<CheckResult, CheckError> {
        ldebug!("system", LogStage::Check, LogComponent::Checker, "fetch_start", &format!("GET {url}"));

        let response = self.client.get(url).send().await.map_err(|e| {
            let err = CheckError::from_reqwest(&e, self.timeout);
            lwarn!("system", LogStage::Check, LogComponent::Checker, "fetch_failed", &format!("{url}: {err}"));
            err
        })?;

        let status = response.status();
        if self.status_policy == StatusPolicy::Reject && !status.is_success() {
            lwarn!(
                "system",
                LogStage::Check,
                LogComponent::Checker,
                "status_rejected",
                &format!("{url}: HTTP {}", status.as_u16())
            );
            return Err(CheckError::HttpStatus(status.as_u16()));
        }

        // 非 UTF-8 内容按替换字符解码，解析本身不会失败
        let body = response.text().await.map_err(|e| {
            let err = CheckError::from_reqwest(&e, self.timeout);
            lwarn!("system", LogStage::Check, LogComponent::Checker, "body_failed", &format!("{url}: {err}"));
            err
        })?;

        let result = CheckResult::from_signals(status.as_u16(), extract_signals(&body));
        ldebug!(
            "system",
            LogStage::Check,
            LogComponent::Checker,
            "fetch_done",
            &format!("{url}: HTTP {}", status.as_u16())
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_signals_keeps_fields() {
        let result = CheckResult::from_signals(
            404,
            PageSignals {
                h1: Some("Not Found".to_string()),
                title: None,
                description: None,
            },
        );
        assert_eq!(result.status_code, Some(404));
        assert_eq!(result.h1.as_deref(), Some("Not Found"));
        assert!(result.title.is_none());
    }

    #[test]
    fn check_errors_are_readable() {
        assert_eq!(
            CheckError::Timeout { seconds: 10 }.to_string(),
            "request timed out after 10s"
        );
        assert_eq!(CheckError::HttpStatus(503).to_string(), "server responded with HTTP 503");
    }

    #[test]
    fn error_chain_joins_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let outer = AnalyzerError::network_with_source("connect", inner);
        assert_eq!(error_chain(&outer), "网络错误: connect: refused");
    }

    #[test]
    fn checker_builds_from_default_config() {
        let checker = HttpSiteChecker::new(&CheckerConfig::default()).unwrap();
        assert_eq!(checker.status_policy(), StatusPolicy::Record);
        assert_eq!(checker.timeout, Duration::from_secs(10));
    }
}
