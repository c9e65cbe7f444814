//! # 错误处理测试

use crate::error::{AnalyzerError, Context, ErrorCategory};
use axum::http::StatusCode;
use std::error::Error;

#[test]
fn test_config_error_creation() {
    let err = AnalyzerError::config("测试配置错误");
    assert!(matches!(err, AnalyzerError::Config { .. }));
    assert_eq!(err.to_string(), "配置错误: 测试配置错误");
}

#[test]
fn test_config_error_with_source() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let err = AnalyzerError::config_with_source("配置文件加载失败", io_err);

    assert!(err.to_string().contains("配置错误: 配置文件加载失败"));
    assert!(err.source().is_some());
}

#[test]
fn test_auto_conversion_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在");
    let err: AnalyzerError = io_err.into();

    assert!(matches!(err, AnalyzerError::Io { .. }));
    assert!(err.to_string().contains("IO错误: 文件操作失败"));
}

#[test]
fn test_auto_conversion_from_toml_error() {
    let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
    let err: AnalyzerError = toml_err.into();

    assert!(matches!(err, AnalyzerError::Config { .. }));
    assert!(err.to_string().contains("配置错误: TOML解析失败"));
}

#[test]
fn test_generic_db_error_maps_to_database() {
    let err: AnalyzerError = sea_orm::DbErr::Custom("boom".to_string()).into();
    assert!(matches!(err, AnalyzerError::Database { .. }));
    assert_eq!(err.category(), ErrorCategory::Server);
}

#[test]
fn test_http_parts() {
    let err = AnalyzerError::validation("URL too long", Some("url".to_string()));
    assert_eq!(err.to_http_response_parts().0, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err.category(), ErrorCategory::Client);

    let err = AnalyzerError::not_found("url", "42");
    assert_eq!(err.to_http_response_parts(), (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"));
    assert_eq!(err.to_string(), "资源未找到: url 42");
}

#[test]
fn test_context_keeps_root_kind() {
    let result: Result<(), AnalyzerError> = Err(AnalyzerError::conflict("url", "https://a.io"));
    let err = result.context("插入站点失败").unwrap_err();

    assert!(matches!(err, AnalyzerError::Context { .. }));
    assert!(err.is_conflict());
    assert!(!err.is_not_found());
    assert_eq!(err.to_http_response_parts().0, StatusCode::CONFLICT);
    assert!(err.to_string().starts_with("插入站点失败: "));
}

#[test]
fn test_error_macros() {
    let err = crate::config_error!("缺少 {}", "DATABASE_URL");
    assert_eq!(err.to_string(), "配置错误: 缺少 DATABASE_URL");

    let err = crate::config_error!("端口缺失");
    assert!(matches!(err, AnalyzerError::Config { source: None, .. }));
}

#[test]
fn test_ensure_config_macro() {
    let check = |port: u16| -> crate::error::Result<()> {
        crate::ensure_config!(port != 0, "无效的服务器端口: {}", port);
        Ok(())
    };

    assert!(check(8000).is_ok());
    assert!(matches!(check(0).unwrap_err(), AnalyzerError::Config { .. }));
}
