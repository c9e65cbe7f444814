//! # Page Analyzer
//!
//! 保存网站地址并按需检查页面：HTTP 状态码、h1、title 与 meta description

pub mod app;
pub mod checker;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod repository;
pub mod services;
pub mod validator;
pub mod web;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AnalyzerError, Result};
