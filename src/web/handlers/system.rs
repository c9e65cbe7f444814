//! 系统级处理器：存活检查与 404

use axum::http::StatusCode;
use axum::response::Response;

use crate::web::{response, views};

/// 存活检查
pub async fn ping_handler() -> &'static str {
    "pong"
}

/// 未匹配路由
pub async fn not_found_handler() -> Response {
    response::page(StatusCode::NOT_FOUND, views::not_found_page(), false)
}
