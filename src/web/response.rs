//! # 页面响应
//!
//! 处理器统一的 HTML 出口，负责状态码、提示消息 Cookie 的清理和内部错误页面。

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

use super::flash::clear_cookie;
use super::middleware::RequestId;
use super::views;
use crate::error::{AnalyzerError, ErrorCategory, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{lerror, lwarn};

/// 渲染 HTML 页面
///
/// `flash_shown` 为 true 时清除提示消息 Cookie。
pub fn page(status: StatusCode, html: String, flash_shown: bool) -> Response {
    let mut response = (status, Html(html)).into_response();
    if flash_shown {
        if let Ok(value) = HeaderValue::from_str(&clear_cookie()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// 输出模板渲染结果，渲染失败时转为内部错误页
pub fn render(
    request_id: &RequestId,
    operation: &str,
    status: StatusCode,
    rendered: Result<String>,
    flash_shown: bool,
) -> Response {
    match rendered {
        Ok(html) => page(status, html, flash_shown),
        Err(err) => server_error(request_id, operation, &err),
    }
}

/// 未预期的内部错误：记录日志并返回通用错误页
pub fn server_error(request_id: &RequestId, operation: &str, err: &AnalyzerError) -> Response {
    let (status, code) = err.to_http_response_parts();
    match err.category() {
        ErrorCategory::Client => lwarn!(
            request_id,
            LogStage::Response,
            LogComponent::Handler,
            operation,
            &format!("{code}: {err}")
        ),
        ErrorCategory::Server => lerror!(
            request_id,
            LogStage::Response,
            LogComponent::Handler,
            operation,
            &format!("{code}: {err:?}")
        ),
    }

    let status = if status.is_server_error() {
        status
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    page(status, views::error_page(), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clears_flash_only_when_shown() {
        let shown = page(StatusCode::OK, "<p>ok</p>".to_string(), true);
        assert!(shown.headers().contains_key(header::SET_COOKIE));

        let plain = page(StatusCode::OK, "<p>ok</p>".to_string(), false);
        assert!(!plain.headers().contains_key(header::SET_COOKIE));
    }

    #[test]
    fn failed_render_becomes_error_page() {
        let rendered = Err(AnalyzerError::internal_with_source(
            "页面渲染失败: index.html",
            std::fmt::Error,
        ));
        let response = render(&RequestId::new(), "test", StatusCode::OK, rendered, true);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.headers().contains_key(header::SET_COOKIE));
    }

    #[test]
    fn server_error_renders_500() {
        let err = AnalyzerError::database("connection lost");
        let response = server_error(&RequestId::new(), "test", &err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
