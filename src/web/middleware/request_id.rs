//! # Request ID 中间件
//!
//! 为每个请求生成唯一 `request_id`，注入请求扩展并回写到响应头。
//! 上游代理传入的合法 `x-request-id` 会被沿用。

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::fmt;
use std::ops::Deref;
use uuid::Uuid;

/// 请求ID响应头
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_INCOMING_LEN: usize = 64;

/// 请求ID类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// 接受上游传入的 ID，仅允许字母数字与 `-`
    fn from_incoming(value: &HeaderValue) -> Option<Self> {
        let value = value.to_str().ok()?;
        let valid = !value.is_empty()
            && value.len() <= MAX_INCOMING_LEN
            && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then(|| Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Deref for RequestId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// 请求ID中间件
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(RequestId::from_incoming)
        .unwrap_or_default();
    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
