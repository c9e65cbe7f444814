//! # 一次性提示消息
//!
//! 重定向前写入签名 Cookie，下一次渲染页面时读取并清除。
//! Cookie 值为 `base64(json).hex(hmac-sha256)`，签名不符的 Cookie 直接忽略。

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Cookie 名称
pub const FLASH_COOKIE: &str = "flash";

/// 消息级别，对应页面上的提示样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Danger,
}

impl FlashLevel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Danger => "danger",
        }
    }
}

/// 提示消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            text: text.into(),
        }
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            text: text.into(),
        }
    }
}

/// Cookie 签名器
#[derive(Clone)]
pub struct FlashSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for FlashSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashSigner").field("key", &"***").finish()
    }
}

impl FlashSigner {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    /// 进程内随机密钥，重启后旧 Cookie 全部失效
    #[must_use]
    pub fn random() -> Self {
        Self::new(&format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()))
    }

    /// 编码并签名
    #[must_use]
    pub fn encode(&self, message: &FlashMessage) -> String {
        // 两个字段都是普通字符串，序列化不会失败
        let json = serde_json::to_vec(message).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = hex::encode(self.mac(payload.as_bytes()).finalize().into_bytes());
        format!("{payload}.{signature}")
    }

    /// 校验并解码，任何不一致都返回 None
    #[must_use]
    pub fn decode(&self, value: &str) -> Option<FlashMessage> {
        let (payload, signature) = value.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;
        self.mac(payload.as_bytes()).verify_slice(&signature).ok()?;
        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// 从请求头读取提示消息
    #[must_use]
    pub fn read(&self, headers: &HeaderMap) -> Option<FlashMessage> {
        let jar = CookieJar::from_headers(headers);
        let message = self.decode(jar.get(FLASH_COOKIE)?.value());
        if message.is_none() {
            tracing::debug!("ignoring flash cookie with invalid signature");
        }
        message
    }

    /// 写入提示消息的 `Set-Cookie` 值
    #[must_use]
    pub fn set_cookie(&self, message: &FlashMessage) -> String {
        flash_cookie(self.encode(message)).to_string()
    }

    /// 以 payload 初始化的 HMAC-SHA256
    fn mac(&self, payload: &[u8]) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(payload);
        mac
    }
}

fn flash_cookie(value: String) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// 清除提示消息的 `Set-Cookie` 值
#[must_use]
pub fn clear_cookie() -> String {
    let mut cookie = flash_cookie(String::new());
    cookie.make_removal();
    cookie.to_string()
}

/// 303 重定向并附带提示消息
pub fn redirect_with(signer: &FlashSigner, location: &str, message: &FlashMessage) -> Response {
    let mut response = Redirect::to(location).into_response();
    if let Ok(value) = HeaderValue::from_str(&signer.set_cookie(message)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn signed_message_is_read_back() {
        let signer = FlashSigner::new("secret");
        let message = FlashMessage::success("Page successfully added");
        let cookie = format!("theme=dark; {FLASH_COOKIE}={}", signer.encode(&message));

        assert_eq!(signer.read(&headers_with_cookie(&cookie)), Some(message));
    }

    #[test]
    fn other_secret_is_rejected() {
        let value = FlashSigner::new("one").encode(&FlashMessage::info("hi"));
        assert_eq!(FlashSigner::new("two").decode(&value), None);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = FlashSigner::new("secret");
        let value = signer.encode(&FlashMessage::info("hi"));
        let (_, signature) = value.rsplit_once('.').unwrap();
        let forged_payload = URL_SAFE_NO_PAD.encode(br#"{"level":"success","text":"forged"}"#);

        assert_eq!(signer.decode(&format!("{forged_payload}.{signature}")), None);
        assert_eq!(signer.decode("garbage"), None);
        assert_eq!(signer.decode(""), None);
    }

    #[test]
    fn signature_is_hmac_sha256_of_payload() {
        // RFC 4231 test case 2
        let signer = FlashSigner::new("Jefe");
        assert_eq!(
            hex::encode(signer.mac(b"what do ya want for nothing?").finalize().into_bytes()),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn truncated_signature_is_rejected() {
        let signer = FlashSigner::new("secret");
        let value = signer.encode(&FlashMessage::info("hi"));
        let shortened = &value[..value.len() - 2];
        assert_eq!(signer.decode(shortened), None);
    }

    #[test]
    fn unrelated_cookies_are_ignored() {
        let signer = FlashSigner::new("secret");
        assert_eq!(signer.read(&headers_with_cookie("theme=dark; lang=en")), None);
        assert_eq!(signer.read(&HeaderMap::new()), None);
    }

    #[test]
    fn long_keys_are_hashed() {
        let signer = FlashSigner::new(&"k".repeat(200));
        let value = signer.encode(&FlashMessage::danger("x"));
        assert!(signer.decode(&value).is_some());
    }

    #[test]
    fn redirect_sets_cookie_and_location() {
        let signer = FlashSigner::random();
        let response = redirect_with(&signer, "/urls/1", &FlashMessage::info("Page already exists"));

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/urls/1");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_cookie();
        assert!(cookie.starts_with("flash=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));
    }
}
