//! # 页面信号提取
//!
//! 基于 html5ever 的容错解析，任何输入都只会得到“尽力而为”的结果，不会报错。

use scraper::{Html, Selector};
use std::sync::LazyLock;

use entity::url_checks::TEXT_FIELD_MAX_LEN;

/// 截断标记
pub const TRUNCATION_MARKER: &str = "...";

static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));

#[allow(clippy::expect_used)]
fn selector(css: &str) -> Selector {
    // 常量选择器，解析失败属于编码错误
    Selector::parse(css).expect("static CSS selector must parse")
}

/// 从页面提取的 SEO 信号
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    pub h1: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// 解析 HTML 文本并提取首个 h1、title 与 meta description
#[must_use]
pub fn extract_signals(body: &str) -> PageSignals {
    let document = Html::parse_document(body);

    let h1 = document
        .select(&H1)
        .next()
        .and_then(|node| clean_field(&node.text().collect::<String>()));

    let title = document
        .select(&TITLE)
        .next()
        .and_then(|node| clean_field(&node.text().collect::<String>()));

    let description = document
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|node| node.value().attr("content"))
        .and_then(clean_field);

    PageSignals {
        h1,
        title,
        description,
    }
}

/// 去除首尾空白、空串视为缺失，并限制长度
#[must_use]
pub fn clean_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(truncate_field(trimmed))
    }
}

/// 超过 255 字符时截断为 252 字符加 `...`
///
/// 按字符计数，不会截断到 UTF-8 码点中间。
#[must_use]
pub fn truncate_field(value: &str) -> String {
    if value.chars().count() <= TEXT_FIELD_MAX_LEN {
        return value.to_string();
    }
    let keep = TEXT_FIELD_MAX_LEN - TRUNCATION_MARKER.chars().count();
    let mut truncated: String = value.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
