//! # 页面渲染
//!
//! 基于 minijinja 的服务端页面。模板随二进制一起编译，`.html` 模板开启 HTML 自动转义，
//! 用户输入与抓取到的页面字段都经由引擎转义后输出。

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use entity::{url_checks, urls};
use minijinja::{AutoEscape, Environment, UndefinedBehavior, context};
use serde::Serialize;

use super::flash::FlashMessage;
use crate::error::{AnalyzerError, Result};
use crate::repository::UrlListItem;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("templates/layout.html")),
    ("index.html", include_str!("templates/index.html")),
    ("urls.html", include_str!("templates/urls.html")),
    ("url.html", include_str!("templates/url.html")),
    ("not_found.html", include_str!("templates/not_found.html")),
    ("error.html", include_str!("templates/error.html")),
];

/// 模板本身渲染失败时的兜底页面
const FALLBACK_ERROR_PAGE: &str = "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>Error - Page Analyzer</title></head><body><h1>Something went wrong</h1></body></html>";

fn template_env() -> &'static Environment<'static> {
    static ENV: OnceLock<Environment<'static>> = OnceLock::new();
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|name| {
            if name.ends_with(".html") {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });
        for &(name, source) in TEMPLATES {
            if let Err(e) = env.add_template(name, source) {
                tracing::error!(template = %name, error = %e, "failed to load page template");
            }
        }
        env
    })
}

fn render(name: &str, ctx: minijinja::Value) -> Result<String> {
    template_env()
        .get_template(name)
        .and_then(|template| template.render(ctx))
        .map_err(|e| AnalyzerError::internal_with_source(format!("页面渲染失败: {name}"), e))
}

fn format_date(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d").to_string()
}

#[derive(Serialize)]
struct UrlRow<'a> {
    id: i32,
    name: &'a str,
    last_checked_at: Option<String>,
    last_status_code: Option<i32>,
}

#[derive(Serialize)]
struct UrlView<'a> {
    id: i32,
    name: &'a str,
    created_at: String,
}

#[derive(Serialize)]
struct CheckRow<'a> {
    id: i32,
    status_code: Option<i32>,
    h1: Option<&'a str>,
    title: Option<&'a str>,
    description: Option<&'a str>,
    created_at: String,
}

/// 首页：地址输入表单
///
/// `input` 为校验失败时回填的原始输入。
pub fn index_page(flash: Option<&FlashMessage>, input: &str) -> Result<String> {
    render(
        "index.html",
        context! {
            title => "Home",
            flash => flash,
            input => input,
            invalid => flash.is_some() && !input.is_empty(),
        },
    )
}

/// 站点列表
pub fn urls_page(flash: Option<&FlashMessage>, items: &[UrlListItem]) -> Result<String> {
    let rows: Vec<UrlRow<'_>> = items
        .iter()
        .map(|item| UrlRow {
            id: item.id,
            name: &item.name,
            last_checked_at: item.last_checked_at.as_ref().map(format_date),
            last_status_code: item.last_status_code,
        })
        .collect();

    render(
        "urls.html",
        context! { title => "Sites", flash => flash, rows => rows },
    )
}

/// 站点详情与检查历史
pub fn url_page(
    flash: Option<&FlashMessage>,
    url: &urls::Model,
    checks: &[url_checks::Model],
) -> Result<String> {
    let checks: Vec<CheckRow<'_>> = checks
        .iter()
        .map(|check| CheckRow {
            id: check.id,
            status_code: check.status_code,
            h1: check.h1.as_deref(),
            title: check.title.as_deref(),
            description: check.description.as_deref(),
            created_at: format_date(&check.created_at),
        })
        .collect();
    let view = UrlView {
        id: url.id,
        name: &url.name,
        created_at: format_date(&url.created_at),
    };

    render(
        "url.html",
        context! { title => &url.name, flash => flash, url => view, checks => checks },
    )
}

/// 404 页面
#[must_use]
pub fn not_found_page() -> String {
    render("not_found.html", context! { title => "Not found", flash => () })
        .unwrap_or_else(|_| FALLBACK_ERROR_PAGE.to_string())
}

/// 500 页面
#[must_use]
pub fn error_page() -> String {
    render("error.html", context! { title => "Error", flash => () })
        .unwrap_or_else(|_| FALLBACK_ERROR_PAGE.to_string())
}
