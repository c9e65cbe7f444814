//! # 路由配置

use axum::Router;
use axum::routing::{get, post};

use super::handlers::{checks, system, urls};
use super::server::AppState;

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(urls::index))
        .route("/urls", get(urls::list_urls).post(urls::create_url))
        .route("/urls/{id}", get(urls::show_url))
        .route("/urls/{id}/checks", post(checks::create_check))
        .route("/ping", get(system::ping_handler))
        .fallback(system::not_found_handler)
        .with_state(state)
}
