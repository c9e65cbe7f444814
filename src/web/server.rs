//! # Web 服务器
//!
//! Axum HTTP 服务器：路由、中间件与优雅关闭

use std::any::Any;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::Response;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use super::middleware::request_id_middleware;
use super::{response, views};
use crate::app::AppContext;
use crate::config::ServerConfig;
use crate::error::{AnalyzerError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{lerror, linfo};

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// 组装完整的应用路由（含中间件）
pub fn create_router(context: Arc<AppContext>) -> Router {
    let state = AppState::new(context);

    super::routes::create_routes(state).layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(handle_panic)),
    )
}

/// 处理器 panic 时返回通用错误页
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    lerror!(
        "system",
        LogStage::Response,
        LogComponent::Handler,
        "handler_panic",
        &format!("Request handler panicked: {detail}")
    );
    response::page(StatusCode::INTERNAL_SERVER_ERROR, views::error_page(), false)
}

/// Web 服务器
pub struct WebServer {
    config: ServerConfig,
    router: Router,
}

impl WebServer {
    /// 创建新的服务器
    pub fn new(config: ServerConfig, context: Arc<AppContext>) -> Self {
        Self {
            config,
            router: create_router(context),
        }
    }

    /// 监听地址
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let ip = self.config.host.parse::<std::net::IpAddr>().map_err(|e| {
            AnalyzerError::config_with_source(
                format!("Invalid bind address '{}'", self.config.host),
                e,
            )
        })?;
        Ok(SocketAddr::new(ip, self.config.port))
    }

    /// 启动服务器，收到 Ctrl+C 后优雅退出
    pub async fn serve(self) -> Result<()> {
        let addr = self.bind_address()?;

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::ServerSetup,
            "server_start",
            &format!("Starting web server on http://{addr}")
        );

        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            AnalyzerError::server_start_with_source(format!("Failed to bind {addr}"), e)
        })?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AnalyzerError::network_with_source("Web server error", e))?;

        linfo!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "server_stop",
            "Web server stopped"
        );
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        lerror!(
            "system",
            LogStage::Shutdown,
            LogComponent::ServerSetup,
            "signal_error",
            &format!("Failed to listen for shutdown signal: {e}")
        );
        std::future::pending::<()>().await;
    }
}
