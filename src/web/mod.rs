//! # Web 层
//!
//! HTML 页面、表单处理与提示消息

pub mod flash;
pub mod handlers;
pub mod messages;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod views;

pub use server::{AppState, WebServer, create_router};
