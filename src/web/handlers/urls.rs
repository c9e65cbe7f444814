//! # 站点处理器
//!
//! 首页表单、站点列表、站点详情与添加站点

use axum::extract::{Extension, Form, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use serde::Deserialize;

use super::{parse_url_id, url_location};
use crate::logging::{LogComponent, LogStage};
use crate::services::{self, AddUrlOutcome};
use crate::web::flash::{FlashMessage, redirect_with};
use crate::web::middleware::RequestId;
use crate::web::server::AppState;
use crate::web::{messages, response, views};
use crate::{ldebug, lerror, linfo};

/// 添加站点表单
#[derive(Debug, Deserialize)]
pub struct NewUrlForm {
    #[serde(default)]
    pub url: String,
}

/// `GET /`
pub async fn index(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Response {
    let flash = state.flash.read(&headers);
    response::render(
        &request_id,
        "index",
        StatusCode::OK,
        views::index_page(flash.as_ref(), ""),
        flash.is_some(),
    )
}

/// `GET /urls`
pub async fn list_urls(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Response {
    let items = match state.repository.list_urls().await {
        Ok(items) => items,
        Err(err) => return response::server_error(&request_id, "list_urls", &err),
    };

    let flash = state.flash.read(&headers);
    response::render(
        &request_id,
        "list_urls",
        StatusCode::OK,
        views::urls_page(flash.as_ref(), &items),
        flash.is_some(),
    )
}

/// `GET /urls/{id}`
pub async fn show_url(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let found = match parse_url_id(&raw_id) {
        Some(id) => state.repository.find_url_by_id(id).await,
        None => Ok(None),
    };

    let url = match found {
        Ok(Some(url)) => url,
        Ok(None) => {
            ldebug!(
                request_id,
                LogStage::Request,
                LogComponent::Handler,
                "show_url",
                &format!("Unknown url id {raw_id}")
            );
            return redirect_with(&state.flash, "/urls", &FlashMessage::danger(messages::PAGE_NOT_FOUND));
        }
        Err(err) => return response::server_error(&request_id, "show_url", &err),
    };

    let checks = match state.repository.list_checks(url.id).await {
        Ok(checks) => checks,
        Err(err) => return response::server_error(&request_id, "show_url", &err),
    };

    let flash = state.flash.read(&headers);
    response::render(
        &request_id,
        "show_url",
        StatusCode::OK,
        views::url_page(flash.as_ref(), &url, &checks),
        flash.is_some(),
    )
}

/// `POST /urls`
pub async fn create_url(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Form(form): Form<NewUrlForm>,
) -> Response {
    let input = form.url.trim();

    match services::add_url(&state.repository, input).await {
        Ok(AddUrlOutcome::Invalid(err)) => {
            // 输入错误属于正常流程，不记为系统错误
            ldebug!(
                request_id,
                LogStage::Validation,
                LogComponent::Handler,
                "create_url",
                &format!("Rejected url input: {err}")
            );
            let flash = FlashMessage::danger(err.to_string());
            response::render(
                &request_id,
                "create_url",
                StatusCode::UNPROCESSABLE_ENTITY,
                views::index_page(Some(&flash), input),
                false,
            )
        }
        Ok(AddUrlOutcome::Created(id)) => {
            linfo!(
                request_id,
                LogStage::Response,
                LogComponent::Handler,
                "create_url",
                &format!("Created url {id}")
            );
            redirect_with(
                &state.flash,
                &url_location(id),
                &FlashMessage::success(messages::PAGE_ADDED),
            )
        }
        Ok(AddUrlOutcome::Existing(id)) => redirect_with(
            &state.flash,
            &url_location(id),
            &FlashMessage::info(messages::PAGE_EXISTS),
        ),
        Err(err) => {
            lerror!(
                request_id,
                LogStage::Persistence,
                LogComponent::Handler,
                "create_url",
                &format!("Failed to add url: {err:?}")
            );
            let flash = FlashMessage::danger(messages::ADD_FAILED);
            response::render(
                &request_id,
                "create_url",
                StatusCode::INTERNAL_SERVER_ERROR,
                views::index_page(Some(&flash), input),
                false,
            )
        }
    }
}
