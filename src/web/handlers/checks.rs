//! 站点检查处理器

use axum::extract::{Extension, Path, State};
use axum::response::Response;

use super::{parse_url_id, url_location};
use crate::logging::{LogComponent, LogStage};
use crate::services::{self, CheckOutcome};
use crate::web::flash::{FlashMessage, redirect_with};
use crate::web::messages;
use crate::web::middleware::RequestId;
use crate::web::server::AppState;
use crate::{lerror, linfo};

/// `POST /urls/{id}/checks`
///
/// 无论检查结果如何都重定向，结果通过提示消息展示。
pub async fn create_check(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(url_id) = parse_url_id(&raw_id) else {
        return redirect_with(&state.flash, "/urls", &FlashMessage::danger(messages::SITE_NOT_FOUND));
    };

    let outcome = services::run_check(&state.repository, state.checker.as_ref(), url_id).await;
    let (location, message) = match outcome {
        Ok(CheckOutcome::UrlMissing) => (
            "/urls".to_string(),
            FlashMessage::danger(messages::SITE_NOT_FOUND),
        ),
        Ok(CheckOutcome::Stored(check)) => {
            linfo!(
                request_id,
                LogStage::Response,
                LogComponent::Handler,
                "create_check",
                &format!("Check {} stored for url {url_id}", check.id)
            );
            (url_location(url_id), FlashMessage::success(messages::CHECK_SUCCEEDED))
        }
        Ok(CheckOutcome::Failed(_)) => (
            url_location(url_id),
            FlashMessage::danger(messages::CHECK_FAILED),
        ),
        Err(err) => {
            lerror!(
                request_id,
                LogStage::Persistence,
                LogComponent::Handler,
                "create_check",
                &format!("Failed to save check for url {url_id}: {err:?}")
            );
            (url_location(url_id), FlashMessage::danger(messages::CHECK_SAVE_FAILED))
        }
    };

    redirect_with(&state.flash, &location, &message)
}
