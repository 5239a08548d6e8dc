//! Playback Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{
    ApiResponse, PlaybackStatusResponse, StopResponse, ToggleRequest, ToggleResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 播放/暂停切换
///
/// 播放中或暂停中时请求体内容被忽略；否则朗读 `text`，或读取 `document` 后朗读
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ApiResponse<ToggleResponse>>, ApiError> {
    let action = match (req.text, req.document) {
        (Some(_), Some(_)) => {
            return Err(ApiError::BadRequest(
                "Provide either text or document, not both".to_string(),
            ))
        }
        (None, Some(document)) => state.controller.toggle_document(&document).await?,
        (text, None) => {
            state
                .controller
                .toggle(text.as_deref().unwrap_or_default())
                .await?
        }
    };

    Ok(Json(ApiResponse::success(ToggleResponse {
        action,
        state: state.controller.engine().state(),
        indicator: state.event_publisher.last_indicator(),
    })))
}

/// 立即停止，包括正在合成的请求
pub async fn stop(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StopResponse>> {
    let stopped = state.controller.force_stop();

    Json(ApiResponse::success(StopResponse {
        stopped,
        state: state.controller.engine().state(),
    }))
}

pub async fn playback_status(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<PlaybackStatusResponse>> {
    let engine = state.controller.engine();
    let utterance = engine.current_utterance();
    let indicator = state.event_publisher.last_indicator();

    Json(ApiResponse::success(PlaybackStatusResponse {
        state: engine.state(),
        indicator,
        glyph: indicator.glyph(),
        voice: utterance.as_ref().map(|u| u.voice().to_string()),
        characters: utterance.as_ref().map(|u| u.text().chars().count()),
    }))
}
