//! Voice Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::infrastructure::http::dto::{
    ApiResponse, VoiceListQuery, VoiceListResponse, VoiceOptionsResponse,
};
use crate::infrastructure::http::state::AppState;

/// 列出语音
///
/// 查询参数覆盖配置中的同名过滤条件；目录不可用时返回空列表
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VoiceListQuery>,
) -> Json<ApiResponse<VoiceListResponse>> {
    let settings = state.settings.current();
    let voices = state.catalog.filtered_with(&query.resolve(&settings));

    Json(ApiResponse::success(VoiceListResponse {
        total: voices.len(),
        voices,
        selected: settings.voice,
    }))
}

/// 使用当前凭据重新拉取语音目录
pub async fn refresh_voices(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<VoiceListResponse>> {
    state.catalog.refresh().await;
    let voices = state.catalog.filtered();

    Json(ApiResponse::success(VoiceListResponse {
        total: voices.len(),
        voices,
        selected: state.settings.current().voice,
    }))
}

pub async fn voice_options(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<VoiceOptionsResponse>> {
    Json(ApiResponse::success(VoiceOptionsResponse {
        locales: state.catalog.locales(),
        genders: state.catalog.genders(),
    }))
}
