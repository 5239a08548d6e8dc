//! Settings Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{ApiResponse, SettingsResponse, UpdateSettingsRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SettingsResponse>> {
    let settings = state.settings.current();
    Json(ApiResponse::success(SettingsResponse::from(&settings)))
}

/// 更新配置
///
/// 凭据变化后在后台刷新语音目录
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<SettingsResponse>>, ApiError> {
    let previous = state.settings.current();
    let updated = req.apply(previous.clone());

    state.settings.update(updated.clone())?;

    if updated.credentials() != previous.credentials() {
        let catalog = Arc::clone(&state.catalog);
        tokio::spawn(async move {
            catalog.refresh().await;
        });
    }

    Ok(Json(ApiResponse::success(SettingsResponse::from(&updated))))
}
