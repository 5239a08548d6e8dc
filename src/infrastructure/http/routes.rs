//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                GET   健康检查
//! - /api/playback/toggle     POST  播放/暂停切换（text 或 document）
//! - /api/playback/stop       POST  立即停止
//! - /api/playback/status     GET   当前播放状态
//! - /api/voices/list         GET   过滤后的语音列表（?locale=&gender=）
//! - /api/voices/refresh      POST  重新拉取语音目录
//! - /api/voices/options      GET   目录中的区域与性别选项
//! - /api/settings            GET   当前配置（密钥遮蔽）
//! - /api/settings/update     POST  更新并保存配置
//! - /ws/events               WS    状态栏事件流

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::error::ApiError;
use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
        .fallback(not_found)
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/playback", playback_routes())
        .nest("/voices", voice_routes())
        .route("/settings", get(handlers::get_settings))
        .route("/settings/update", post(handlers::update_settings))
}

/// Playback 路由
fn playback_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/toggle", post(handlers::toggle))
        .route("/stop", post(handlers::stop))
        .route("/status", get(handlers::playback_status))
}

/// Voice 路由
fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(handlers::list_voices))
        .route("/refresh", post(handlers::refresh_voices))
        .route("/options", get(handlers::voice_options))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("No such endpoint".to_string())
}
