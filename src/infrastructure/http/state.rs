//! Application State
//!
//! HTTP 处理器共享的服务与端口

use std::sync::Arc;

use crate::application::{PlaybackController, SettingsPort, VoiceCatalogService};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    pub controller: Arc<PlaybackController>,
    pub catalog: Arc<VoiceCatalogService>,
    pub settings: Arc<dyn SettingsPort>,
    pub event_publisher: Arc<EventPublisher>,
}

impl AppState {
    pub fn new(
        controller: Arc<PlaybackController>,
        catalog: Arc<VoiceCatalogService>,
        settings: Arc<dyn SettingsPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            controller,
            catalog,
            settings,
            event_publisher,
        }
    }
}
