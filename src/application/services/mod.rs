//! Application Services - 用例编排
//!
//! - PlaybackEngine: 播放状态机，独占音频资源
//! - PlaybackController: 播放/暂停切换与状态提示
//! - VoiceCatalogService: 语音目录拉取与过滤视图

mod playback_controller;
mod playback_engine;
mod voice_catalog;

#[cfg(test)]
pub(crate) mod test_support;

pub use playback_controller::{PlaybackController, ToggleAction};
pub use playback_engine::{PlayOutcome, PlaybackEngine, PlaybackHooks};
pub use voice_catalog::VoiceCatalogService;
