//! Status Notifier Port - 状态栏与用户提示抽象

use serde::Serialize;

/// 播放指示器（对应状态栏按钮）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackIndicator {
    /// 空闲，可以开始朗读
    Ready,
    /// 正在等待合成
    Loading,
    Playing,
    Paused,
}

impl PlaybackIndicator {
    /// 状态栏图标：可播放时显示 ▶️，播放中显示 ⏸️
    pub fn glyph(&self) -> &'static str {
        match self {
            PlaybackIndicator::Ready | PlaybackIndicator::Paused => "▶️",
            PlaybackIndicator::Loading | PlaybackIndicator::Playing => "⏸️",
        }
    }
}

/// 用户提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Notice {
    Paused,
    Resumed,
    /// 清洗后没有可朗读内容
    EmptyContent,
    ReadError(String),
    SynthesisError(String),
    CatalogUnavailable(String),
    PlaybackBackendError(String),
}

impl Notice {
    /// 面向用户的提示文本
    pub fn message(&self) -> String {
        match self {
            Notice::Paused => "Playback paused".to_string(),
            Notice::Resumed => "Playback resumed".to_string(),
            Notice::EmptyContent => "Nothing to read: the note is empty".to_string(),
            Notice::ReadError(detail) => format!("Could not read the note: {}", detail),
            Notice::SynthesisError(detail) => format!("Text-to-speech failed: {}", detail),
            Notice::CatalogUnavailable(detail) => {
                format!("Could not load the voice list: {}", detail)
            }
            Notice::PlaybackBackendError(detail) => format!("Audio playback failed: {}", detail),
        }
    }

    /// 是否为错误类提示
    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Paused | Notice::Resumed)
    }
}

/// Status Notifier Port
///
/// 同步、非阻塞；实现方不得在内部等待 UI
pub trait StatusNotifierPort: Send + Sync {
    fn set_indicator(&self, indicator: PlaybackIndicator);

    fn notify(&self, notice: Notice);
}
