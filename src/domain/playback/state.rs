//! Playback Context - 播放状态机

use serde::{Deserialize, Serialize};

/// 播放状态
///
/// 合法迁移：
/// ```text
/// Idle -> Loading -> Playing <-> Paused
///                    Playing -> Completed -> Idle
///         Loading -> Failed -> Idle
/// Loading | Playing | Paused -> Idle   (stop / 新请求拆除)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// 无活动资源
    #[default]
    Idle,
    /// 等待合成结果
    Loading,
    Playing,
    Paused,
    /// 自然播放结束（短暂状态，随后回到 Idle）
    Completed,
    /// 合成或音频资源失败（短暂状态，随后回到 Idle）
    Failed,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Loading => "loading",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Completed => "completed",
            PlaybackState::Failed => "failed",
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackState::Paused)
    }

    /// 当前是否持有（或正在获取）音频资源
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PlaybackState::Loading | PlaybackState::Playing | PlaybackState::Paused
        )
    }

    /// 检查状态迁移是否合法
    pub fn can_transition_to(&self, next: PlaybackState) -> bool {
        use PlaybackState::*;

        matches!(
            (self, next),
            (Idle, Loading)
                | (Loading, Playing)
                | (Loading, Failed)
                | (Loading, Idle)
                | (Playing, Paused)
                | (Paused, Playing)
                | (Playing, Completed)
                | (Playing, Idle)
                | (Paused, Idle)
                | (Completed, Idle)
                | (Failed, Idle)
        )
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
