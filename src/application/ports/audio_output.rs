//! Audio Output Port - 本地音频输出抽象
//!
//! 一个 AudioHandle 对应一份已缓冲的音频资源，
//! PlaybackEngine 通过它完成播放/暂停/停止

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::playback::AudioPayload;

/// 音频输出错误
#[derive(Debug, Error)]
pub enum AudioOutputError {
    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Audio device error: {0}")]
    DeviceError(String),

    #[error("Unsupported audio: {0}")]
    Unsupported(String),
}

/// 播放自然结束信号
///
/// 音频被完整播放后发送；被 stop 或 drop 时发送端被丢弃，接收端得到 `Err`
pub type PlaybackEnded = oneshot::Receiver<()>;

/// 已打开的音频资源
///
/// 创建后处于暂停状态，需调用 `play` 开始输出。drop 时必须释放底层资源。
pub trait AudioHandle: Send {
    fn play(&mut self);

    fn pause(&mut self);

    /// 停止输出并释放缓冲
    fn stop(&mut self);

    /// 取走结束信号（只能取一次）
    fn on_end(&mut self) -> Option<PlaybackEnded>;
}

/// Audio Output Port
#[async_trait]
pub trait AudioOutputPort: Send + Sync {
    /// 解码并缓冲音频，返回处于暂停状态的句柄
    async fn open(&self, payload: &AudioPayload) -> Result<Box<dyn AudioHandle>, AudioOutputError>;
}
