//! Speech Synthesizer Port - 语音合成抽象
//!
//! 定义文本到音频的远端合成接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::playback::{AudioPayload, Utterance};

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Missing speech credentials: {0}")]
    MissingCredentials(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Service error (HTTP {status}): {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Response stream interrupted: {0}")]
    Cancelled(String),
}

/// Speech Synthesizer Port
///
/// 每次调用对应一次远端请求，不做排队与重试
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// 合成一段语句，返回完整的音频数据
    async fn synthesize(&self, utterance: &Utterance) -> Result<AudioPayload, SynthesisError>;
}
