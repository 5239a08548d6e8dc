//! Voice Catalog Port - 语音目录抽象

use async_trait::async_trait;
use thiserror::Error;

use super::settings::SpeechCredentials;
use crate::domain::voice::VoiceDescriptor;

/// 语音目录错误
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Missing speech credentials: {0}")]
    MissingCredentials(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Voice Catalog Port
#[async_trait]
pub trait VoiceCatalogPort: Send + Sync {
    /// 拉取全部可用语音（一次网络往返）
    async fn list_voices(
        &self,
        credentials: &SpeechCredentials,
    ) -> Result<Vec<VoiceDescriptor>, CatalogError>;
}
