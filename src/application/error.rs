//! 应用层错误定义
//!
//! 所有错误都可恢复：在控制器边界转换为用户提示，不会使进程退出

use thiserror::Error;

use crate::application::ports::{
    AudioOutputError, CatalogError, Notice, SettingsError, SynthesisError, TextSourceError,
};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 读取当前文档失败
    #[error("Failed to read document: {0}")]
    ReadError(String),

    /// 清洗后没有可朗读内容
    #[error("Nothing to read: content is empty after sanitization")]
    EmptyContent,

    /// 远端合成失败
    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    /// 语音目录不可用
    #[error("Voice catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// 本地音频资源初始化失败
    #[error("Audio playback backend error: {0}")]
    PlaybackBackendError(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// 对应的用户提示
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::ReadError(msg) => Some(Notice::ReadError(msg.clone())),
            Self::EmptyContent => Some(Notice::EmptyContent),
            Self::SynthesisFailed(msg) => Some(Notice::SynthesisError(msg.clone())),
            Self::CatalogUnavailable(msg) => Some(Notice::CatalogUnavailable(msg.clone())),
            Self::PlaybackBackendError(msg) => Some(Notice::PlaybackBackendError(msg.clone())),
            Self::ValidationError(_) | Self::InternalError(_) => None,
        }
    }
}

impl From<SynthesisError> for ApplicationError {
    fn from(err: SynthesisError) -> Self {
        Self::SynthesisFailed(err.to_string())
    }
}

impl From<AudioOutputError> for ApplicationError {
    fn from(err: AudioOutputError) -> Self {
        Self::PlaybackBackendError(err.to_string())
    }
}

impl From<TextSourceError> for ApplicationError {
    fn from(err: TextSourceError) -> Self {
        Self::ReadError(err.to_string())
    }
}

impl From<CatalogError> for ApplicationError {
    fn from(err: CatalogError) -> Self {
        Self::CatalogUnavailable(err.to_string())
    }
}

impl From<SettingsError> for ApplicationError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Invalid(msg) => Self::ValidationError(msg),
            SettingsError::PersistError(msg) => Self::InternalError(msg),
        }
    }
}
