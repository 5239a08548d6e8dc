//! Text Source Port - 文档读取抽象

use async_trait::async_trait;
use thiserror::Error;

/// 文档读取错误
#[derive(Debug, Error)]
pub enum TextSourceError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document path rejected: {0}")]
    InvalidPath(String),

    #[error("Document is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Text Source Port
#[async_trait]
pub trait TextSourcePort: Send + Sync {
    /// 读取文档全文
    async fn read(&self, document: &str) -> Result<String, TextSourceError>;
}
