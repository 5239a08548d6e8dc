//! File Text Source - 从文件系统读取文档
//!
//! 实现 TextSourcePort trait

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::application::ports::{TextSourceError, TextSourcePort};

/// 文件系统文档源
pub struct FileTextSource {
    /// 文档根目录；为空时接受任意路径
    root: Option<PathBuf>,
}

impl FileTextSource {
    /// 不限制目录
    pub fn unrestricted() -> Self {
        Self { root: None }
    }

    /// 只允许读取 `root` 下的相对路径
    pub fn rooted(root: impl AsRef<Path>) -> Self {
        Self {
            root: Some(root.as_ref().to_path_buf()),
        }
    }

    fn resolve(&self, document: &str) -> Result<PathBuf, TextSourceError> {
        let trimmed = document.trim();
        if trimmed.is_empty() {
            return Err(TextSourceError::InvalidPath("empty path".to_string()));
        }

        let path = Path::new(trimmed);
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(TextSourceError::InvalidPath(format!(
                "parent directory components are not allowed: {}",
                trimmed
            )));
        }

        match &self.root {
            Some(_) if path.is_absolute() => Err(TextSourceError::InvalidPath(format!(
                "absolute paths are not allowed: {}",
                trimmed
            ))),
            Some(root) => Ok(root.join(path)),
            None => Ok(path.to_path_buf()),
        }
    }
}

#[async_trait]
impl TextSourcePort for FileTextSource {
    async fn read(&self, document: &str) -> Result<String, TextSourceError> {
        let path = self.resolve(document)?;

        let bytes = fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TextSourceError::NotFound(document.to_string()),
            _ => TextSourceError::IoError(e.to_string()),
        })?;

        let text = String::from_utf8(bytes)
            .map_err(|e| TextSourceError::InvalidEncoding(format!("{}: {}", document, e)))?;

        tracing::debug!(path = %path.display(), chars = text.chars().count(), "Document read");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_rooted_document() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("notes")).unwrap();
        std::fs::write(dir.path().join("notes/today.md"), "# Hoje\n\nolá").unwrap();

        let source = FileTextSource::rooted(dir.path());
        let text = source.read("notes/today.md").await.unwrap();

        assert_eq!(text, "# Hoje\n\nolá");
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let dir = TempDir::new().unwrap();
        let source = FileTextSource::rooted(dir.path());

        assert!(matches!(
            source.read("../secret.md").await,
            Err(TextSourceError::InvalidPath(_))
        ));
        assert!(matches!(
            source.read("/etc/hostname").await,
            Err(TextSourceError::InvalidPath(_))
        ));
        assert!(matches!(
            source.read("  ").await,
            Err(TextSourceError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_document() {
        let dir = TempDir::new().unwrap();
        let source = FileTextSource::rooted(dir.path());

        assert!(matches!(
            source.read("nope.md").await,
            Err(TextSourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.md");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let source = FileTextSource::unrestricted();
        let result = source.read(path.to_str().unwrap()).await;

        assert!(matches!(result, Err(TextSourceError::InvalidEncoding(_))));
    }
}
