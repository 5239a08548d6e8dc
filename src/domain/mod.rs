//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Playback Context: 播放状态与朗读数据
//! - Voice Context: 语音目录过滤
//!
//! 以及共享的文本清洗器

pub mod playback;
pub mod voice;

mod text_sanitizer;

pub use text_sanitizer::sanitize;
