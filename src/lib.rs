//! Readaloud - 文档朗读播放控制
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Playback Context: 播放状态、朗读请求与音频数据
//! - Voice Context: 语音描述与过滤
//! - 文本清洗器: Markdown/HTML/emoji 清洗为可朗读的纯文本
//!
//! 应用层 (application/):
//! - Ports: SpeechSynthesizer, VoiceCatalog, AudioOutput, StatusNotifier, Settings, TextSource
//! - Services: PlaybackEngine（状态机）, PlaybackController（toggle / force stop）, VoiceCatalogService
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Azure TTS / 语音列表客户端, rodio 与静音音频输出, 文件文本源
//! - Events: 状态栏事件广播
//! - Settings: 朗读配置的持久化
//! - HTTP: 控制 API + WebSocket

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
