//! Configuration Types
//!
//! 定义所有配置结构体

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::ports::SpeechSettings;
use crate::infrastructure::adapters::AzureOutputFormat;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 朗读配置（密钥、区域、语音、过滤条件），可通过 API 修改并持久化
    #[serde(default)]
    pub speech: SpeechSettings,

    /// 合成后端配置
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 音频输出配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 文档读取配置
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// 配置持久化
    #[serde(default)]
    pub settings: SettingsFileConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 合成后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisBackend {
    /// Azure Speech REST
    #[default]
    Azure,
    /// 本地生成静音，不访问网络
    Fake,
}

/// 合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default)]
    pub backend: SynthesisBackend,

    /// Azure 输出格式
    #[serde(default)]
    pub output_format: AzureOutputFormat,

    /// 请求超时时间（秒）
    #[serde(default = "default_synthesis_timeout")]
    pub timeout_secs: u64,

    /// 覆盖 Azure 端点（代理或测试），为空时按区域拼接
    #[serde(default)]
    pub endpoint: Option<String>,

    /// fake 后端的模拟延迟（毫秒）
    #[serde(default = "default_fake_latency")]
    pub fake_latency_ms: u64,

    /// fake 后端固定返回的 WAV 文件
    #[serde(default)]
    pub fake_audio_file: Option<PathBuf>,
}

fn default_synthesis_timeout() -> u64 {
    30
}

fn default_fake_latency() -> u64 {
    200
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            backend: SynthesisBackend::default(),
            output_format: AzureOutputFormat::default(),
            timeout_secs: default_synthesis_timeout(),
            endpoint: None,
            fake_latency_ms: default_fake_latency(),
            fake_audio_file: None,
        }
    }
}

/// 音频输出后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioBackend {
    /// 优先使用声卡，打开失败时退回 silent
    #[default]
    Auto,
    Rodio,
    /// 只计时不发声
    Silent,
}

/// 音频输出配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    #[serde(default)]
    pub backend: AudioBackend,

    /// 音量 0.0 ~ 1.0
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_volume() -> f32 {
    1.0
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            backend: AudioBackend::default(),
            volume: default_volume(),
        }
    }
}

/// 文档读取配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentsConfig {
    /// 文档根目录；设置后只能读取该目录下的相对路径
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// 配置持久化
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsFileConfig {
    /// 通过 API 修改的朗读配置写入该文件（TOML，`[speech]` 表）
    #[serde(default = "default_settings_path")]
    pub path: PathBuf,
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("data/settings.toml")
}

impl Default for SettingsFileConfig {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
