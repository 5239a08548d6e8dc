//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 持久化的朗读配置（settings.path 指向的文件）
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError as ConfigCrateError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, AudioBackend, SynthesisBackend};
use crate::application::ports::{mask_secret, SpeechSettings, DEFAULT_REGION, DEFAULT_VOICE};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Failed to save settings: {0}")]
    SaveError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "READALOUD";

/// 加载应用配置
///
/// # 环境变量示例
/// - `READALOUD_SERVER__PORT=8080`
/// - `READALOUD_SPEECH__API_KEY=...`
/// - `READALOUD_SPEECH__REGION=brazilsouth`
/// - `READALOUD_SYNTHESIS__BACKEND=fake`
/// - `READALOUD_AUDIO__BACKEND=silent`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    // 先不带持久化配置解析一次，得到 settings.path
    let base: AppConfig = builder(config_path, None)?
        .build()?
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    let config = builder(config_path, Some(&base.settings.path))?.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

fn builder(
    config_path: Option<&Path>,
    settings_path: Option<&Path>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    // 1. 默认值（最低优先级）
    let mut builder = Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 5070)?
        .set_default("speech.api_key", "")?
        .set_default("speech.region", DEFAULT_REGION)?
        .set_default("speech.voice", DEFAULT_VOICE)?
        .set_default("speech.locale_filter", "")?
        .set_default("speech.gender_filter", "")?
        .set_default("synthesis.backend", "azure")?
        .set_default("synthesis.output_format", "riff-24khz-16bit-mono-pcm")?
        .set_default("synthesis.timeout_secs", 30)?
        .set_default("synthesis.fake_latency_ms", 200)?
        .set_default("audio.backend", "auto")?
        .set_default("audio.volume", 1.0)?
        .set_default("settings.path", "data/settings.toml")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 通过 API 保存的朗读配置
    if let Some(path) = settings_path {
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
    }

    // 4. 环境变量（最高优先级）
    // 层级分隔符: __ (双下划线)，例如 READALOUD_SPEECH__VOICE=pt-BR-FranciscaNeural
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    Ok(builder)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    config
        .speech
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    if config.synthesis.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Synthesis timeout cannot be 0".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&config.audio.volume) {
        return Err(ConfigError::ValidationError(format!(
            "Audio volume must be between 0.0 and 1.0, got {}",
            config.audio.volume
        )));
    }

    if config.settings.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Settings path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 持久化文件结构
#[derive(Serialize, Deserialize)]
struct PersistedSettings {
    speech: SpeechSettings,
}

/// 保存朗读配置
///
/// 先写临时文件再重命名，避免写到一半的文件被下次启动读到
pub fn save_settings(path: &Path, settings: &SpeechSettings) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(&PersistedSettings {
        speech: settings.clone(),
    })
    .map_err(|e| ConfigError::SaveError(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError(e.to_string()))?;
    }

    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| ConfigError::SaveError(e.to_string()))?;

    tracing::debug!(path = %path.display(), "Settings saved");
    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    let api_key = if config.speech.api_key.is_empty() {
        "<not set>".to_string()
    } else {
        mask_secret(&config.speech.api_key)
    };

    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Speech Region: {}", config.speech.region);
    tracing::info!("Speech Voice: {}", config.speech.voice);
    tracing::info!("Speech API Key: {}", api_key);
    match config.synthesis.backend {
        SynthesisBackend::Azure => {
            tracing::info!("Synthesis: azure ({})", config.synthesis.output_format);
            if let Some(endpoint) = &config.synthesis.endpoint {
                tracing::info!("Synthesis Endpoint: {}", endpoint);
            }
            tracing::info!("Synthesis Timeout: {}s", config.synthesis.timeout_secs);
        }
        SynthesisBackend::Fake => {
            tracing::info!("Synthesis: fake ({}ms latency)", config.synthesis.fake_latency_ms);
        }
    }
    let audio = match config.audio.backend {
        AudioBackend::Auto => "auto",
        AudioBackend::Rodio => "rodio",
        AudioBackend::Silent => "silent",
    };
    tracing::info!("Audio: {} (volume {:.2})", audio, config.audio.volume);
    if let Some(root) = &config.documents.root {
        tracing::info!("Documents Root: {:?}", root);
    }
    tracing::info!("Settings File: {:?}", config.settings.path);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
