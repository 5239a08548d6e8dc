//! Settings Port - 用户配置抽象
//!
//! 配置是外部持久化的；每次读取都返回当前快照，调用方不应缓存

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::voice::VoiceFilter;

/// 默认语音
pub const DEFAULT_VOICE: &str = "en-US-AriaNeural";

/// 默认区域
pub const DEFAULT_REGION: &str = "eastus";

/// 配置错误
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Failed to persist settings: {0}")]
    PersistError(String),
}

/// 远端服务凭据
#[derive(Clone, PartialEq, Eq)]
pub struct SpeechCredentials {
    pub api_key: String,
    pub region: String,
}

impl SpeechCredentials {
    pub fn new(api_key: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            region: region.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.region.trim().is_empty()
    }
}

impl std::fmt::Debug for SpeechCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechCredentials")
            .field("api_key", &mask_secret(&self.api_key))
            .field("region", &self.region)
            .finish()
    }
}

/// 朗读相关的用户配置
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// 订阅密钥
    #[serde(default)]
    pub api_key: String,

    /// 服务区域，如 `eastus`
    #[serde(default = "default_region")]
    pub region: String,

    /// 语音 short name
    #[serde(default = "default_voice")]
    pub voice: String,

    /// 语音列表的区域过滤（空表示不限）
    #[serde(default)]
    pub locale_filter: String,

    /// 语音列表的性别过滤（空表示不限）
    #[serde(default)]
    pub gender_filter: String,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            region: default_region(),
            voice: default_voice(),
            locale_filter: String::new(),
            gender_filter: String::new(),
        }
    }
}

impl SpeechSettings {
    pub fn credentials(&self) -> SpeechCredentials {
        SpeechCredentials::new(self.api_key.clone(), self.region.clone())
    }

    pub fn voice_filter(&self) -> VoiceFilter {
        VoiceFilter::new(self.locale_filter.clone(), self.gender_filter.clone())
    }

    /// 校验可保存的配置
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.voice.trim().is_empty() {
            return Err(SettingsError::Invalid("voice cannot be empty".to_string()));
        }
        if self.region.trim().is_empty() {
            return Err(SettingsError::Invalid("region cannot be empty".to_string()));
        }
        if self.region.contains(|c: char| !c.is_ascii_alphanumeric()) {
            return Err(SettingsError::Invalid(format!(
                "region must be alphanumeric: {}",
                self.region
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SpeechSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSettings")
            .field("api_key", &mask_secret(&self.api_key))
            .field("region", &self.region)
            .field("voice", &self.voice)
            .field("locale_filter", &self.locale_filter)
            .field("gender_filter", &self.gender_filter)
            .finish()
    }
}

/// 遮蔽密钥，只保留末 4 位
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

/// Settings Port
pub trait SettingsPort: Send + Sync {
    /// 当前配置快照
    fn current(&self) -> SpeechSettings;

    /// 校验、更新并持久化
    fn update(&self, settings: SpeechSettings) -> Result<(), SettingsError>;
}
