//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::ports::{mask_secret, PlaybackIndicator, SpeechSettings};
use crate::application::ToggleAction;
use crate::domain::playback::PlaybackState;
use crate::domain::voice::{VoiceDescriptor, VoiceFilter};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Playback DTOs
// ============================================================================

/// 切换请求：直接给出文本，或给出文档路径
#[derive(Debug, Default, Deserialize)]
pub struct ToggleRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub action: ToggleAction,
    pub state: PlaybackState,
    pub indicator: PlaybackIndicator,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    /// 是否确实中断了播放或合成
    pub stopped: bool,
    pub state: PlaybackState,
}

#[derive(Debug, Serialize)]
pub struct PlaybackStatusResponse {
    pub state: PlaybackState,
    pub indicator: PlaybackIndicator,
    pub glyph: &'static str,
    /// 当前朗读使用的语音
    pub voice: Option<String>,
    /// 当前朗读文本的字符数
    pub characters: Option<usize>,
}

// ============================================================================
// Voice DTOs
// ============================================================================

/// 语音列表查询；缺省的字段使用当前配置中的过滤条件
#[derive(Debug, Default, Deserialize)]
pub struct VoiceListQuery {
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl VoiceListQuery {
    pub fn resolve(&self, settings: &SpeechSettings) -> VoiceFilter {
        VoiceFilter::new(
            self.locale
                .clone()
                .unwrap_or_else(|| settings.locale_filter.clone()),
            self.gender
                .clone()
                .unwrap_or_else(|| settings.gender_filter.clone()),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct VoiceListResponse {
    pub voices: Vec<VoiceDescriptor>,
    pub total: usize,
    /// 当前选中的语音
    pub selected: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceOptionsResponse {
    pub locales: Vec<String>,
    pub genders: Vec<String>,
}

// ============================================================================
// Settings DTOs
// ============================================================================

/// 对外展示的配置，密钥只保留末 4 位
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub api_key: String,
    pub has_api_key: bool,
    pub region: String,
    pub voice: String,
    pub locale_filter: String,
    pub gender_filter: String,
}

impl From<&SpeechSettings> for SettingsResponse {
    fn from(settings: &SpeechSettings) -> Self {
        Self {
            api_key: mask_secret(&settings.api_key),
            has_api_key: !settings.api_key.trim().is_empty(),
            region: settings.region.clone(),
            voice: settings.voice.clone(),
            locale_filter: settings.locale_filter.clone(),
            gender_filter: settings.gender_filter.clone(),
        }
    }
}

/// 部分更新：未提供的字段保持不变
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub locale_filter: Option<String>,
    #[serde(default)]
    pub gender_filter: Option<String>,
}

impl UpdateSettingsRequest {
    pub fn apply(self, mut settings: SpeechSettings) -> SpeechSettings {
        if let Some(api_key) = self.api_key {
            settings.api_key = api_key.trim().to_string();
        }
        if let Some(region) = self.region {
            settings.region = region.trim().to_string();
        }
        if let Some(voice) = self.voice {
            settings.voice = voice.trim().to_string();
        }
        if let Some(locale) = self.locale_filter {
            settings.locale_filter = locale;
        }
        if let Some(gender) = self.gender_filter {
            settings.gender_filter = gender;
        }
        settings
    }
}
