//! Azure Speech - 端点、请求头与输出格式
//!
//! 合成与语音目录两个适配器共用

use serde::{Deserialize, Serialize};

use crate::domain::playback::AudioContainer;

/// 订阅密钥请求头
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// 输出格式请求头
pub const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";

/// SSML 请求体类型
pub const SSML_CONTENT_TYPE: &str = "application/ssml+xml";

const USER_AGENT: &str = concat!("readaloud/", env!("CARGO_PKG_VERSION"));

pub fn user_agent() -> &'static str {
    USER_AGENT
}

/// 服务端点
///
/// 默认按区域拼接 `https://{region}.tts.speech.microsoft.com`；
/// 设置 `base_url` 后所有请求改发到该地址（代理或本地 mock）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AzureEndpoint {
    base_url: Option<String>,
}

impl AzureEndpoint {
    pub fn regional() -> Self {
        Self { base_url: None }
    }

    pub fn custom(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: Some(base_url.trim_end_matches('/').to_string()),
        }
    }

    /// 空字符串视为未设置
    pub fn from_option(base_url: Option<&str>) -> Self {
        match base_url.map(str::trim).filter(|s| !s.is_empty()) {
            Some(url) => Self::custom(url),
            None => Self::regional(),
        }
    }

    fn base(&self, region: &str) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => format!("https://{}.tts.speech.microsoft.com", region),
        }
    }

    pub fn synthesis_url(&self, region: &str) -> String {
        format!("{}/cognitiveservices/v1", self.base(region))
    }

    pub fn voices_url(&self, region: &str) -> String {
        format!("{}/cognitiveservices/voices/list", self.base(region))
    }
}

/// 合成输出格式（`X-Microsoft-OutputFormat` 取值）
///
/// 只保留本地解码器支持的 RIFF PCM 与 MP3 格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AzureOutputFormat {
    #[serde(rename = "riff-16khz-16bit-mono-pcm")]
    Riff16Khz16BitMonoPcm,
    #[default]
    #[serde(rename = "riff-24khz-16bit-mono-pcm")]
    Riff24Khz16BitMonoPcm,
    #[serde(rename = "riff-48khz-16bit-mono-pcm")]
    Riff48Khz16BitMonoPcm,
    #[serde(rename = "audio-16khz-32kbitrate-mono-mp3")]
    Audio16Khz32KbitrateMonoMp3,
    #[serde(rename = "audio-24khz-48kbitrate-mono-mp3")]
    Audio24Khz48KbitrateMonoMp3,
    #[serde(rename = "audio-24khz-96kbitrate-mono-mp3")]
    Audio24Khz96KbitrateMonoMp3,
    #[serde(rename = "audio-48khz-96kbitrate-mono-mp3")]
    Audio48Khz96KbitrateMonoMp3,
}

impl AzureOutputFormat {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Riff16Khz16BitMonoPcm => "riff-16khz-16bit-mono-pcm",
            Self::Riff24Khz16BitMonoPcm => "riff-24khz-16bit-mono-pcm",
            Self::Riff48Khz16BitMonoPcm => "riff-48khz-16bit-mono-pcm",
            Self::Audio16Khz32KbitrateMonoMp3 => "audio-16khz-32kbitrate-mono-mp3",
            Self::Audio24Khz48KbitrateMonoMp3 => "audio-24khz-48kbitrate-mono-mp3",
            Self::Audio24Khz96KbitrateMonoMp3 => "audio-24khz-96kbitrate-mono-mp3",
            Self::Audio48Khz96KbitrateMonoMp3 => "audio-48khz-96kbitrate-mono-mp3",
        }
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        match self {
            Self::Riff16Khz16BitMonoPcm | Self::Audio16Khz32KbitrateMonoMp3 => 16000,
            Self::Riff24Khz16BitMonoPcm
            | Self::Audio24Khz48KbitrateMonoMp3
            | Self::Audio24Khz96KbitrateMonoMp3 => 24000,
            Self::Riff48Khz16BitMonoPcm | Self::Audio48Khz96KbitrateMonoMp3 => 48000,
        }
    }

    #[inline]
    pub fn container(&self) -> AudioContainer {
        match self {
            Self::Riff16Khz16BitMonoPcm
            | Self::Riff24Khz16BitMonoPcm
            | Self::Riff48Khz16BitMonoPcm => AudioContainer::Wav,
            _ => AudioContainer::Mp3,
        }
    }
}

impl std::fmt::Display for AzureOutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 非 2xx 响应的错误正文可能很长，日志和提示只保留开头
pub(crate) fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
