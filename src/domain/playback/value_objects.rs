//! Playback Context - Value Objects

use serde::{Deserialize, Serialize};

/// 待朗读的语句
///
/// 清洗后的文本 + 选定的语音，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    text: String,
    voice: String,
}

impl Utterance {
    pub fn new(text: impl Into<String>, voice: impl Into<String>) -> Result<Self, &'static str> {
        let text = text.into();
        let voice = voice.into();
        if text.trim().is_empty() {
            return Err("朗读文本不能为空");
        }
        if voice.trim().is_empty() {
            return Err("语音标识不能为空");
        }
        Ok(Self { text, voice })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// 从语音 short name 推导 BCP-47 语言标签（`pt-BR-FranciscaNeural` -> `pt-BR`）
    pub fn language(&self) -> String {
        let mut parts = self.voice.splitn(3, '-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(lang), Some(region), Some(_)) => format!("{}-{}", lang, region),
            _ => "en-US".to_string(),
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// 音频容器格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioContainer {
    Wav,
    Mp3,
}

impl AudioContainer {
    /// 文件扩展名（用作解码提示）
    pub fn extension(&self) -> &'static str {
        match self {
            AudioContainer::Wav => "wav",
            AudioContainer::Mp3 => "mp3",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioContainer::Wav => "audio/wav",
            AudioContainer::Mp3 => "audio/mpeg",
        }
    }
}

/// 合成后的音频数据
///
/// 由 PlaybackEngine 独占，任一时刻最多存在一份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    data: Vec<u8>,
    container: AudioContainer,
    sample_rate: Option<u32>,
}

impl AudioPayload {
    pub fn new(data: Vec<u8>, container: AudioContainer) -> Self {
        Self {
            data,
            container,
            sample_rate: None,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn container(&self) -> AudioContainer {
        self.container
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
