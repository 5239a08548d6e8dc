//! Fake TTS Client - 不访问网络的合成器
//!
//! 返回固定的音频文件，或按文本长度生成静音 WAV

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::ports::{SpeechSynthesizerPort, SynthesisError};
use crate::domain::playback::{AudioContainer, AudioPayload, Utterance};
use crate::infrastructure::adapters::audio::wav::{parse_wav_info, silent_wav};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 固定返回的 WAV 文件；为空时生成静音
    pub audio_file_path: Option<PathBuf>,
    /// 模拟合成延迟（毫秒）
    pub latency_ms: u64,
    /// 生成静音的采样率
    pub sample_rate: u32,
    /// 每个字符对应的朗读时长（毫秒）
    pub ms_per_char: u64,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            audio_file_path: None,
            latency_ms: 200,
            sample_rate: 16000,
            ms_per_char: 60,
        }
    }
}

impl FakeTtsClientConfig {
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = ms;
        self
    }

    pub fn with_audio_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.audio_file_path = Some(path.into());
        self
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    /// 缓存的固定音频
    audio_data: Option<Vec<u8>>,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Result<Self, SynthesisError> {
        let audio_data = match &config.audio_file_path {
            Some(path) => {
                let data = std::fs::read(path).map_err(|e| {
                    SynthesisError::InvalidResponse(format!("{}: {}", path.display(), e))
                })?;
                parse_wav_info(&data)
                    .map_err(|e| SynthesisError::InvalidResponse(e.to_string()))?;
                Some(data)
            }
            None => None,
        };

        tracing::info!(
            path = ?config.audio_file_path,
            latency_ms = config.latency_ms,
            "FakeTtsClient initialized"
        );
        Ok(Self { config, audio_data })
    }

    fn duration_ms(&self, utterance: &Utterance) -> u64 {
        (utterance.char_count() as u64 * self.config.ms_per_char).clamp(100, 30_000)
    }
}

#[async_trait]
impl SpeechSynthesizerPort for FakeTtsClient {
    async fn synthesize(&self, utterance: &Utterance) -> Result<AudioPayload, SynthesisError> {
        tracing::debug!(
            chars = utterance.char_count(),
            voice = %utterance.voice(),
            "FakeTtsClient: returning canned audio"
        );

        // 模拟合成延迟
        tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;

        let data = match &self.audio_data {
            Some(data) => data.clone(),
            None => silent_wav(self.config.sample_rate, self.duration_ms(utterance)),
        };
        let sample_rate = parse_wav_info(&data)
            .map(|info| info.sample_rate)
            .unwrap_or(self.config.sample_rate);

        Ok(AudioPayload::new(data, AudioContainer::Wav).with_sample_rate(sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_generated_duration_scales_with_text() {
        let client = FakeTtsClient::new(FakeTtsClientConfig::default().with_latency(0)).unwrap();

        let short = client
            .synthesize(&Utterance::new("hello", "en-US-AriaNeural").unwrap())
            .await
            .unwrap();
        let long = client
            .synthesize(&Utterance::new("hello ".repeat(20), "en-US-AriaNeural").unwrap())
            .await
            .unwrap();

        let short_info = parse_wav_info(short.data()).unwrap();
        let long_info = parse_wav_info(long.data()).unwrap();
        assert_eq!(short_info.duration_ms, 300);
        assert!(long_info.duration_ms > short_info.duration_ms);
        assert_eq!(short.sample_rate(), Some(16000));
    }

    #[tokio::test]
    async fn test_fixed_audio_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&silent_wav(22050, 250)).unwrap();

        let config = FakeTtsClientConfig::default()
            .with_latency(0)
            .with_audio_file(file.path());
        let client = FakeTtsClient::new(config).unwrap();

        let payload = client
            .synthesize(&Utterance::new("anything", "en-US-GuyNeural").unwrap())
            .await
            .unwrap();
        assert_eq!(payload.sample_rate(), Some(22050));
        assert_eq!(parse_wav_info(payload.data()).unwrap().duration_ms, 250);
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let config = FakeTtsClientConfig::default().with_audio_file("/nonexistent/voice.wav");
        assert!(FakeTtsClient::new(config).is_err());
    }
}
