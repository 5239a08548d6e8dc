//! Azure TTS Client - 调用 Azure Speech REST 合成接口
//!
//! 实现 SpeechSynthesizerPort，每次调用发送一次请求
//!
//! Azure TTS API:
//! POST https://{region}.tts.speech.microsoft.com/cognitiveservices/v1
//! Request: SSML (application/ssml+xml)
//! Response: 音频二进制，格式由 X-Microsoft-OutputFormat 决定

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{header, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

use super::ssml::build_ssml;
use crate::application::ports::{SettingsPort, SpeechSynthesizerPort, SynthesisError};
use crate::domain::playback::{AudioContainer, AudioPayload, Utterance};
use crate::infrastructure::adapters::azure::{
    truncate_body, user_agent, AzureEndpoint, AzureOutputFormat, OUTPUT_FORMAT_HEADER,
    SSML_CONTENT_TYPE, SUBSCRIPTION_KEY_HEADER,
};

/// Azure TTS 客户端配置
#[derive(Debug, Clone)]
pub struct AzureTtsClientConfig {
    /// 服务端点
    pub endpoint: AzureEndpoint,
    /// 输出格式
    pub output_format: AzureOutputFormat,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for AzureTtsClientConfig {
    fn default() -> Self {
        Self {
            endpoint: AzureEndpoint::regional(),
            output_format: AzureOutputFormat::default(),
            timeout_secs: 30,
        }
    }
}

impl AzureTtsClientConfig {
    pub fn with_endpoint(mut self, endpoint: AzureEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_output_format(mut self, format: AzureOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Azure TTS 客户端
///
/// 凭据在每次请求时从 SettingsPort 读取，修改配置后无需重建客户端
pub struct AzureTtsClient {
    client: Client,
    config: AzureTtsClientConfig,
    settings: Arc<dyn SettingsPort>,
}

impl AzureTtsClient {
    pub fn new(
        config: AzureTtsClientConfig,
        settings: Arc<dyn SettingsPort>,
    ) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent())
            .build()
            .map_err(|e| SynthesisError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            settings,
        })
    }

    fn map_send_error(e: reqwest::Error) -> SynthesisError {
        if e.is_timeout() {
            SynthesisError::Timeout
        } else if e.is_connect() {
            SynthesisError::NetworkError(format!("Cannot connect to speech service: {}", e))
        } else {
            SynthesisError::NetworkError(e.to_string())
        }
    }
}

#[async_trait]
impl SpeechSynthesizerPort for AzureTtsClient {
    async fn synthesize(&self, utterance: &Utterance) -> Result<AudioPayload, SynthesisError> {
        let credentials = self.settings.current().credentials();
        if !credentials.is_complete() {
            return Err(SynthesisError::MissingCredentials(
                "api key and region must be configured".to_string(),
            ));
        }

        let url = self.config.endpoint.synthesis_url(&credentials.region);
        let format = self.config.output_format;
        let body = build_ssml(utterance.text(), utterance.voice(), &utterance.language());

        tracing::debug!(
            url = %url,
            voice = %utterance.voice(),
            chars = utterance.char_count(),
            format = %format,
            "Sending speech synthesis request"
        );

        let response = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &credentials.api_key)
            .header(OUTPUT_FORMAT_HEADER, format.as_str())
            .header(header::CONTENT_TYPE, SSML_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = truncate_body(&error_text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    SynthesisError::Unauthorized(format!("HTTP {}", status.as_u16()))
                }
                _ => SynthesisError::ServiceError {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        // 逐块读取；中途出错时丢弃已收到的部分
        let mut stream = response.bytes_stream();
        let mut audio_data = Vec::new();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => audio_data.extend_from_slice(&bytes),
                Err(e) => {
                    tracing::warn!(
                        received = audio_data.len(),
                        error = %e,
                        "Speech synthesis stream interrupted"
                    );
                    return Err(if e.is_timeout() {
                        SynthesisError::Timeout
                    } else {
                        SynthesisError::Cancelled(e.to_string())
                    });
                }
            }
        }

        if audio_data.is_empty() {
            return Err(SynthesisError::InvalidResponse("empty audio body".to_string()));
        }
        let container = format.container();
        if container == AudioContainer::Wav && !audio_data.starts_with(b"RIFF") {
            return Err(SynthesisError::InvalidResponse(
                "expected RIFF audio".to_string(),
            ));
        }

        tracing::info!(
            voice = %utterance.voice(),
            audio_size = audio_data.len(),
            sample_rate = format.sample_rate(),
            "Speech synthesis completed"
        );

        Ok(AudioPayload::new(audio_data, container).with_sample_rate(format.sample_rate()))
    }
}
