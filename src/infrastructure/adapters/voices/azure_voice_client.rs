//! Azure Voice Client - 拉取 Azure 语音列表
//!
//! GET https://{region}.tts.speech.microsoft.com/cognitiveservices/voices/list

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{CatalogError, SpeechCredentials, VoiceCatalogPort};
use crate::domain::voice::VoiceDescriptor;
use crate::infrastructure::adapters::azure::{
    truncate_body, user_agent, AzureEndpoint, SUBSCRIPTION_KEY_HEADER,
};

/// 语音列表条目（只取用到的字段）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AzureVoice {
    short_name: String,
    #[serde(default)]
    local_name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    locale: String,
    #[serde(default)]
    gender: String,
}

impl From<AzureVoice> for VoiceDescriptor {
    fn from(v: AzureVoice) -> Self {
        // LocalName 缺失时退回 DisplayName，再退回 ShortName
        let localized_name = v
            .local_name
            .filter(|s| !s.trim().is_empty())
            .or(v.display_name)
            .unwrap_or_else(|| v.short_name.clone());
        VoiceDescriptor::new(v.short_name, localized_name, v.locale, v.gender)
    }
}

pub struct AzureVoiceClient {
    client: Client,
    endpoint: AzureEndpoint,
}

impl AzureVoiceClient {
    pub fn new(endpoint: AzureEndpoint, timeout_secs: u64) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent())
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl VoiceCatalogPort for AzureVoiceClient {
    async fn list_voices(
        &self,
        credentials: &SpeechCredentials,
    ) -> Result<Vec<VoiceDescriptor>, CatalogError> {
        if !credentials.is_complete() {
            return Err(CatalogError::MissingCredentials(
                "api key and region must be configured".to_string(),
            ));
        }

        let url = self.endpoint.voices_url(&credentials.region);
        tracing::debug!(url = %url, "Fetching voice list");

        let response = self
            .client
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &credentials.api_key)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    CatalogError::Unauthorized(format!("HTTP {}", status.as_u16()))
                }
                _ => CatalogError::ServiceError(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    truncate_body(&error_text)
                )),
            });
        }

        let voices: Vec<AzureVoice> = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        Ok(voices.into_iter().map(VoiceDescriptor::from).collect())
    }
}
