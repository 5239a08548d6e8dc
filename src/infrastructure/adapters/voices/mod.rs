//! Voice Adapter - 语音目录客户端

mod azure_voice_client;

pub use azure_voice_client::AzureVoiceClient;
