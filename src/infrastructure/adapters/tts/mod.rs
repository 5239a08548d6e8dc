//! TTS Adapter - 语音合成客户端实现

mod azure_tts_client;
mod fake_tts_client;
pub mod ssml;

pub use azure_tts_client::{AzureTtsClient, AzureTtsClientConfig};
pub use fake_tts_client::{FakeTtsClient, FakeTtsClientConfig};
