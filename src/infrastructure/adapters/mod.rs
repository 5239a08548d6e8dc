//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod audio;
pub mod azure;
pub mod source;
pub mod tts;
pub mod voices;

#[cfg(test)]
pub(crate) mod mock_server;

pub use audio::{RodioAudioOutput, SilentAudioOutput};
pub use azure::{AzureEndpoint, AzureOutputFormat};
pub use source::FileTextSource;
pub use tts::*;
pub use voices::AzureVoiceClient;
