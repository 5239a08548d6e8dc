//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_output;
mod settings;
mod speech_synthesizer;
mod status_notifier;
mod text_source;
mod voice_catalog;

pub use audio_output::{AudioHandle, AudioOutputError, AudioOutputPort, PlaybackEnded};
pub use settings::{
    mask_secret, SettingsError, SettingsPort, SpeechCredentials, SpeechSettings, DEFAULT_REGION,
    DEFAULT_VOICE,
};
pub use speech_synthesizer::{SpeechSynthesizerPort, SynthesisError};
pub use status_notifier::{Notice, PlaybackIndicator, StatusNotifierPort};
pub use text_source::{TextSourceError, TextSourcePort};
pub use voice_catalog::{CatalogError, VoiceCatalogPort};
