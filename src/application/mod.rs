//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechSynthesizer、VoiceCatalog、AudioOutput、StatusNotifier、Settings、TextSource）
//! - services: 播放引擎、播放控制器、语音目录
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;

pub use ports::{
    // Audio output
    AudioHandle,
    AudioOutputError,
    AudioOutputPort,
    PlaybackEnded,
    // Settings
    SettingsError,
    SettingsPort,
    SpeechCredentials,
    SpeechSettings,
    // Speech synthesizer
    SpeechSynthesizerPort,
    SynthesisError,
    // Status notifier
    Notice,
    PlaybackIndicator,
    StatusNotifierPort,
    // Text source
    TextSourceError,
    TextSourcePort,
    // Voice catalog
    CatalogError,
    VoiceCatalogPort,
};

pub use services::{
    PlayOutcome, PlaybackController, PlaybackEngine, PlaybackHooks, ToggleAction,
    VoiceCatalogService,
};
