//! Playback Context - 播放限界上下文
//!
//! 职责:
//! - 播放状态及其合法迁移
//! - 朗读语句与音频数据值对象

mod state;
mod value_objects;

pub use state::PlaybackState;
pub use value_objects::{AudioContainer, AudioPayload, Utterance};
