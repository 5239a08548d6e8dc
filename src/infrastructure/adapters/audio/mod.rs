//! Audio Adapter - 解码与本地输出

mod decoder;
mod rodio_output;
mod silent_output;
pub mod wav;

pub use decoder::{decode_payload, DecodedAudio};
pub use rodio_output::RodioAudioOutput;
pub use silent_output::SilentAudioOutput;
