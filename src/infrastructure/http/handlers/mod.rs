//! HTTP Handlers

mod ping;
mod playback;
mod settings;
mod voices;
mod websocket;

pub use ping::*;
pub use playback::*;
pub use settings::*;
pub use voices::*;
pub use websocket::*;
