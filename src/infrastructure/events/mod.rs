//! Events - 状态事件广播

mod publisher;

pub use publisher::{EventPublisher, StatusEvent};
