//! Voice Context - 语音目录限界上下文
//!
//! 职责:
//! - 语音描述值对象
//! - 按区域/性别过滤并排序（纯函数）

mod filter;
mod value_objects;

pub use filter::{compare_by_localized_name, filter_voices};
pub use value_objects::{VoiceDescriptor, VoiceFilter};
