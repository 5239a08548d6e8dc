//! Text Source Adapter

mod file_text_source;

pub use file_text_source::FileTextSource;
