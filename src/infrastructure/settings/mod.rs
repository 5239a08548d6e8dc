//! Settings - 配置存储

mod file_settings_store;

pub use file_settings_store::FileSettingsStore;
