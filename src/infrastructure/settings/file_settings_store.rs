//! File Settings Store - 朗读配置的内存快照与持久化
//!
//! 实现 SettingsPort trait

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use crate::application::ports::{SettingsError, SettingsPort, SpeechSettings};
use crate::config::save_settings;

pub struct FileSettingsStore {
    current: RwLock<SpeechSettings>,
    /// 为空时只在内存中修改
    path: Option<PathBuf>,
}

impl FileSettingsStore {
    pub fn new(initial: SpeechSettings, path: impl Into<PathBuf>) -> Self {
        Self {
            current: RwLock::new(initial),
            path: Some(path.into()),
        }
    }

    pub fn in_memory(initial: SpeechSettings) -> Self {
        Self {
            current: RwLock::new(initial),
            path: None,
        }
    }
}

impl SettingsPort for FileSettingsStore {
    fn current(&self) -> SpeechSettings {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, settings: SpeechSettings) -> Result<(), SettingsError> {
        settings.validate()?;

        // 持久化成功后才替换内存快照
        if let Some(path) = &self.path {
            save_settings(path, &settings)
                .map_err(|e| SettingsError::PersistError(e.to_string()))?;
        }

        tracing::info!(
            region = %settings.region,
            voice = %settings.voice,
            "Speech settings updated"
        );
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_path;
    use tempfile::TempDir;

    fn updated() -> SpeechSettings {
        SpeechSettings {
            api_key: "new-key".to_string(),
            region: "westeurope".to_string(),
            voice: "de-DE-KatjaNeural".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_update_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let settings_path = dir.path().join("settings.toml");
        let store = FileSettingsStore::new(SpeechSettings::default(), &settings_path);

        store.update(updated()).unwrap();
        assert_eq!(store.current(), updated());

        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            format!("[settings]\npath = {:?}\n", settings_path.to_string_lossy()),
        )
        .unwrap();
        let reloaded = load_config_from_path(Some(&config_path)).unwrap();
        assert_eq!(reloaded.speech, updated());
    }

    #[test]
    fn test_invalid_update_is_rejected() {
        let store = FileSettingsStore::in_memory(SpeechSettings::default());
        let mut bad = SpeechSettings::default();
        bad.voice = "  ".to_string();

        assert!(matches!(store.update(bad), Err(SettingsError::Invalid(_))));
        assert_eq!(store.current(), SpeechSettings::default());
    }

    #[test]
    fn test_persist_failure_keeps_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        // 父路径是普通文件，无法创建目录
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = FileSettingsStore::new(SpeechSettings::default(), blocker.join("settings.toml"));

        assert!(matches!(
            store.update(updated()),
            Err(SettingsError::PersistError(_))
        ));
        assert_eq!(store.current(), SpeechSettings::default());
    }
}
