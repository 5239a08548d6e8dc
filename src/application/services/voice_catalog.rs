//! Voice Catalog Service - 语音目录
//!
//! 保存最近一次拉取的完整目录；过滤视图每次按当前配置重新计算

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use crate::application::ports::{
    Notice, SettingsPort, SpeechCredentials, StatusNotifierPort, VoiceCatalogPort,
};
use crate::domain::voice::{filter_voices, VoiceDescriptor, VoiceFilter};

pub struct VoiceCatalogService {
    port: Arc<dyn VoiceCatalogPort>,
    settings: Arc<dyn SettingsPort>,
    notifier: Arc<dyn StatusNotifierPort>,
    catalog: RwLock<Vec<VoiceDescriptor>>,
}

impl VoiceCatalogService {
    pub fn new(
        port: Arc<dyn VoiceCatalogPort>,
        settings: Arc<dyn SettingsPort>,
        notifier: Arc<dyn StatusNotifierPort>,
    ) -> Self {
        Self {
            port,
            settings,
            notifier,
            catalog: RwLock::new(Vec::new()),
        }
    }

    /// 拉取语音列表
    ///
    /// 失败时返回空列表并发出 `CatalogUnavailable` 提示，不会向上传播错误
    pub async fn fetch_voices(&self, credentials: &SpeechCredentials) -> Vec<VoiceDescriptor> {
        match self.port.list_voices(credentials).await {
            Ok(voices) => {
                tracing::info!(count = voices.len(), region = %credentials.region, "Voice catalog fetched");
                voices
            }
            Err(e) => {
                tracing::warn!(region = %credentials.region, error = %e, "Voice catalog unavailable");
                self.notifier.notify(Notice::CatalogUnavailable(e.to_string()));
                Vec::new()
            }
        }
    }

    /// 使用当前凭据重新拉取并替换目录
    pub async fn refresh(&self) -> Vec<VoiceDescriptor> {
        let credentials = self.settings.current().credentials();
        let voices = self.fetch_voices(&credentials).await;
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = voices.clone();
        voices
    }

    /// 完整目录
    pub fn catalog(&self) -> Vec<VoiceDescriptor> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 按当前配置中的过滤条件派生的视图
    pub fn filtered(&self) -> Vec<VoiceDescriptor> {
        self.filtered_with(&self.settings.current().voice_filter())
    }

    pub fn filtered_with(&self, filter: &VoiceFilter) -> Vec<VoiceDescriptor> {
        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        filter_voices(&catalog, filter)
    }

    /// 目录中出现的全部区域（去重、排序），用于填充下拉框
    pub fn locales(&self) -> Vec<String> {
        self.distinct(|v| &v.locale)
    }

    /// 目录中出现的全部性别（去重、排序）
    pub fn genders(&self) -> Vec<String> {
        self.distinct(|v| &v.gender)
    }

    fn distinct(&self, field: impl Fn(&VoiceDescriptor) -> &String) -> Vec<String> {
        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        catalog
            .iter()
            .map(|v| field(v).clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
