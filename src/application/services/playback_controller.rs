//! Playback Controller - 播放/暂停切换
//!
//! 根据引擎当前状态决定暂停、恢复或清洗后重新朗读，并维护状态栏提示。

use std::sync::Arc;

use serde::Serialize;

use super::playback_engine::{PlayOutcome, PlaybackEngine, PlaybackHooks};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    Notice, PlaybackIndicator, SettingsPort, StatusNotifierPort, TextSourcePort,
};
use crate::domain::playback::{PlaybackState, Utterance};
use crate::domain::sanitize;

/// toggle 执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Paused,
    Resumed,
    Started,
    /// 合成期间被新的请求或 stop 取代
    Superseded,
}

/// 播放控制器
pub struct PlaybackController {
    engine: Arc<PlaybackEngine>,
    settings: Arc<dyn SettingsPort>,
    notifier: Arc<dyn StatusNotifierPort>,
    text_source: Arc<dyn TextSourcePort>,
}

impl PlaybackController {
    pub fn new(
        engine: Arc<PlaybackEngine>,
        settings: Arc<dyn SettingsPort>,
        notifier: Arc<dyn StatusNotifierPort>,
        text_source: Arc<dyn TextSourcePort>,
    ) -> Self {
        Self {
            engine,
            settings,
            notifier,
            text_source,
        }
    }

    pub fn engine(&self) -> &Arc<PlaybackEngine> {
        &self.engine
    }

    /// 播放/暂停切换
    ///
    /// | 引擎状态 | 动作 |
    /// |---|---|
    /// | Playing | 暂停 |
    /// | Paused | 恢复 |
    /// | 其他 | 清洗 `current_text` 后重新朗读 |
    pub async fn toggle(&self, current_text: &str) -> Result<ToggleAction, ApplicationError> {
        if let Some(action) = self.toggle_transport() {
            return Ok(action);
        }
        self.start(current_text).await
    }

    /// 与 `toggle` 相同，但只在需要重新朗读时才读取文档
    pub async fn toggle_document(&self, document: &str) -> Result<ToggleAction, ApplicationError> {
        if let Some(action) = self.toggle_transport() {
            return Ok(action);
        }

        let text = match self.text_source.read(document).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(document = %document, error = %e, "Failed to read document");
                return Err(self.report(e.into()));
            }
        };
        self.start(&text).await
    }

    /// 立即停止（含 Loading 状态），状态栏恢复为可播放
    pub fn force_stop(&self) -> bool {
        let stopped = self.engine.stop();
        self.notifier.set_indicator(PlaybackIndicator::Ready);
        stopped
    }

    fn toggle_transport(&self) -> Option<ToggleAction> {
        match self.engine.state() {
            PlaybackState::Playing if self.engine.pause() => {
                self.notifier.set_indicator(PlaybackIndicator::Paused);
                self.notifier.notify(Notice::Paused);
                Some(ToggleAction::Paused)
            }
            PlaybackState::Paused if self.engine.resume() => {
                self.notifier.set_indicator(PlaybackIndicator::Playing);
                self.notifier.notify(Notice::Resumed);
                Some(ToggleAction::Resumed)
            }
            _ => None,
        }
    }

    async fn start(&self, raw_text: &str) -> Result<ToggleAction, ApplicationError> {
        let cleaned = sanitize(raw_text);
        if cleaned.is_empty() {
            tracing::info!(raw_len = raw_text.len(), "Nothing to read after sanitization");
            return Err(self.report(ApplicationError::EmptyContent));
        }

        // 每次都读取最新配置
        let voice = self.settings.current().voice;
        let utterance = Utterance::new(cleaned, voice).map_err(ApplicationError::validation)?;

        self.notifier.set_indicator(PlaybackIndicator::Loading);

        let started = Arc::clone(&self.notifier);
        let completed = Arc::clone(&self.notifier);
        let hooks = PlaybackHooks::new()
            .on_started(move || started.set_indicator(PlaybackIndicator::Playing))
            .on_complete(move || completed.set_indicator(PlaybackIndicator::Ready));

        // 在独立任务中合成与播放：调用方放弃等待时，本次请求照常走完并更新状态栏
        let engine = Arc::clone(&self.engine);
        let notifier = Arc::clone(&self.notifier);
        let task = tokio::spawn(async move {
            let result = engine.play(utterance, hooks).await;
            if let Err(e) = &result {
                notifier.set_indicator(PlaybackIndicator::Ready);
                if let Some(notice) = e.notice() {
                    notifier.notify(notice);
                }
            }
            result
        });

        match task.await {
            Ok(Ok(PlayOutcome::Started)) => Ok(ToggleAction::Started),
            Ok(Ok(PlayOutcome::Superseded)) => Ok(ToggleAction::Superseded),
            Ok(Err(e)) => Err(e),
            Err(e) => {
                tracing::error!(error = %e, "Playback task failed");
                self.notifier.set_indicator(PlaybackIndicator::Ready);
                Err(ApplicationError::internal(format!("playback task failed: {}", e)))
            }
        }
    }

    fn report(&self, error: ApplicationError) -> ApplicationError {
        if let Some(notice) = error.notice() {
            self.notifier.notify(notice);
        }
        error
    }
}
