//! Event Publisher Implementation
//!
//! 状态栏事件广播，WebSocket 订阅后推送给客户端

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::application::ports::{Notice, PlaybackIndicator, StatusNotifierPort};
use crate::domain::playback::PlaybackState;

/// WebSocket 事件类型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum StatusEvent {
    /// 状态栏按钮变更
    IndicatorChanged {
        indicator: PlaybackIndicator,
        glyph: &'static str,
        at: DateTime<Utc>,
    },
    /// 用户提示
    Notice {
        notice: Notice,
        message: String,
        at: DateTime<Utc>,
    },
    /// 播放引擎状态变更
    StateChanged {
        state: PlaybackState,
        at: DateTime<Utc>,
    },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<StatusEvent>,
    last_indicator: RwLock<PlaybackIndicator>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self {
            channel: tx,
            last_indicator: RwLock::new(PlaybackIndicator::Ready),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.channel.subscribe()
    }

    /// 当前状态栏按钮（新连接的客户端用它初始化）
    pub fn last_indicator(&self) -> PlaybackIndicator {
        *self
            .last_indicator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// 当前状态栏按钮对应的事件
    pub fn snapshot(&self) -> StatusEvent {
        let indicator = self.last_indicator();
        StatusEvent::IndicatorChanged {
            indicator,
            glyph: indicator.glyph(),
            at: Utc::now(),
        }
    }

    /// 转发播放引擎的每一次状态切换，发送端关闭后任务结束
    pub fn forward_states(
        self: &Arc<Self>,
        mut transitions: broadcast::Receiver<PlaybackState>,
    ) -> JoinHandle<()> {
        let publisher = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match transitions.recv().await {
                    Ok(state) => publisher.publish(StatusEvent::StateChanged {
                        state,
                        at: Utc::now(),
                    }),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "State forwarder lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn publish(&self, event: StatusEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(error = %e, "Failed to publish event (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusNotifierPort for EventPublisher {
    fn set_indicator(&self, indicator: PlaybackIndicator) {
        *self
            .last_indicator
            .write()
            .unwrap_or_else(PoisonError::into_inner) = indicator;
        self.publish(StatusEvent::IndicatorChanged {
            indicator,
            glyph: indicator.glyph(),
            at: Utc::now(),
        });
    }

    fn notify(&self, notice: Notice) {
        let message = notice.message();
        if notice.is_error() {
            tracing::warn!(notice = ?notice, "{}", message);
        } else {
            tracing::info!("{}", message);
        }
        self.publish(StatusEvent::Notice {
            notice,
            message,
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_indicator_event() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();

        publisher.set_indicator(PlaybackIndicator::Playing);

        let event = rx.recv().await.unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "IndicatorChanged");
        assert_eq!(json["data"]["indicator"], "playing");
        assert_eq!(json["data"]["glyph"], "⏸️");
        assert_eq!(publisher.last_indicator(), PlaybackIndicator::Playing);
    }

    #[tokio::test]
    async fn test_notice_event_carries_message() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();

        publisher.notify(Notice::EmptyContent);

        match rx.recv().await.unwrap() {
            StatusEvent::Notice { notice, message, .. } => {
                assert_eq!(notice, Notice::EmptyContent);
                assert_eq!(message, "Nothing to read: the note is empty");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let publisher = EventPublisher::new();
        publisher.notify(Notice::Paused);
        assert_eq!(publisher.last_indicator(), PlaybackIndicator::Ready);
    }

    #[test]
    fn test_snapshot_reflects_last_indicator() {
        let publisher = EventPublisher::new();
        publisher.set_indicator(PlaybackIndicator::Paused);

        let json = serde_json::to_value(publisher.snapshot()).unwrap();
        assert_eq!(json["event"], "IndicatorChanged");
        assert_eq!(json["data"]["indicator"], "paused");
    }

    #[tokio::test]
    async fn test_forward_states_keeps_short_lived_states() {
        let publisher = EventPublisher::new().arc();
        let mut rx = publisher.subscribe();
        let (tx, transitions) = broadcast::channel(16);
        let task = publisher.forward_states(transitions);

        for state in [
            PlaybackState::Loading,
            PlaybackState::Failed,
            PlaybackState::Idle,
        ] {
            tx.send(state).unwrap();
        }

        let mut seen = Vec::new();
        for _ in 0..3 {
            match rx.recv().await.unwrap() {
                StatusEvent::StateChanged { state, .. } => seen.push(state),
                other => panic!("unexpected event: {:?}", other),
            }
        }
        assert_eq!(
            seen,
            vec![
                PlaybackState::Loading,
                PlaybackState::Failed,
                PlaybackState::Idle
            ]
        );

        drop(tx);
        task.await.unwrap();
    }
}
