//! Silent Audio Output - 无声卡环境下的输出
//!
//! 不产生声音，按解码出的时长计时，支持暂停/恢复

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use super::decoder::decode_payload;
use crate::application::ports::{AudioHandle, AudioOutputError, AudioOutputPort, PlaybackEnded};
use crate::domain::playback::AudioPayload;

#[derive(Debug)]
enum Transport {
    Play,
    Pause,
}

/// 计时模拟输出
#[derive(Debug, Default)]
pub struct SilentAudioOutput;

impl SilentAudioOutput {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioOutputPort for SilentAudioOutput {
    async fn open(&self, payload: &AudioPayload) -> Result<Box<dyn AudioHandle>, AudioOutputError> {
        let payload = payload.clone();
        let decoded = tokio::task::spawn_blocking(move || decode_payload(&payload))
            .await
            .map_err(|e| AudioOutputError::DecodingError(format!("decode task failed: {}", e)))??;

        let duration = decoded.duration();
        tracing::debug!(
            duration_ms = duration.as_millis() as u64,
            "Silent output buffered"
        );

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (end_tx, end_rx) = oneshot::channel();
        tokio::spawn(run_timer(duration, cmd_rx, end_tx));

        Ok(Box::new(SilentHandle {
            cmd_tx: Some(cmd_tx),
            end_rx: Some(end_rx),
        }))
    }
}

/// 播放计时；命令通道关闭即视为停止
async fn run_timer(
    duration: Duration,
    mut cmd_rx: mpsc::UnboundedReceiver<Transport>,
    end_tx: oneshot::Sender<()>,
) {
    let mut end_tx = Some(end_tx);
    let mut remaining = duration;
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(Transport::Play) => {
                    if deadline.is_none() {
                        deadline = Some(Instant::now() + remaining);
                    }
                }
                Some(Transport::Pause) => {
                    if let Some(d) = deadline.take() {
                        remaining = d.saturating_duration_since(Instant::now());
                    }
                }
                None => return,
            },
            _ = sleep_until(deadline), if deadline.is_some() => {
                if let Some(tx) = end_tx.take() {
                    let _ = tx.send(());
                }
                return;
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    if let Some(d) = deadline {
        tokio::time::sleep_until(d).await;
    }
}

struct SilentHandle {
    cmd_tx: Option<mpsc::UnboundedSender<Transport>>,
    end_rx: Option<PlaybackEnded>,
}

impl SilentHandle {
    fn send(&self, cmd: Transport) {
        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(cmd);
        }
    }
}

impl AudioHandle for SilentHandle {
    fn play(&mut self) {
        self.send(Transport::Play);
    }

    fn pause(&mut self) {
        self.send(Transport::Pause);
    }

    fn stop(&mut self) {
        self.cmd_tx.take();
    }

    fn on_end(&mut self) -> Option<PlaybackEnded> {
        self.end_rx.take()
    }
}
