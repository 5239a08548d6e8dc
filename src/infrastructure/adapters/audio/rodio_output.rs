//! Rodio Audio Output - 默认声卡输出
//!
//! `rodio::OutputStream` 在部分平台上是 `!Send`，因此放在专用线程中持有，
//! 对外只暴露可跨线程的 `OutputStreamHandle`。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use async_trait::async_trait;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tokio::sync::oneshot;

use super::decoder::decode_payload;
use crate::application::ports::{AudioHandle, AudioOutputError, AudioOutputPort, PlaybackEnded};
use crate::domain::playback::AudioPayload;

/// 声卡输出
pub struct RodioAudioOutput {
    stream_handle: OutputStreamHandle,
    volume: f32,
    shutdown_tx: Option<mpsc::Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl RodioAudioOutput {
    /// 启动音频线程并打开默认输出设备
    pub fn spawn(volume: f32) -> Result<Self, AudioOutputError> {
        let (init_tx, init_rx) = mpsc::channel::<Result<OutputStreamHandle, AudioOutputError>>();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let thread = thread::Builder::new()
            .name("readaloud-audio".into())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        let _ = init_tx.send(Err(AudioOutputError::DeviceError(e.to_string())));
                        return;
                    }
                };
                if init_tx.send(Ok(handle)).is_err() {
                    return;
                }
                // 保持 stream 存活直到关闭
                let _ = shutdown_rx.recv();
                tracing::debug!("Audio output thread exiting");
            })
            .map_err(|e| {
                AudioOutputError::DeviceError(format!("failed to spawn audio thread: {}", e))
            })?;

        let stream_handle = init_rx
            .recv()
            .map_err(|_| AudioOutputError::DeviceError("audio thread died".to_string()))??;

        tracing::info!(volume, "Audio playback initialized on default output device");

        Ok(Self {
            stream_handle,
            volume: volume.clamp(0.0, 1.0),
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
        })
    }
}

impl Drop for RodioAudioOutput {
    fn drop(&mut self) {
        drop(self.shutdown_tx.take());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[async_trait]
impl AudioOutputPort for RodioAudioOutput {
    async fn open(&self, payload: &AudioPayload) -> Result<Box<dyn AudioHandle>, AudioOutputError> {
        let payload = payload.clone();
        let decoded = tokio::task::spawn_blocking(move || decode_payload(&payload))
            .await
            .map_err(|e| AudioOutputError::DecodingError(format!("decode task failed: {}", e)))??;

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioOutputError::DeviceError(e.to_string()))?;
        sink.pause();
        sink.set_volume(self.volume);

        tracing::debug!(
            sample_rate = decoded.sample_rate,
            channels = decoded.channels,
            duration_ms = decoded.duration().as_millis() as u64,
            "Audio buffered"
        );

        let source =
            rodio::buffer::SamplesBuffer::new(decoded.channels, decoded.sample_rate, decoded.samples);
        sink.append(source);

        Ok(Box::new(RodioHandle::new(Arc::new(sink))))
    }
}

/// 一个 Sink 对应一段音频
struct RodioHandle {
    sink: Arc<Sink>,
    stopped: Arc<AtomicBool>,
    end_rx: Option<PlaybackEnded>,
}

impl RodioHandle {
    fn new(sink: Arc<Sink>) -> Self {
        let stopped = Arc::new(AtomicBool::new(false));
        let (end_tx, end_rx) = oneshot::channel();

        // sleep_until_end 在队列播完或 stop() 后返回
        let watched = Arc::clone(&sink);
        let flag = Arc::clone(&stopped);
        thread::spawn(move || {
            watched.sleep_until_end();
            if flag.load(Ordering::SeqCst) {
                return;
            }
            tracing::debug!("Playback finished naturally");
            let _ = end_tx.send(());
        });

        Self {
            sink,
            stopped,
            end_rx: Some(end_rx),
        }
    }
}

impl AudioHandle for RodioHandle {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.sink.stop();
        }
    }

    fn on_end(&mut self) -> Option<PlaybackEnded> {
        self.end_rx.take()
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
