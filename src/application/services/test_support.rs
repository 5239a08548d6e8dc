//! 测试替身：端口的内存实现

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};

use crate::application::ports::{
    AudioHandle, AudioOutputError, AudioOutputPort, CatalogError, Notice, PlaybackEnded,
    PlaybackIndicator, SettingsError, SettingsPort, SpeechCredentials, SpeechSettings,
    SpeechSynthesizerPort, StatusNotifierPort, SynthesisError, TextSourceError, TextSourcePort,
    VoiceCatalogPort,
};
use crate::domain::playback::{AudioContainer, AudioPayload, PlaybackState, Utterance};
use crate::domain::voice::VoiceDescriptor;

use super::playback_engine::PlaybackHooks;

pub fn no_hooks() -> PlaybackHooks {
    PlaybackHooks::new()
}

pub async fn wait_for_state(rx: &mut watch::Receiver<PlaybackState>, state: PlaybackState) {
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| *s == state))
        .await
        .expect("timed out waiting for playback state")
        .expect("state channel closed");
}

// ============================================================================
// Synthesizer
// ============================================================================

/// 记录调用并返回 `文本字节` 作为音频数据
pub struct MockSynthesizer {
    calls: AtomicUsize,
    fail: bool,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    voices: Mutex<Vec<String>>,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
            gates: Mutex::new(VecDeque::new()),
            voices: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// 前 `count` 次调用分别等待对应的闸门放行
    pub fn gated(count: usize) -> (Self, Vec<oneshot::Sender<()>>) {
        let synth = Self::new();
        let mut senders = Vec::with_capacity(count);
        {
            let mut gates = synth.gates.lock().unwrap();
            for _ in 0..count {
                let (tx, rx) = oneshot::channel();
                senders.push(tx);
                gates.push_back(rx);
            }
        }
        (synth, senders)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn voices(&self) -> Vec<String> {
        self.voices.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizerPort for MockSynthesizer {
    async fn synthesize(&self, utterance: &Utterance) -> Result<AudioPayload, SynthesisError> {
        self.voices.lock().unwrap().push(utterance.voice().to_string());
        let gate = self.gates.lock().unwrap().pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.fail {
            return Err(SynthesisError::ServiceError {
                status: 500,
                message: "mock failure".to_string(),
            });
        }
        Ok(AudioPayload::new(
            utterance.text().as_bytes().to_vec(),
            AudioContainer::Wav,
        ))
    }
}

// ============================================================================
// Audio output
// ============================================================================

/// 单个句柄的可观察状态
pub struct MockHandleState {
    payload: Vec<u8>,
    events: Mutex<Vec<&'static str>>,
    end_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl MockHandleState {
    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }

    pub fn payload(&self) -> Vec<u8> {
        self.payload.clone()
    }

    /// 模拟音频自然播放完毕；信号已失效时返回 false
    pub fn finish(&self) -> bool {
        match self.end_tx.lock().unwrap().take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }
}

struct MockHandle {
    state: Arc<MockHandleState>,
    end_rx: Option<PlaybackEnded>,
}

impl AudioHandle for MockHandle {
    fn play(&mut self) {
        self.state.events.lock().unwrap().push("play");
    }

    fn pause(&mut self) {
        self.state.events.lock().unwrap().push("pause");
    }

    fn stop(&mut self) {
        self.state.events.lock().unwrap().push("stop");
        self.state.end_tx.lock().unwrap().take();
    }

    fn on_end(&mut self) -> Option<PlaybackEnded> {
        self.end_rx.take()
    }
}

pub struct MockAudioOutput {
    fail: AtomicBool,
    opened: Mutex<Vec<Arc<MockHandleState>>>,
}

impl MockAudioOutput {
    pub fn new() -> Self {
        Self {
            fail: AtomicBool::new(false),
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        let output = Self::new();
        output.fail.store(true, Ordering::SeqCst);
        output
    }

    pub fn opened_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<Arc<MockHandleState>> {
        self.opened.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl AudioOutputPort for MockAudioOutput {
    async fn open(&self, payload: &AudioPayload) -> Result<Box<dyn AudioHandle>, AudioOutputError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AudioOutputError::DeviceError("no device".to_string()));
        }
        let (tx, rx) = oneshot::channel();
        let state = Arc::new(MockHandleState {
            payload: payload.data().to_vec(),
            events: Mutex::new(Vec::new()),
            end_tx: Mutex::new(Some(tx)),
        });
        self.opened.lock().unwrap().push(state.clone());
        Ok(Box::new(MockHandle {
            state,
            end_rx: Some(rx),
        }))
    }
}

// ============================================================================
// Status / settings / text source / catalog
// ============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    indicators: Mutex<Vec<PlaybackIndicator>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indicators(&self) -> Vec<PlaybackIndicator> {
        self.indicators.lock().unwrap().clone()
    }

    pub fn last_indicator(&self) -> Option<PlaybackIndicator> {
        self.indicators.lock().unwrap().last().copied()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl StatusNotifierPort for RecordingNotifier {
    fn set_indicator(&self, indicator: PlaybackIndicator) {
        self.indicators.lock().unwrap().push(indicator);
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct InMemorySettings {
    current: Mutex<SpeechSettings>,
}

impl InMemorySettings {
    pub fn new(settings: SpeechSettings) -> Self {
        Self {
            current: Mutex::new(settings),
        }
    }

    pub fn set_voice(&self, voice: &str) {
        self.current.lock().unwrap().voice = voice.to_string();
    }
}

impl SettingsPort for InMemorySettings {
    fn current(&self) -> SpeechSettings {
        self.current.lock().unwrap().clone()
    }

    fn update(&self, settings: SpeechSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        *self.current.lock().unwrap() = settings;
        Ok(())
    }
}

#[derive(Default)]
pub struct MapTextSource {
    documents: HashMap<String, String>,
    reads: AtomicUsize,
}

impl MapTextSource {
    pub fn new(documents: &[(&str, &str)]) -> Self {
        Self {
            documents: documents
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextSourcePort for MapTextSource {
    async fn read(&self, document: &str) -> Result<String, TextSourceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.documents
            .get(document)
            .cloned()
            .ok_or_else(|| TextSourceError::NotFound(document.to_string()))
    }
}

pub struct MockCatalog {
    voices: Option<Vec<VoiceDescriptor>>,
    seen_credentials: Mutex<Vec<SpeechCredentials>>,
}

impl MockCatalog {
    pub fn with_voices(voices: Vec<VoiceDescriptor>) -> Self {
        Self {
            voices: Some(voices),
            seen_credentials: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            voices: None,
            seen_credentials: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_credentials(&self) -> Vec<SpeechCredentials> {
        self.seen_credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl VoiceCatalogPort for MockCatalog {
    async fn list_voices(
        &self,
        credentials: &SpeechCredentials,
    ) -> Result<Vec<VoiceDescriptor>, CatalogError> {
        self.seen_credentials.lock().unwrap().push(credentials.clone());
        self.voices
            .clone()
            .ok_or_else(|| CatalogError::Unauthorized("HTTP 401".to_string()))
    }
}
