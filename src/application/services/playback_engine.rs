//! Playback Engine - 播放状态机
//!
//! 独占唯一的音频资源，协调异步合成、缓冲与播放控制。
//!
//! 并发模型：
//! - 状态保存在 `std::sync::Mutex` 中，绝不跨 `.await` 持有
//! - 合成调用由 `tokio::sync::Mutex<()>` 串行化，任一时刻最多一个在途请求
//! - 每次 play 递增 generation；迟到的合成结果与结束信号只有在 generation 仍为当前值时才生效
//! - 当前状态通过 `watch` 通道发布；每一次状态切换（含短暂的 Failed / Completed）另经 `broadcast` 发布
//! - play 的调用方中途放弃时，仍属于当前 generation 的 Loading 会收尾为 Failed -> Idle

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch, Mutex as AsyncMutex};

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioHandle, AudioOutputPort, PlaybackEnded, SpeechSynthesizerPort,
};
use crate::domain::playback::{AudioPayload, PlaybackState, Utterance};

const TRANSITION_CAPACITY: usize = 64;

pub type PlaybackCallback = Box<dyn FnOnce() + Send + 'static>;

/// play 的回调
#[derive(Default)]
pub struct PlaybackHooks {
    on_started: Option<PlaybackCallback>,
    on_complete: Option<PlaybackCallback>,
}

impl PlaybackHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进入 Playing 时调用，与状态切换在同一把锁内执行，不得阻塞
    pub fn on_started(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_started = Some(Box::new(callback));
        self
    }

    /// 音频自然播放完毕时调用，最多一次
    pub fn on_complete(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

/// play 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// 已开始播放
    Started,
    /// 等待合成期间被新的 play 或 stop 取代，结果已丢弃
    Superseded,
}

struct Inner {
    state: PlaybackState,
    generation: u64,
    handle: Option<Box<dyn AudioHandle>>,
    payload: Option<Arc<AudioPayload>>,
    utterance: Option<Utterance>,
}

struct Shared {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<PlaybackState>,
    transition_tx: broadcast::Sender<PlaybackState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, inner: &mut Inner, next: PlaybackState) {
        if inner.state == next {
            return;
        }
        if !inner.state.can_transition_to(next) {
            tracing::warn!(
                from = %inner.state,
                to = %next,
                generation = inner.generation,
                "Rejected invalid playback transition"
            );
            return;
        }

        tracing::debug!(
            from = %inner.state,
            to = %next,
            generation = inner.generation,
            "Playback state changed"
        );
        inner.state = next;
        // 没有订阅者时发送失败，忽略即可
        let _ = self.transition_tx.send(next);
        self.state_tx.send_replace(next);
    }

    /// 停止并释放当前资源，回到 Idle，同时使所有在途请求失效
    fn teardown(&self, inner: &mut Inner) {
        if let Some(mut handle) = inner.handle.take() {
            handle.stop();
        }
        inner.payload = None;
        inner.utterance = None;
        inner.generation = inner.generation.wrapping_add(1);
        self.transition(inner, PlaybackState::Idle);
    }

    /// Loading 以失败收尾：Failed -> Idle
    fn fail_loading(&self, inner: &mut Inner) {
        self.transition(inner, PlaybackState::Failed);
        self.transition(inner, PlaybackState::Idle);
    }
}

/// play 的 future 被 drop 时生效
///
/// 只处理仍为当前 generation 且停留在 Loading 的情况；正常返回的路径都已离开 Loading
/// 或已被新的 generation 取代，此时什么也不做。
struct LoadingGuard {
    shared: Arc<Shared>,
    generation: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut inner = self.shared.lock();
        if inner.generation != self.generation || inner.state != PlaybackState::Loading {
            return;
        }
        tracing::warn!(
            generation = self.generation,
            "Playback request abandoned while loading"
        );
        self.shared.fail_loading(&mut inner);
    }
}

/// 播放引擎
pub struct PlaybackEngine {
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    output: Arc<dyn AudioOutputPort>,
    shared: Arc<Shared>,
    synthesis_slot: AsyncMutex<()>,
}

impl PlaybackEngine {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        output: Arc<dyn AudioOutputPort>,
    ) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::Idle);
        let (transition_tx, _) = broadcast::channel(TRANSITION_CAPACITY);
        Self {
            synthesizer,
            output,
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: PlaybackState::Idle,
                    generation: 0,
                    handle: None,
                    payload: None,
                    utterance: None,
                }),
                state_tx,
                transition_tx,
            }),
            synthesis_slot: AsyncMutex::new(()),
        }
    }

    /// 合成并播放一段语句
    ///
    /// 先同步拆除旧资源，再发起合成。合成期间若有新的 play 或 stop，
    /// 本次结果在到达时被丢弃并返回 `PlayOutcome::Superseded`。
    /// 调用方在合成期间放弃等待（future 被 drop）时，本次请求以 Failed -> Idle 收尾。
    pub async fn play(
        &self,
        utterance: Utterance,
        hooks: PlaybackHooks,
    ) -> Result<PlayOutcome, ApplicationError> {
        let generation = {
            let mut inner = self.shared.lock();
            self.shared.teardown(&mut inner);
            self.shared.transition(&mut inner, PlaybackState::Loading);
            inner.generation
        };
        let _guard = LoadingGuard {
            shared: Arc::clone(&self.shared),
            generation,
        };

        tracing::info!(
            generation,
            voice = %utterance.voice(),
            chars = utterance.char_count(),
            "Playback requested"
        );

        let synthesized = {
            let _slot = self.synthesis_slot.lock().await;
            if !self.is_current(generation) {
                tracing::debug!(generation, "Request superseded before synthesis");
                return Ok(PlayOutcome::Superseded);
            }
            self.synthesizer.synthesize(&utterance).await
        };

        let payload = match synthesized {
            Ok(payload) => payload,
            Err(e) => {
                let mut inner = self.shared.lock();
                if inner.generation != generation {
                    tracing::debug!(generation, error = %e, "Ignoring failure of superseded request");
                    return Ok(PlayOutcome::Superseded);
                }
                tracing::warn!(generation, error = %e, "Speech synthesis failed");
                self.shared.fail_loading(&mut inner);
                return Err(e.into());
            }
        };

        if !self.is_current(generation) {
            tracing::info!(
                generation,
                bytes = payload.len(),
                "Discarding late synthesis result"
            );
            return Ok(PlayOutcome::Superseded);
        }

        let payload = Arc::new(payload);
        let opened = self.output.open(&payload).await;

        let mut inner = self.shared.lock();
        if inner.generation != generation {
            if let Ok(mut handle) = opened {
                handle.stop();
            }
            tracing::info!(generation, "Discarding audio resource of superseded request");
            return Ok(PlayOutcome::Superseded);
        }

        let mut handle = match opened {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(generation, error = %e, "Failed to open audio resource");
                self.shared.fail_loading(&mut inner);
                return Err(e.into());
            }
        };

        let ended = handle.on_end();
        handle.play();

        tracing::info!(
            generation,
            bytes = payload.len(),
            container = payload.container().extension(),
            "Playback started"
        );

        inner.handle = Some(handle);
        inner.payload = Some(payload);
        inner.utterance = Some(utterance);
        self.shared.transition(&mut inner, PlaybackState::Playing);
        if let Some(on_started) = hooks.on_started {
            on_started();
        }
        drop(inner);

        match ended {
            Some(ended) => self.watch_completion(generation, ended, hooks.on_complete),
            None => tracing::warn!(
                generation,
                "Audio handle has no end signal, completion will not be reported"
            ),
        }

        Ok(PlayOutcome::Started)
    }

    /// Playing -> Paused，其他状态下为空操作
    pub fn pause(&self) -> bool {
        let mut inner = self.shared.lock();
        if inner.state != PlaybackState::Playing {
            tracing::debug!(state = %inner.state, "Pause ignored");
            return false;
        }
        if let Some(handle) = inner.handle.as_mut() {
            handle.pause();
        }
        self.shared.transition(&mut inner, PlaybackState::Paused);
        true
    }

    /// Paused -> Playing，复用已缓冲的资源，不会重新合成
    pub fn resume(&self) -> bool {
        let mut inner = self.shared.lock();
        if inner.state != PlaybackState::Paused {
            tracing::debug!(state = %inner.state, "Resume ignored");
            return false;
        }
        if let Some(handle) = inner.handle.as_mut() {
            handle.play();
        }
        self.shared.transition(&mut inner, PlaybackState::Playing);
        true
    }

    /// 停止播放并释放资源
    ///
    /// Loading 状态下同样有效：在途的合成结果到达后会被丢弃。
    pub fn stop(&self) -> bool {
        let mut inner = self.shared.lock();
        if !inner.state.is_active() {
            tracing::debug!(state = %inner.state, "Stop ignored");
            return false;
        }
        let previous = inner.state;
        self.shared.teardown(&mut inner);
        tracing::info!(from = %previous, "Playback stopped");
        true
    }

    pub fn state(&self) -> PlaybackState {
        self.shared.lock().state
    }

    pub fn is_playing(&self) -> bool {
        self.state().is_playing()
    }

    pub fn is_paused(&self) -> bool {
        self.state().is_paused()
    }

    /// 订阅当前状态（只保证看到最新值）
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.shared.state_tx.subscribe()
    }

    /// 订阅每一次状态切换
    pub fn subscribe_transitions(&self) -> broadcast::Receiver<PlaybackState> {
        self.shared.transition_tx.subscribe()
    }

    /// 播放周期计数（每次 play / stop 递增）
    pub fn generation(&self) -> u64 {
        self.shared.lock().generation
    }

    /// 当前持有的音频数据
    pub fn current_payload(&self) -> Option<Arc<AudioPayload>> {
        self.shared.lock().payload.clone()
    }

    pub fn current_utterance(&self) -> Option<Utterance> {
        self.shared.lock().utterance.clone()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.shared.lock().generation == generation
    }

    fn watch_completion(
        &self,
        generation: u64,
        ended: PlaybackEnded,
        on_complete: Option<PlaybackCallback>,
    ) {
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            if ended.await.is_err() {
                tracing::debug!(generation, "Audio released before reaching the end");
                return;
            }

            {
                let mut inner = shared.lock();
                if inner.generation != generation || inner.state != PlaybackState::Playing {
                    tracing::debug!(
                        generation,
                        state = %inner.state,
                        "Ignoring stale end-of-audio signal"
                    );
                    return;
                }
                shared.transition(&mut inner, PlaybackState::Completed);
                inner.handle = None;
                inner.payload = None;
                inner.utterance = None;
            }

            tracing::info!(generation, "Playback completed");
            if let Some(on_complete) = on_complete {
                on_complete();
            }

            let mut inner = shared.lock();
            if inner.generation == generation && inner.state == PlaybackState::Completed {
                shared.transition(&mut inner, PlaybackState::Idle);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        no_hooks, wait_for_state, MockAudioOutput, MockSynthesizer,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn utterance(text: &str) -> Utterance {
        Utterance::new(text, "en-US-AriaNeural").unwrap()
    }

    fn engine(
        synthesizer: Arc<MockSynthesizer>,
        output: Arc<MockAudioOutput>,
    ) -> Arc<PlaybackEngine> {
        Arc::new(PlaybackEngine::new(synthesizer, output))
    }

    async fn wait_for_calls(synthesizer: &MockSynthesizer, calls: usize) {
        for _ in 0..200 {
            if synthesizer.calls() >= calls {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("synthesizer never reached {} calls", calls);
    }

    fn drain(rx: &mut broadcast::Receiver<PlaybackState>) -> Vec<PlaybackState> {
        let mut seen = Vec::new();
        while let Ok(state) = rx.try_recv() {
            seen.push(state);
        }
        seen
    }

    async fn wait_for_generation(engine: &PlaybackEngine, generation: u64) {
        for _ in 0..200 {
            if engine.generation() >= generation {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("engine never reached generation {}", generation);
    }

    #[tokio::test]
    async fn test_play_reaches_playing() {
        let synth = Arc::new(MockSynthesizer::new());
        let output = Arc::new(MockAudioOutput::new());
        let engine = engine(synth.clone(), output.clone());

        let outcome = engine.play(utterance("hello"), no_hooks()).await.unwrap();

        assert_eq!(outcome, PlayOutcome::Started);
        assert_eq!(engine.state(), PlaybackState::Playing);
        assert!(engine.is_playing());
        assert_eq!(synth.calls(), 1);
        assert_eq!(output.opened_count(), 1);
        assert_eq!(output.last().unwrap().events(), vec!["play"]);
        assert_eq!(engine.current_payload().unwrap().data(), b"hello");
    }

    #[tokio::test]
    async fn test_pause_resume_reuses_buffer() {
        let synth = Arc::new(MockSynthesizer::new());
        let output = Arc::new(MockAudioOutput::new());
        let engine = engine(synth.clone(), output.clone());

        engine.play(utterance("hello"), no_hooks()).await.unwrap();

        assert!(engine.pause());
        assert!(engine.is_paused());
        assert!(engine.resume());
        assert!(engine.is_playing());

        assert_eq!(synth.calls(), 1);
        assert_eq!(output.opened_count(), 1);
        assert_eq!(output.last().unwrap().events(), vec!["play", "pause", "play"]);
    }

    #[tokio::test]
    async fn test_invalid_transitions_are_noops() {
        let synth = Arc::new(MockSynthesizer::new());
        let output = Arc::new(MockAudioOutput::new());
        let engine = engine(synth, output);

        assert!(!engine.pause());
        assert!(!engine.resume());
        assert!(!engine.stop());
        assert_eq!(engine.state(), PlaybackState::Idle);

        engine.play(utterance("hello"), no_hooks()).await.unwrap();
        assert!(!engine.resume());
        assert_eq!(engine.state(), PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_stop_releases_payload() {
        let synth = Arc::new(MockSynthesizer::new());
        let output = Arc::new(MockAudioOutput::new());
        let engine = engine(synth, output.clone());
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        engine
            .play(
                utterance("hello"),
                PlaybackHooks::new().on_complete(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await
            .unwrap();
        engine.pause();

        assert!(engine.stop());
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(engine.current_payload().is_none());

        let handle = output.last().unwrap();
        assert_eq!(handle.events(), vec!["play", "pause", "stop"]);
        // 停止后结束信号已失效
        assert!(!handle.finish());
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_natural_completion_fires_once_then_idle() {
        let synth = Arc::new(MockSynthesizer::new());
        let output = Arc::new(MockAudioOutput::new());
        let engine = engine(synth, output.clone());
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        engine
            .play(
                utterance("hello"),
                PlaybackHooks::new().on_complete(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await
            .unwrap();

        let mut states = engine.subscribe();
        assert!(output.last().unwrap().finish());
        wait_for_state(&mut states, PlaybackState::Idle).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(engine.current_payload().is_none());
        assert!(!output.last().unwrap().finish());
    }

    #[tokio::test]
    async fn test_concurrent_play_keeps_only_latest() {
        let (synth, gates) = MockSynthesizer::gated(2);
        let synth = Arc::new(synth);
        let output = Arc::new(MockAudioOutput::new());
        let engine = engine(synth.clone(), output.clone());

        let first_engine = engine.clone();
        let first = tokio::spawn(async move {
            first_engine.play(utterance("first"), no_hooks()).await
        });
        wait_for_calls(&synth, 1).await;

        let second_engine = engine.clone();
        let second = tokio::spawn(async move {
            second_engine.play(utterance("second"), no_hooks()).await
        });
        wait_for_generation(&engine, 2).await;

        let mut gates = gates.into_iter();
        gates.next().unwrap().send(()).unwrap();
        assert_eq!(first.await.unwrap().unwrap(), PlayOutcome::Superseded);

        wait_for_calls(&synth, 2).await;
        gates.next().unwrap().send(()).unwrap();
        assert_eq!(second.await.unwrap().unwrap(), PlayOutcome::Started);

        assert_eq!(synth.calls(), 2);
        assert_eq!(output.opened_count(), 1);
        assert_eq!(output.last().unwrap().payload(), b"second".to_vec());
        assert_eq!(engine.current_payload().unwrap().data(), b"second");
        assert_eq!(engine.state(), PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_replay_tears_down_previous_resource() {
        let synth = Arc::new(MockSynthesizer::new());
        let output = Arc::new(MockAudioOutput::new());
        let engine = engine(synth, output.clone());

        engine.play(utterance("first"), no_hooks()).await.unwrap();
        let first = output.last().unwrap();
        engine.play(utterance("second"), no_hooks()).await.unwrap();

        assert_eq!(first.events(), vec!["play", "stop"]);
        assert_eq!(output.opened_count(), 2);
        assert_eq!(engine.current_payload().unwrap().data(), b"second");
    }

    #[tokio::test]
    async fn test_stop_during_loading_discards_result() {
        let (synth, gates) = MockSynthesizer::gated(1);
        let synth = Arc::new(synth);
        let output = Arc::new(MockAudioOutput::new());
        let engine = engine(synth.clone(), output.clone());

        let play_engine = engine.clone();
        let pending = tokio::spawn(async move {
            play_engine.play(utterance("late"), no_hooks()).await
        });
        wait_for_calls(&synth, 1).await;
        assert_eq!(engine.state(), PlaybackState::Loading);

        assert!(engine.stop());
        assert_eq!(engine.state(), PlaybackState::Idle);

        for gate in gates {
            gate.send(()).unwrap();
        }
        assert_eq!(pending.await.unwrap().unwrap(), PlayOutcome::Superseded);
        assert_eq!(output.opened_count(), 0);
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(engine.current_payload().is_none());
    }

    #[tokio::test]
    async fn test_synthesis_failure_returns_to_idle() {
        let synth = Arc::new(MockSynthesizer::failing());
        let output = Arc::new(MockAudioOutput::new());
        let engine = engine(synth, output.clone());
        let mut transitions = engine.subscribe_transitions();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let result = engine
            .play(
                utterance("hello"),
                PlaybackHooks::new().on_complete(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await;

        assert!(matches!(result, Err(ApplicationError::SynthesisFailed(_))));
        assert_eq!(
            drain(&mut transitions),
            vec![
                PlaybackState::Loading,
                PlaybackState::Failed,
                PlaybackState::Idle
            ]
        );
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(engine.current_payload().is_none());
        assert_eq!(output.opened_count(), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_abandoned_play_settles_to_idle() {
        let (synth, gates) = MockSynthesizer::gated(1);
        let synth = Arc::new(synth);
        let output = Arc::new(MockAudioOutput::new());
        let engine = engine(synth.clone(), output.clone());

        let play_engine = engine.clone();
        let pending = tokio::spawn(async move {
            play_engine.play(utterance("dropped"), no_hooks()).await
        });
        wait_for_calls(&synth, 1).await;
        assert_eq!(engine.state(), PlaybackState::Loading);
        let mut transitions = engine.subscribe_transitions();

        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());
        drop(gates);

        assert_eq!(engine.state(), PlaybackState::Idle);
        assert_eq!(
            drain(&mut transitions),
            vec![PlaybackState::Failed, PlaybackState::Idle]
        );
        assert_eq!(output.opened_count(), 0);

        // 之后的请求不受影响
        let outcome = engine.play(utterance("next"), no_hooks()).await.unwrap();
        assert_eq!(outcome, PlayOutcome::Started);
        assert_eq!(engine.state(), PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_started_hook_runs_before_completion() {
        let synth = Arc::new(MockSynthesizer::new());
        let output = Arc::new(MockAudioOutput::new());
        let engine = engine(synth, output.clone());
        let order = Arc::new(Mutex::new(Vec::new()));
        let started = order.clone();
        let completed = order.clone();

        engine
            .play(
                utterance("hello"),
                PlaybackHooks::new()
                    .on_started(move || started.lock().unwrap().push("started"))
                    .on_complete(move || completed.lock().unwrap().push("completed")),
            )
            .await
            .unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["started"]);

        let mut transitions = engine.subscribe_transitions();
        let mut states = engine.subscribe();
        assert!(output.last().unwrap().finish());
        wait_for_state(&mut states, PlaybackState::Idle).await;

        assert_eq!(*order.lock().unwrap(), vec!["started", "completed"]);
        assert_eq!(
            drain(&mut transitions),
            vec![PlaybackState::Completed, PlaybackState::Idle]
        );
    }

    #[tokio::test]
    async fn test_backend_failure_returns_to_idle() {
        let synth = Arc::new(MockSynthesizer::new());
        let output = Arc::new(MockAudioOutput::failing());
        let engine = engine(synth, output);

        let result = engine.play(utterance("hello"), no_hooks()).await;

        assert!(matches!(
            result,
            Err(ApplicationError::PlaybackBackendError(_))
        ));
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(engine.current_payload().is_none());
    }
}
