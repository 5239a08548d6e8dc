//! Readaloud - 文档朗读服务
//!
//! 启动顺序: 配置 → 日志 → 适配器 → 播放引擎 → 控制器 → HTTP 服务

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use readaloud::application::{
    AudioOutputPort, PlaybackController, PlaybackEngine, SettingsPort, SpeechSynthesizerPort,
    TextSourcePort, VoiceCatalogService,
};
use readaloud::config::{
    load_config, print_config, AppConfig, AudioBackend, AudioConfig, LogConfig, SynthesisBackend,
};
use readaloud::infrastructure::adapters::{
    AzureEndpoint, AzureTtsClient, AzureTtsClientConfig, AzureVoiceClient, FakeTtsClient,
    FakeTtsClientConfig, FileTextSource, RodioAudioOutput, SilentAudioOutput,
};
use readaloud::infrastructure::http::{AppState, HttpServer};
use readaloud::infrastructure::{EventPublisher, FileSettingsStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 已保存的朗读配置 > 配置文件 > 默认值）
    let config = load_config().context("Failed to load config")?;

    init_tracing(&config.log);

    tracing::info!("Readaloud {}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 朗读配置（可通过 API 修改并保存）
    let settings: Arc<dyn SettingsPort> = Arc::new(FileSettingsStore::new(
        config.speech.clone(),
        config.settings.path.clone(),
    ));

    let synthesizer = build_synthesizer(&config, settings.clone())?;
    let audio_output = build_audio_output(&config.audio)?;

    let text_source: Arc<dyn TextSourcePort> = match &config.documents.root {
        Some(root) => Arc::new(FileTextSource::rooted(root)),
        None => Arc::new(FileTextSource::unrestricted()),
    };

    // 播放引擎与状态事件
    let engine = Arc::new(PlaybackEngine::new(synthesizer, audio_output));
    let event_publisher = EventPublisher::new().arc();
    let forwarder = event_publisher.forward_states(engine.subscribe_transitions());

    let controller = Arc::new(PlaybackController::new(
        engine,
        settings.clone(),
        event_publisher.clone(),
        text_source,
    ));

    // 语音目录
    let voice_client = AzureVoiceClient::new(
        AzureEndpoint::from_option(config.synthesis.endpoint.as_deref()),
        config.synthesis.timeout_secs,
    )?;
    let catalog = Arc::new(VoiceCatalogService::new(
        Arc::new(voice_client),
        settings.clone(),
        event_publisher.clone(),
    ));
    if settings.current().credentials().is_complete() {
        let catalog = catalog.clone();
        tokio::spawn(async move {
            catalog.refresh().await;
        });
    } else {
        tracing::warn!("Speech API key not configured; voice list stays empty until settings are updated");
    }

    let state = AppState::new(controller.clone(), catalog, settings, event_publisher);
    let server = HttpServer::new(config.server.clone(), state);

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await
        .context("HTTP server failed")?;

    // 释放音频资源
    controller.force_stop();
    forwarder.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},readaloud={},tower_http=debug",
            log.level, log.level
        ))
    });

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_synthesizer(
    config: &AppConfig,
    settings: Arc<dyn SettingsPort>,
) -> anyhow::Result<Arc<dyn SpeechSynthesizerPort>> {
    let synthesis = &config.synthesis;
    match synthesis.backend {
        SynthesisBackend::Azure => {
            let client_config = AzureTtsClientConfig::default()
                .with_endpoint(AzureEndpoint::from_option(synthesis.endpoint.as_deref()))
                .with_output_format(synthesis.output_format)
                .with_timeout(synthesis.timeout_secs);
            Ok(Arc::new(AzureTtsClient::new(client_config, settings)?))
        }
        SynthesisBackend::Fake => {
            let mut client_config =
                FakeTtsClientConfig::default().with_latency(synthesis.fake_latency_ms);
            if let Some(path) = &synthesis.fake_audio_file {
                client_config = client_config.with_audio_file(path.clone());
            }
            Ok(Arc::new(FakeTtsClient::new(client_config)?))
        }
    }
}

fn build_audio_output(
    audio: &AudioConfig,
) -> anyhow::Result<Arc<dyn AudioOutputPort>> {
    match audio.backend {
        AudioBackend::Rodio => Ok(Arc::new(
            RodioAudioOutput::spawn(audio.volume).context("Failed to open audio device")?,
        )),
        AudioBackend::Silent => Ok(Arc::new(SilentAudioOutput::new())),
        AudioBackend::Auto => match RodioAudioOutput::spawn(audio.volume) {
            Ok(output) => Ok(Arc::new(output)),
            Err(e) => {
                tracing::warn!(error = %e, "No audio device available, falling back to silent output");
                Ok(Arc::new(SilentAudioOutput::new()))
            }
        },
    }
}
