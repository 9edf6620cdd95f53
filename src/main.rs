use anyhow::{Context, Result};
use clap::Parser;
use meetline::{
    create_router, AppState, Config, MemoryStorage, NatsTranscription, OpenAiSuggestionService,
    SessionRegistry, SessionSettings, Storage, SuggestionInvoker, WavAudioArchive,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "meetline", about = "Live meeting transcription with reply suggestions")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/meetline")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);

    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

    let transcription = Arc::new(NatsTranscription::new(
        cfg.nats.url.as_str(),
        cfg.session.sample_rate,
        cfg.session.channels,
    ));

    let api_key = std::env::var(&cfg.suggestion.api_key_env).unwrap_or_default();
    if api_key.is_empty() {
        warn!(
            "{} is not set; suggestion calls will return fallback text",
            cfg.suggestion.api_key_env
        );
    }
    let suggester = SuggestionInvoker::new(Arc::new(OpenAiSuggestionService::new(
        cfg.suggestion.base_url.as_str(),
        api_key,
        cfg.suggestion.model.as_str(),
    )))
    .with_timeout(Duration::from_secs(cfg.suggestion.timeout_secs));

    let archive = Arc::new(WavAudioArchive::new(
        &cfg.archive.path,
        cfg.session.sample_rate,
        cfg.session.channels,
    )?);

    let registry = SessionRegistry::new(
        Arc::clone(&storage),
        transcription,
        suggester,
        archive,
        SessionSettings {
            audio_queue_depth: cfg.session.audio_queue_depth,
        },
    );

    let app = create_router(AppState { registry, storage });

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
