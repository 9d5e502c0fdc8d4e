use anyhow::Result;
use clap::Parser;
use dhikr_counter::{
    create_router, is_supported_language, AppState, Config, ListenerConfig, NatsRecognitionEngine,
    PhraseStore, RecognitionEngine, RecognitionSupervisor,
};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "dhikr-counter")]
#[command(about = "Voice-driven phrase tally counter")]
struct Args {
    /// Path to the config file (without extension)
    #[arg(short, long, default_value = "config/dhikr-counter")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Recognition language: {}", cfg.recognition.language);

    if !is_supported_language(&cfg.recognition.language) {
        warn!(
            "Language {} is not in the supported set; passing it to the engine anyway",
            cfg.recognition.language
        );
    }

    let engine = NatsRecognitionEngine::connect(&cfg.recognition.nats_url).await?;
    let engine: Arc<dyn RecognitionEngine> = Arc::new(engine);

    let store = Arc::new(Mutex::new(PhraseStore::load(&cfg.storage.phrases_path)));

    let supervisor = Arc::new(RecognitionSupervisor::new(
        engine,
        ListenerConfig {
            language: cfg.recognition.language.clone(),
        },
    ));

    {
        let store = store.lock().await;
        supervisor.set_phrases(store.phrase_texts()).await;
    }

    // Matches flow through a channel to the task that owns the store update,
    // so the callback itself stays synchronous.
    let (match_tx, mut match_rx) = mpsc::unbounded_channel::<String>();
    supervisor
        .set_on_match(Arc::new(move |phrase: &str| {
            let _ = match_tx.send(phrase.to_string());
        }))
        .await;

    let counter_store = Arc::clone(&store);
    tokio::spawn(async move {
        while let Some(phrase) = match_rx.recv().await {
            let mut store = counter_store.lock().await;
            if store.record_match(&phrase) {
                info!("Counted \"{}\" (total {})", phrase, store.total_count());
            } else {
                warn!("Matched phrase \"{}\" is no longer in the list", phrase);
            }
        }
    });

    let state = AppState::new(Arc::clone(&supervisor), store);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    supervisor.shutdown().await;
    info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
