use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;

use whisper_relay::application::ports::JobRegistry;
use whisper_relay::application::services::{
    ExecutorOptions, JobExecutor, JobRetention, JobWorker, SubmissionService, job_queue,
};
use whisper_relay::infrastructure::audio::TranscriptionEngineFactory;
use whisper_relay::infrastructure::callback::HttpCallbackDispatcher;
use whisper_relay::infrastructure::observability::{TracingConfig, init_tracing};
use whisper_relay::infrastructure::persistence::InMemoryJobRegistry;
use whisper_relay::infrastructure::storage::ArtifactStoreFactory;
use whisper_relay::presentation::{
    ApiKeyAuthenticator, AppState, Environment, Settings, create_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let settings = Arc::new(Settings::load(environment)?);

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));

    let registry: Arc<dyn JobRegistry> = Arc::new(InMemoryJobRegistry::new());

    let artifact_store = ArtifactStoreFactory::create(&settings.storage)?;
    match artifact_store.purge().await {
        Ok(0) => {}
        Ok(purged) => tracing::info!(purged, "Removed artifacts left by a previous run"),
        Err(e) => tracing::warn!(error = %e, "Failed to purge leftover artifacts"),
    }

    let transcription_engine = TranscriptionEngineFactory::create(&settings.transcription)?;
    tracing::info!(provider = ?settings.transcription.provider, "Transcription engine ready");

    let callback_dispatcher = Arc::new(HttpCallbackDispatcher::new(Duration::from_secs(
        settings.callback.timeout_secs,
    ))?);

    let executor = Arc::new(JobExecutor::new(
        Arc::clone(&registry),
        Arc::clone(&artifact_store),
        Arc::clone(&transcription_engine),
        callback_dispatcher,
        ExecutorOptions {
            transcription_timeout: settings
                .jobs
                .transcription_timeout_secs
                .map(Duration::from_secs),
            notify_on_failure: settings.callback.notify_on_failure,
        },
    ));

    let (scheduler, receiver) = job_queue(settings.jobs.queue_capacity);
    let worker = tokio::spawn(JobWorker::new(receiver, executor, settings.jobs.max_concurrent).run());

    let (retention_shutdown, retention_rx) = watch::channel(false);
    let retention = tokio::spawn(
        JobRetention::new(
            Arc::clone(&registry),
            Duration::from_secs(settings.jobs.retention_secs),
            Duration::from_secs(settings.jobs.sweep_interval_secs.max(1)),
        )
        .run(retention_rx),
    );

    let submission_service = Arc::new(SubmissionService::new(
        Arc::clone(&registry),
        Arc::clone(&artifact_store),
        scheduler,
        settings.callback.required,
    ));

    let authenticator =
        ApiKeyAuthenticator::new(&settings.auth.api_key, &settings.auth.header_name)?;

    let state = AppState {
        submission_service,
        job_registry: registry,
        transcription_engine,
        authenticator,
        settings: Arc::clone(&settings),
    };

    let router = create_router(state);

    let listener =
        TcpListener::bind((settings.server.host.as_str(), settings.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped, waiting for in-flight jobs");
    let _ = retention_shutdown.send(true);
    worker.await?;
    retention.await?;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
