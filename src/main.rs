//! blackswan server binary

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blackswan::api::{create_router, AppState};
use blackswan::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, rejected) = AppConfig::load_with_report().context("failed to load configuration")?;

    init_tracing(&config)?;

    for var in &rejected {
        tracing::warn!(%var, "Ignoring malformed environment value; using default");
    }

    tracing::info!(
        mode = %config.server.mode,
        database = %config.database.host,
        redis = %config.redis.addr(),
        llm_provider = %config.llm.provider,
        llm_model = %config.llm.model,
        "Configuration loaded",
    );
    tracing::debug!(
        read_timeout_secs = config.server.read_timeout.as_secs(),
        idle_timeout_secs = config.server.idle_timeout.as_secs(),
        "Connection timeouts are not enforced by the listener",
    );

    let config = Arc::new(config);
    let router = create_router(AppState::new(config.clone()));

    // Start server
    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.default_log_filter()))
        .unwrap_or_else(|_| EnvFilter::new("blackswan=info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.is_release() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
