// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use similarity_service::{
    api::ApiServer, build_similarity_model, config::ServiceConfig, version,
};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::load();

    // RUST_LOG wins over the debug flag
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting {}", version::get_version_string());
    info!("Features: {}", version::FEATURES.join(", "));
    config.validate()?;

    info!("Loading {:?} similarity backend...", config.backend);
    let model = build_similarity_model(config.backend_config())
        .await
        .context("Failed to load similarity model")?;

    let server = ApiServer::new(config.api_config()?, model).await?;
    let addr = server.local_addr();
    info!("Similarity service ready");
    info!("  Similarities: POST http://{}/similarities", addr);
    info!("  Health:       GET  http://{}/health", addr);

    shutdown_signal().await;
    info!("Shutting down...");
    server.shutdown().await?;

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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
}
