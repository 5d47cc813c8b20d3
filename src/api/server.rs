// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::http_server::{create_app, AppState};
use crate::similarity::SimilarityModel;

/// Task limit per request. Results grow with the square of the task count,
/// so 1000 tasks already yield 499500 pairs.
pub const DEFAULT_MAX_TASKS: usize = 1000;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: SocketAddr,
    /// Upper bound on tasks per request
    pub max_tasks: usize,
    /// Include model error chains in 500 responses
    pub enable_error_details: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 1717)),
            max_tasks: DEFAULT_MAX_TASKS,
            enable_error_details: false,
        }
    }
}

/// Running HTTP server; dropped or shut down to stop serving
pub struct ApiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

impl ApiServer {
    /// Binds the listener and starts serving in the background
    pub async fn new(config: ApiConfig, model: Arc<dyn SimilarityModel>) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind(config.listen_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
        let addr = listener.local_addr()?;

        let app = create_app(AppState::new(model, config));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!("Similarity API listening on {}", addr);

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops accepting connections and waits for in-flight requests
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(handle) = self.handle.take() {
            match handle.await {
                Ok(result) => result.context("HTTP server failed")?,
                Err(e) => warn!("HTTP server task ended abnormally: {}", e),
            }
        }

        info!("Similarity API on {} stopped", self.addr);
        Ok(())
    }
}
