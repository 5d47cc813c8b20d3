// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration
//!
//! Every option can be given as a command-line flag or an environment
//! variable; a `.env` file in the working directory is loaded first.

use crate::api::{ApiConfig, DEFAULT_MAX_TASKS};
use crate::embeddings::{EmbeddingModelConfig, HashingConfig};
use crate::similarity::ModelBackendConfig;
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Model backend selection
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Sentence transformer through ONNX Runtime
    Onnx,
    /// Deterministic averaged word vectors, no model files needed
    Hashing,
}

/// Pairwise text similarity over HTTP
#[derive(Parser, Debug, Clone)]
#[command(name = "similarity-service")]
#[command(version)]
#[command(about = "HTTP service scoring pairwise semantic similarity of text snippets", long_about = None)]
pub struct ServiceConfig {
    /// Interface to bind
    #[arg(long, env = "SIMILARITY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "SIMILARITY_PORT", default_value_t = 1717)]
    pub port: u16,

    /// Verbose logging and model error details in 500 responses
    #[arg(long, env = "SIMILARITY_DEBUG")]
    pub debug: bool,

    /// Which model computes similarity
    #[arg(long, env = "SIMILARITY_BACKEND", value_enum, default_value = "onnx")]
    pub backend: Backend,

    /// Name reported for the loaded model
    #[arg(long, env = "EMBEDDING_MODEL_NAME", default_value = "all-MiniLM-L6-v2")]
    pub model_name: String,

    /// ONNX model file
    #[arg(
        long,
        env = "EMBEDDING_MODEL_PATH",
        default_value = "./models/all-MiniLM-L6-v2-onnx/model.onnx"
    )]
    pub model_path: PathBuf,

    /// Tokenizer JSON file
    #[arg(
        long,
        env = "EMBEDDING_TOKENIZER_PATH",
        default_value = "./models/all-MiniLM-L6-v2-onnx/tokenizer.json"
    )]
    pub tokenizer_path: PathBuf,

    /// Independent ONNX sessions shared round-robin across requests
    #[arg(long, env = "EMBEDDING_SESSION_POOL_SIZE", default_value_t = 1)]
    pub session_pool_size: usize,

    /// ONNX Runtime intra-op threads per session
    #[arg(long, env = "EMBEDDING_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// Token limit per text; longer texts are truncated
    #[arg(long, env = "EMBEDDING_MAX_LENGTH", default_value_t = 256)]
    pub max_length: usize,

    /// Vector length of the hashing backend
    #[arg(long, env = "HASHING_DIMENSION", default_value_t = 384)]
    pub hashing_dimension: usize,

    /// Reject requests with more tasks than this
    #[arg(long, env = "SIMILARITY_MAX_TASKS", default_value_t = DEFAULT_MAX_TASKS)]
    pub max_tasks: usize,
}

impl ServiceConfig {
    /// Loads `.env` then parses flags and environment
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::parse()
    }

    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;

        if self.session_pool_size == 0 {
            bail!("session pool size must be greater than 0");
        }
        if self.intra_threads == 0 {
            bail!("intra threads must be greater than 0");
        }
        if self.max_length == 0 {
            bail!("max length must be greater than 0");
        }
        if self.hashing_dimension == 0 {
            bail!("hashing dimension must be greater than 0");
        }
        if self.max_tasks == 0 {
            bail!("max tasks must be greater than 0");
        }

        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid host address: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn api_config(&self) -> Result<ApiConfig> {
        Ok(ApiConfig {
            listen_addr: self.listen_addr()?,
            max_tasks: self.max_tasks,
            enable_error_details: self.debug,
        })
    }

    pub fn backend_config(&self) -> ModelBackendConfig {
        match self.backend {
            Backend::Onnx => ModelBackendConfig::Onnx(EmbeddingModelConfig {
                name: self.model_name.clone(),
                model_path: self.model_path.clone(),
                tokenizer_path: self.tokenizer_path.clone(),
                session_pool_size: self.session_pool_size,
                intra_threads: self.intra_threads,
                max_length: self.max_length,
                expected_dimension: None,
            }),
            Backend::Hashing => ModelBackendConfig::Hashing(HashingConfig {
                name: "hashing".to_string(),
                dimension: self.hashing_dimension,
            }),
        }
    }

    /// Default tracing filter when `RUST_LOG` is unset
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
