//! HTTP server command
//!
//! Resolves configuration, picks the record backend and runs the server
//! until shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use labsite_server::{provider_from_config, run_server, AppState, UploadStore};

use crate::config::LabsiteConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[arg(long, short = 'b', env = "LABSITE_BIND")]
    pub bind: Option<SocketAddr>,

    /// PostgreSQL connection string (overrides config file)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory uploaded images are written to (default: ./profile)
    #[arg(long, env = "LABSITE_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// URL segment the upload directory is served under (default: profile)
    #[arg(long)]
    pub public_path: Option<String>,

    /// Open a fresh database connection per request instead of pooling
    #[arg(long)]
    pub no_pool: bool,

    /// Pool size (ignored with --no-pool)
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Keep records in memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub in_memory: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maximum request body size in bytes, uploads included
    #[arg(long, value_name = "BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// Config file (default: ./labsite.toml when present)
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ServeArgs {
    /// Overlay flags and environment values onto a loaded config.
    pub fn apply_to(&self, config: &mut LabsiteConfig) {
        if let Some(bind) = self.bind {
            config.server.bind_addr = bind;
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
        if let Some(secs) = self.timeout {
            config.server.request_timeout_secs = secs;
        }
        if let Some(bytes) = self.max_upload_bytes {
            config.server.max_upload_bytes = bytes;
        }
        if let Some(url) = &self.database_url {
            config.database.url = Some(url.clone());
        }
        if self.no_pool {
            config.database.pooled = false;
        }
        if let Some(max) = self.max_connections {
            config.database.max_connections = max;
        }
        if let Some(dir) = &self.upload_dir {
            config.storage.upload_dir = dir.clone();
        }
        if let Some(path) = &self.public_path {
            config.storage.public_path = path.clone();
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = LabsiteConfig::load(args.config.as_deref())?;
    args.apply_to(&mut config);

    let uploads = UploadStore::new(&config.storage);

    let state = if args.in_memory {
        tracing::warn!("Using in-memory records; nothing survives a restart");
        AppState::in_memory(uploads)
    } else {
        let database_url = config.database.url.as_deref().context(
            "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, \
             labsite.toml, or ~/.labsite/.env",
        )?;
        let provider = provider_from_config(database_url, &config.database)
            .context("Invalid database configuration")?;
        AppState::postgres(provider, uploads)
    };

    tracing::info!("Starting labsite server on {}", config.server.bind_addr);

    // Run server (blocks until shutdown)
    run_server(state, config.server)
        .await
        .context("Server error")?;

    Ok(())
}
