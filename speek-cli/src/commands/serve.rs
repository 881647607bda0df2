//! HTTP server command
//!
//! Wires the chosen storage backend into the feed service and runs the
//! server until shutdown.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use speek_server::db::{create_pool_with_options, migrations, PoolOptions};
use speek_server::http::{run_server, ServerConfig};
use speek_server::{FeedService, MemoryRepository, PgRepository, Repository};

/// Storage backend behind the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// PostgreSQL via DATABASE_URL
    Postgres,
    /// Process-local, lost on exit
    Memory,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Storage backend
    #[arg(long, env = "SPEEK_STORAGE", value_enum, default_value_t = StorageKind::Postgres)]
    pub storage: StorageKind,

    /// Database URL (required for postgres storage)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "SPEEK_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Deadline in seconds for the storage work of one request
    #[arg(long, env = "SPEEK_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            cors_permissive: self.cors_permissive,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config();
    tracing::info!(storage = ?args.storage, "Starting speek server on {}", config.bind_addr);

    match args.storage {
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on exit");
            let repo = Arc::new(MemoryRepository::new());
            let service = FeedService::new(repo, config.request_timeout);
            run_server(service, config).await.context("Server error")?;
        }
        StorageKind::Postgres => {
            let database_url = args.database_url.context(
                "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.speek/.env",
            )?;

            let options = PoolOptions {
                max_connections: args.max_connections,
                ..PoolOptions::default()
            };
            let pool = create_pool_with_options(&database_url, options)
                .await
                .context("Failed to create database pool")?;

            migrations::run(&pool)
                .await
                .context("Failed to run migrations")?;

            let repo: Arc<dyn Repository> = Arc::new(PgRepository::new(pool.clone()));
            let service = FeedService::new(repo, config.request_timeout);

            // Run server (blocks until shutdown), then release connections
            let result = run_server(service, config).await;
            pool.close().await;
            result.context("Server error")?;
        }
    }

    Ok(())
}
