//! HTTP server command

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use roomctl_core::AppConfig;
use roomctl_server::db::{close_pool, create_pool};
use roomctl_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 0.0.0.0:$PORT)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server until Ctrl+C / SIGTERM.
pub async fn run_serve(args: ServeArgs, config: &AppConfig) -> Result<()> {
    let mut server = ServerConfig::on_port(config.port);
    if let Some(bind) = args.bind {
        server.bind_addr = bind;
    }
    server.cors_permissive = args.cors_permissive;

    tracing::info!(
        environment = %config.environment,
        database = config.db.database_name(),
        "Starting roomctl server on {}",
        server.bind_addr
    );

    let pool = create_pool(&config.db)
        .await
        .context("Failed to create database pool")?;

    // Run server (blocks until shutdown)
    let result = run_server(pool.clone(), server).await.context("Server error");
    close_pool(pool).await;
    result
}
