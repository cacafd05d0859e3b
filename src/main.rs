//! website-generator: MCP server for provisioning website projects
//!
//! Speaks JSON-RPC on stdin/stdout; all logging goes to stderr.

use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use website_generator::domain::{CredentialSource, EnvCredentialSource};
use website_generator::services::McpServer;
use website_generator::{App, ServerConfig};

/// Initialize logging with RUST_LOG environment variable support
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();

    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = ServerConfig::load(Some(&working_dir)).context("failed to load configuration")?;

    tracing::info!(
        "Starting website-generator in {:?} (template: {})",
        config.workspace.root,
        config.template.url
    );

    let credentials = Arc::new(EnvCredentialSource::new(config.github.token_env.clone()));
    if credentials.resolve().is_none() {
        tracing::error!(
            "{} is not set. The server cannot communicate with the GitHub API; \
             repository operations will fail until it is provided.",
            credentials.var()
        );
    }

    let app =
        App::with_credentials(&config, credentials).context("failed to initialize services")?;
    let server = McpServer::new(Arc::new(app), App::server_info());

    tokio::select! {
        res = server.serve_stdio() => res?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down gracefully");
        }
    }

    Ok(())
}
