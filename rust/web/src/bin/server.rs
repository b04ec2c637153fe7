//! Hand evaluation service binary
//!
//! Usage: cargo run -p showdown_web --bin showdown-server -- --port 8000

use clap::Parser;
use showdown_web::{config, init_logging, ServerArgs, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = ServerArgs::parse();
    let resolved = config::load(&args)?;
    let config = resolved.config;

    init_logging(config.log_format)?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        cors_origin = %config.cors_origin,
        history_limit = config.history_limit,
        journal = ?config.journal,
        sources = ?resolved.sources,
        "starting hand service"
    );

    let server = WebServer::new(config)?;
    let handle = server.start().await?;

    tracing::info!("serving on http://{}, press Ctrl+C to stop", handle.address());

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down");
    handle.shutdown().await?;

    Ok(())
}
