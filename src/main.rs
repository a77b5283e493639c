//! Broadcast Chat Server - Entry Point
//!
//! Starts the BroadcastHub actor, the HTTP API and the WebSocket listener.

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use broadcast_chat::{
    accept_loop, create_router, ConnectionRegistry, HubHandle, MessageStore, ServerConfig,
};

/// Channel buffer size for hub commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=broadcast_chat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("broadcast_chat=info")),
        )
        .init();

    let config = ServerConfig::parse();

    // Process-wide state, owned by the hub for the process lifetime
    let (hub, handle) = HubHandle::create(
        MessageStore::new(config.capacity),
        ConnectionRegistry::new(),
        CHANNEL_BUFFER_SIZE,
    );
    tokio::spawn(hub.run());

    let http_listener = TcpListener::bind(&config.http_addr).await?;
    info!("HTTP API listening on {}", config.http_addr);
    let router = create_router(handle.clone(), config.public_dir.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(http_listener, router).await {
            error!("HTTP server error: {}", e);
        }
    });

    let ws_listener = TcpListener::bind(&config.ws_addr).await?;
    info!("WebSocket Chat Server listening on {}", config.ws_addr);

    accept_loop(ws_listener, handle).await;

    Ok(())
}
