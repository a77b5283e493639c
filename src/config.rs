//! Server configuration
//!
//! Command line flags, each with an environment variable fallback.

use std::path::PathBuf;

use clap::Parser;

use crate::store::DEFAULT_CAPACITY;

/// Default WebSocket listener address
pub const DEFAULT_WS_ADDR: &str = "127.0.0.1:8080";

/// Default HTTP listener address
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:3000";

#[derive(Parser, Debug, Clone)]
#[command(name = "broadcast_chat")]
#[command(about = "Real-time broadcast chat server", long_about = None)]
pub struct ServerConfig {
    /// Address of the WebSocket listener
    #[arg(long, env = "CHAT_WS_ADDR", default_value = DEFAULT_WS_ADDR)]
    pub ws_addr: String,

    /// Address of the HTTP listener (health, history, static files)
    #[arg(long, env = "CHAT_HTTP_ADDR", default_value = DEFAULT_HTTP_ADDR)]
    pub http_addr: String,

    /// Number of messages kept in history
    #[arg(
        long,
        env = "CHAT_HISTORY_CAPACITY",
        default_value_t = DEFAULT_CAPACITY,
        value_parser = parse_capacity
    )]
    pub capacity: usize,

    /// Directory of static files served over HTTP
    #[arg(long, env = "CHAT_PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,
}

/// Parse a history capacity of at least one message
fn parse_capacity(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("capacity must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
