//! Broadcast Chat Server Library
//!
//! A real-time chat core built with tokio-tungstenite using the Actor
//! pattern for state management.
//!
//! # Features
//! - Bounded in-memory history (oldest message evicted past capacity)
//! - History pushed to each new connection
//! - Fan-out of every accepted message to all connections
//! - Presence count broadcast on connect and disconnect
//! - Typing signals relayed to everyone but the typist
//! - Optional per-message acknowledgments
//! - HTTP health check and history snapshot
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `BroadcastHub` is the central actor owning the store, the registry and
//!   the client table
//! - Each connection has a `handler` task communicating with the hub
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use broadcast_chat::{accept_loop, ConnectionRegistry, HubHandle, MessageStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (hub, handle) =
//!         HubHandle::create(MessageStore::default(), ConnectionRegistry::new(), 256);
//!
//!     tokio::spawn(hub.run());
//!     accept_loop(listener, handle).await;
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod hub;
pub mod message;
pub mod registry;
pub mod store;
pub mod typing;
pub mod types;

// Re-export main types for convenience
pub use client::Client;
pub use config::ServerConfig;
pub use error::{AppError, SendError, ValidationError};
pub use handler::{accept_loop, handle_connection};
pub use http::create_router;
pub use hub::{BroadcastHub, HubCommand, HubHandle};
pub use message::{ClientMessage, ServerMessage};
pub use registry::ConnectionRegistry;
pub use store::{ChatMessage, MessageStore};
pub use typing::TypingRelay;
pub use types::{ClientId, MessageId};
