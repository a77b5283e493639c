//! Client struct definition
//!
//! Represents a connected client and its outbound event channel.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::SendError;
use crate::message::ServerMessage;
use crate::types::ClientId;

/// Connected clients keyed by id
pub type Clients = HashMap<ClientId, Client>;

/// Connected client
///
/// The sender is unbounded so that fan-out from the hub never waits on a
/// slow connection.
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this client
    pub id: ClientId,
    /// Server → Client message channel
    pub sender: mpsc::UnboundedSender<ServerMessage>,
}

impl Client {
    /// Create a new client with the given ID and sender channel
    pub fn new(id: ClientId, sender: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self { id, sender }
    }

    /// Queue a message for this client
    ///
    /// Returns an error if the channel is closed (client disconnected).
    pub fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender.send(msg).map_err(|_| SendError::ChannelClosed)
    }
}

/// Queue `msg` for every client except `skip`, returning how many accepted it
///
/// Closed channels are skipped; their disconnect is handled separately.
pub fn fan_out(clients: &Clients, msg: &ServerMessage, skip: Option<ClientId>) -> usize {
    let mut delivered = 0;
    for client in clients.values() {
        if Some(client.id) == skip {
            continue;
        }
        match client.send(msg.clone()) {
            Ok(()) => delivered += 1,
            Err(e) => debug!("Skipping client {}: {}", client.id, e),
        }
    }
    delivered
}
