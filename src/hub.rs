//! BroadcastHub actor implementation
//!
//! The central actor owning the message store, the connection registry and
//! the client table. Commands are processed one at a time to completion, so
//! none of that state needs a lock.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::client::{fan_out, Client, Clients};
use crate::error::AppError;
use crate::message::ServerMessage;
use crate::registry::ConnectionRegistry;
use crate::store::{ChatMessage, MessageStore};
use crate::typing::TypingRelay;
use crate::types::ClientId;

/// Commands sent from handlers to the BroadcastHub actor
#[derive(Debug)]
pub enum HubCommand {
    /// New client connected
    Connect {
        client_id: ClientId,
        sender: mpsc::UnboundedSender<ServerMessage>,
    },
    /// Client disconnected
    Disconnect { client_id: ClientId },
    /// Submit a chat message
    Send {
        client_id: ClientId,
        author: String,
        text: String,
        request_id: Option<u64>,
    },
    /// Client is typing
    Typing { client_id: ClientId, author: String },
    /// Read the current history
    History {
        reply: oneshot::Sender<Vec<ChatMessage>>,
    },
}

/// The BroadcastHub actor
pub struct BroadcastHub {
    /// Bounded message history
    store: MessageStore,
    /// Open connection count
    registry: ConnectionRegistry,
    /// Typing signal relay
    typing: TypingRelay,
    /// All connected clients: ClientId -> Client
    clients: Clients,
    /// Command receiver channel
    receiver: mpsc::Receiver<HubCommand>,
}

impl BroadcastHub {
    /// Create a hub over the given store and registry
    pub fn new(
        store: MessageStore,
        registry: ConnectionRegistry,
        receiver: mpsc::Receiver<HubCommand>,
    ) -> Self {
        Self {
            store,
            registry,
            typing: TypingRelay,
            clients: Clients::new(),
            receiver,
        }
    }

    /// Run the hub event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!(
            "BroadcastHub started (history capacity {})",
            self.store.capacity()
        );

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("BroadcastHub shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Connect { client_id, sender } => {
                self.handle_connect(client_id, sender);
            }
            HubCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
            }
            HubCommand::Send {
                client_id,
                author,
                text,
                request_id,
            } => {
                self.handle_send(client_id, &author, &text, request_id);
            }
            HubCommand::Typing { client_id, author } => {
                self.handle_typing(client_id, &author);
            }
            HubCommand::History { reply } => {
                let _ = reply.send(self.store.get_all());
            }
        }
    }

    /// Handle new client connection
    ///
    /// History goes to the new client before the count, so it is always the
    /// first event that client sees.
    fn handle_connect(&mut self, client_id: ClientId, sender: mpsc::UnboundedSender<ServerMessage>) {
        let client = Client::new(client_id, sender);
        if let Err(e) = client.send(ServerMessage::HistoryInit {
            messages: self.store.get_all(),
        }) {
            debug!("History for client {} not queued: {}", client_id, e);
        }
        self.clients.insert(client_id, client);

        let count = self.registry.increment();
        info!("Client {} connected ({} online)", client_id, count);
        self.broadcast(ServerMessage::PresenceCount { count });
    }

    /// Handle client disconnection
    fn handle_disconnect(&mut self, client_id: ClientId) {
        if self.clients.remove(&client_id).is_none() {
            debug!("Disconnect for unknown client {}", client_id);
        }

        let count = self.registry.decrement();
        info!("Client {} disconnected ({} online)", client_id, count);
        self.broadcast(ServerMessage::PresenceCount { count });
    }

    /// Handle chat message submission
    fn handle_send(&mut self, client_id: ClientId, author: &str, text: &str, request_id: Option<u64>) {
        if !self.clients.contains_key(&client_id) {
            debug!("Dropping send from disconnected client {}", client_id);
            return;
        }

        let outcome = self.store.add(author, text);

        match &outcome {
            Ok(message) => {
                debug!("Message {} accepted from {}", message.id, client_id);
                self.broadcast(ServerMessage::MessageNew {
                    message: message.clone(),
                });
            }
            Err(e) => {
                debug!("Message from {} rejected: {}", client_id, e);
            }
        }

        let Some(reply) = ServerMessage::send_reply(&outcome, request_id) else {
            return;
        };
        if let Some(client) = self.clients.get(&client_id) {
            if let Err(e) = client.send(reply) {
                debug!("Reply for client {} not queued: {}", client_id, e);
            }
        }
    }

    /// Handle typing indicator
    fn handle_typing(&mut self, client_id: ClientId, author: &str) {
        if !self.clients.contains_key(&client_id) {
            debug!("Dropping typing signal from disconnected client {}", client_id);
            return;
        }

        let relayed = self.typing.relay(client_id, author, &self.clients);
        debug!("Typing signal from {} relayed to {} clients", client_id, relayed);
    }

    /// Helper: Send a message to every connected client
    fn broadcast(&self, msg: ServerMessage) {
        fan_out(&self.clients, &msg, None);
    }
}

/// Cloneable handle for submitting commands to the hub
#[derive(Debug, Clone)]
pub struct HubHandle {
    sender: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Wrap a command sender
    pub fn new(sender: mpsc::Sender<HubCommand>) -> Self {
        Self { sender }
    }

    /// Create a hub and its handle; the caller spawns [`BroadcastHub::run`]
    pub fn create(
        store: MessageStore,
        registry: ConnectionRegistry,
        buffer: usize,
    ) -> (BroadcastHub, HubHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(buffer);
        (BroadcastHub::new(store, registry, cmd_rx), HubHandle::new(cmd_tx))
    }

    /// Submit a command
    pub async fn send(&self, cmd: HubCommand) -> Result<(), AppError> {
        self.sender.send(cmd).await.map_err(|_| AppError::ChannelSend)
    }

    /// Fetch a snapshot of the history
    pub async fn history(&self) -> Result<Vec<ChatMessage>, AppError> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::History { reply }).await?;
        rx.await.map_err(|_| AppError::HubUnavailable)
    }
}
