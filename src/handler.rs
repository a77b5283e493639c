//! WebSocket connection handler
//!
//! Handles individual client connections: WebSocket handshake,
//! event parsing, and bidirectional communication with the BroadcastHub.

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::hub::{HubCommand, HubHandle};
use crate::message::{ClientMessage, ServerMessage};
use crate::types::ClientId;

/// Accept WebSocket connections until the listener fails
///
/// Each connection gets its own handler task.
pub async fn accept_loop(listener: TcpListener, hub: HubHandle) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let hub = hub.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, hub).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Handle a new TCP connection
///
/// Performs WebSocket handshake, sets up bidirectional communication,
/// and manages the connection lifecycle.
pub async fn handle_connection(stream: TcpStream, hub: HubHandle) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let client_id = ClientId::new();
    info!("Client {} connected from {}", client_id, peer_addr);

    // Channel for hub -> client events
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Register with the hub; it pushes history and the new count
    if hub
        .send(HubCommand::Connect {
            client_id,
            sender: msg_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - hub closed", client_id);
        return Err(AppError::ChannelSend);
    }

    let hub_read = hub.clone();

    // Spawn read task (WebSocket -> HubCommand)
    let read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        let cmd = client_message_to_command(client_id, client_msg);
                        if hub_read.send(cmd).await.is_err() {
                            debug!("Hub closed, ending read task for {}", client_id);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Invalid event from {}: {}", client_id, e);
                    }
                },
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", client_id);
                    break;
                }
                Ok(Message::Ping(_)) => {
                    // Pong is handled automatically by tungstenite
                    debug!("Ping from {}", client_id);
                }
                Ok(Message::Pong(_)) => {
                    debug!("Pong from {}", client_id);
                }
                Ok(_) => {
                    // Binary or raw frames - ignore
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", client_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", client_id);
    });

    // Spawn write task (ServerMessage -> WebSocket)
    let write_task = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize event: {}", e);
                }
            }
        }
        debug!("Write task ended for client");

        let _ = ws_sender.close().await;
    });

    finish_connection(client_id, read_task, write_task, &hub).await;

    info!("Client {} disconnected", client_id);

    Ok(())
}

/// Wait for either task to end, stop the other, then report the disconnect
///
/// The surviving task is aborted first so that nothing reaches the hub on
/// behalf of this client after `Disconnect`.
async fn finish_connection(
    client_id: ClientId,
    read_task: JoinHandle<()>,
    write_task: JoinHandle<()>,
    hub: &HubHandle,
) {
    let read_abort = read_task.abort_handle();
    let write_abort = write_task.abort_handle();

    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", client_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", client_id);
        }
    }

    read_abort.abort();
    write_abort.abort();

    let _ = hub.send(HubCommand::Disconnect { client_id }).await;
}

/// Convert a ClientMessage to a HubCommand
fn client_message_to_command(client_id: ClientId, msg: ClientMessage) -> HubCommand {
    match msg {
        ClientMessage::Send {
            author,
            text,
            request_id,
        } => HubCommand::Send {
            client_id,
            author,
            text,
            request_id,
        },
        ClientMessage::Typing { author } => HubCommand::Typing { client_id, author },
    }
}
