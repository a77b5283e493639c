//! Typing indicator relay

use crate::client::{fan_out, Clients};
use crate::message::ServerMessage;
use crate::types::ClientId;

/// Stateless rebroadcast of typing signals
///
/// No buffering, deduplication or rate limiting: every signal received is
/// relayed once. Display debouncing is left to clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypingRelay;

impl TypingRelay {
    /// Forward `author` to every client except `origin`
    ///
    /// Returns the number of clients the signal was queued for.
    pub fn relay(&self, origin: ClientId, author: &str, clients: &Clients) -> usize {
        let msg = ServerMessage::TypingBroadcast {
            author: author.to_string(),
        };
        fan_out(clients, &msg, Some(origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use tokio::sync::mpsc;

    #[test]
    fn test_relay_excludes_origin() {
        let mut clients = Clients::new();
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = mpsc::unbounded_channel();
            let id = ClientId::new();
            clients.insert(id, Client::new(id, tx));
            receivers.push((id, rx));
        }
        let origin = receivers[0].0;

        assert_eq!(TypingRelay.relay(origin, "Ann", &clients), 2);

        for (id, rx) in receivers.iter_mut() {
            if *id == origin {
                assert!(rx.try_recv().is_err());
            } else {
                assert_eq!(
                    rx.try_recv().unwrap(),
                    ServerMessage::TypingBroadcast {
                        author: "Ann".to_string()
                    }
                );
            }
        }
    }

    #[test]
    fn test_burst_relayed_unchanged() {
        let mut clients = Clients::new();
        let origin = ClientId::new();
        let (origin_tx, _origin_rx) = mpsc::unbounded_channel();
        clients.insert(origin, Client::new(origin, origin_tx));
        let other = ClientId::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        clients.insert(other, Client::new(other, tx));

        for _ in 0..5 {
            TypingRelay.relay(origin, "Ann", &clients);
        }

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 5);
    }
}
