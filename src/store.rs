//! Bounded in-memory message history
//!
//! `MessageStore` is an append-only log of `ChatMessage`s capped at a fixed
//! capacity. Appending past the cap evicts the oldest entry. Ids come from a
//! counter that is never reset, so they are never reused after eviction.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::debug;

use crate::error::ValidationError;
use crate::types::MessageId;

/// Default number of messages kept in history
pub const DEFAULT_CAPACITY: usize = 100;

/// Author label used when the submitted author is blank
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Source of epoch-millisecond timestamps
pub type Clock = fn() -> i64;

/// A stored chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Store-assigned, strictly increasing id
    pub id: MessageId,
    /// Trimmed author label, never empty
    pub author: String,
    /// Trimmed message text, never empty
    pub text: String,
    /// Epoch milliseconds captured by the store at append time
    pub timestamp: i64,
}

/// Wall clock in epoch milliseconds
pub fn system_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Capacity-bounded, append-only message log
#[derive(Debug)]
pub struct MessageStore {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
    next_id: MessageId,
    clock: Clock,
}

impl MessageStore {
    /// Create a store holding at most `capacity` messages (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, system_clock)
    }

    /// Create a store with an explicit timestamp source
    pub fn with_clock(capacity: usize, clock: Clock) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
            next_id: MessageId(1),
            clock,
        }
    }

    /// Validate and append a message, returning the stored copy
    ///
    /// Both fields are trimmed. Empty text is rejected without mutating the
    /// store; an empty author becomes [`ANONYMOUS_AUTHOR`].
    pub fn add(&mut self, author: &str, text: &str) -> Result<ChatMessage, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }

        let author = match author.trim() {
            "" => ANONYMOUS_AUTHOR,
            trimmed => trimmed,
        };

        let message = ChatMessage {
            id: self.next_id,
            author: author.to_string(),
            text: text.to_string(),
            timestamp: (self.clock)(),
        };
        self.next_id = self.next_id.next();

        self.messages.push_back(message.clone());
        while self.messages.len() > self.capacity {
            if let Some(evicted) = self.messages.pop_front() {
                debug!("Evicted message {} from history", evicted.id);
            }
        }

        Ok(message)
    }

    /// Snapshot of the history in chronological order
    pub fn get_all(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    /// Number of messages currently held
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if no message is held
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Maximum number of messages held
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
