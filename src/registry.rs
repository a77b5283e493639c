//! Connection counter
//!
//! Tracks how many connections are open. Socket handles belong to the
//! transport; only the count lives here.

use tracing::warn;

/// Count of currently open connections
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    count: usize,
}

impl ConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection and return the updated count
    pub fn increment(&mut self) -> usize {
        self.count += 1;
        self.count
    }

    /// Record a closed connection and return the updated count
    ///
    /// An unmatched disconnect clamps at zero and logs a warning.
    pub fn decrement(&mut self) -> usize {
        match self.count.checked_sub(1) {
            Some(count) => self.count = count,
            None => warn!("Connection registry underflow: disconnect without matching connect"),
        }
        self.count
    }

    /// Current count
    pub fn current(&self) -> usize {
        self.count
    }
}
