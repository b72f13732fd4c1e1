//! Reader configuration

use crate::constants::{DEFAULT_BUFFER_CAPACITY, MAX_FRAME_LEN};
use serde::{Deserialize, Serialize};

/// Options applied when opening a TDLPACK sequential file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Capacity of the buffer wrapped around files opened by path
    pub buffer_capacity: usize,

    /// Frames declaring a longer payload are rejected as corrupt
    pub max_frame_len: u32,
}

impl ReaderConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read buffer capacity
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set the frame length ceiling
    pub fn max_frame_len(mut self, len: u32) -> Self {
        self.max_frame_len = len;
        self
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_frame_len: MAX_FRAME_LEN,
        }
    }
}
