//! Channel configuration for generator communication

use serde::{Deserialize, Serialize};

/// Default capacity of the work queue (enumerator -> workers)
pub const DEFAULT_WORK_BUFFER: usize = 1_000;

/// Default capacity of the result channel (workers -> collector)
pub const DEFAULT_RESULT_BUFFER: usize = 10_000;

/// Channel buffer configuration for generator communication
///
/// `work_buffer` is the memory bound of the whole run: however many tokens
/// the enumerator produces, at most this many wait in the queue at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Work queue capacity (enumerator -> workers)
    pub work_buffer: usize,

    /// Result channel buffer size (workers -> collector)
    pub result_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            work_buffer: DEFAULT_WORK_BUFFER,
            result_buffer: DEFAULT_RESULT_BUFFER,
        }
    }
}

impl ChannelConfig {
    /// Create a new channel config with a custom work queue capacity
    pub fn with_work_buffer(mut self, size: usize) -> Self {
        self.work_buffer = size;
        self
    }

    /// Create a new channel config with a custom result buffer size
    pub fn with_result_buffer(mut self, size: usize) -> Self {
        self.result_buffer = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_config_default() {
        let config = ChannelConfig::default();
        assert_eq!(config.work_buffer, 1_000);
        assert_eq!(config.result_buffer, 10_000);
    }

    #[test]
    fn test_channel_config_builder() {
        let config = ChannelConfig::default()
            .with_work_buffer(16)
            .with_result_buffer(5000);
        assert_eq!(config.work_buffer, 16);
        assert_eq!(config.result_buffer, 5000);
    }
}
