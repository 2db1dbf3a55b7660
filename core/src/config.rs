//! Generator configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::channel::ChannelConfig;
use crate::signal::Signal;

/// Default number of error messages kept for the run summary
pub const DEFAULT_ERROR_SAMPLE_LIMIT: usize = 10;

/// Default interval between progress reports
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Generator configuration
///
/// Parallelism is fixed for the life of a generator; nothing here can be
/// changed once the generator is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of concurrent workers
    pub parallelism: usize,

    /// OS signals that put the generator into draining-cancel state.
    /// Empty means signals are ignored.
    #[serde(default)]
    pub signals: Vec<Signal>,

    /// Queue sizes
    #[serde(default)]
    pub channels: ChannelConfig,

    /// Maximum number of error messages retained in the summary
    #[serde(default = "default_error_sample_limit")]
    pub error_sample_limit: usize,

    /// Interval between progress reports; `None` disables them
    #[serde(default = "default_progress_interval")]
    pub progress_interval: Option<Duration>,
}

fn default_error_sample_limit() -> usize {
    DEFAULT_ERROR_SAMPLE_LIMIT
}

fn default_progress_interval() -> Option<Duration> {
    Some(DEFAULT_PROGRESS_INTERVAL)
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            parallelism: 1,
            signals: Vec::new(),
            channels: ChannelConfig::default(),
            error_sample_limit: DEFAULT_ERROR_SAMPLE_LIMIT,
            progress_interval: Some(DEFAULT_PROGRESS_INTERVAL),
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with the given parallelism
    pub fn new(parallelism: usize) -> Self {
        Self {
            parallelism,
            ..Default::default()
        }
    }

    /// Arm signal-triggered cancellation for the given signals
    pub fn with_signals(mut self, signals: impl IntoIterator<Item = Signal>) -> Self {
        self.signals = signals.into_iter().collect();
        self
    }

    /// Set the channel configuration
    pub fn with_channels(mut self, channels: ChannelConfig) -> Self {
        self.channels = channels;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parallelism == 0 {
            return Err(ConfigError::InvalidParallelism(self.parallelism));
        }

        if self.channels.work_buffer == 0 {
            return Err(ConfigError::InvalidBuffer("work_buffer"));
        }

        if self.channels.result_buffer == 0 {
            return Err(ConfigError::InvalidBuffer("result_buffer"));
        }

        if self.progress_interval == Some(Duration::ZERO) {
            return Err(ConfigError::InvalidProgressInterval);
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Parallelism must be a positive integer
    #[error("invalid parallelism {0}: must be at least 1")]
    InvalidParallelism(usize),

    /// A channel buffer was configured with zero capacity
    #[error("invalid {0}: must be at least 1")]
    InvalidBuffer(&'static str),

    /// Progress interval of zero would spin the collector
    #[error("invalid progress interval: must be greater than zero")]
    InvalidProgressInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.parallelism, 1);
        assert!(config.signals.is_empty());
        assert_eq!(config.error_sample_limit, 10);
        assert_eq!(config.progress_interval, Some(Duration::from_secs(1)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder_pattern() {
        let config = GeneratorConfig::new(8)
            .with_signals(Signal::defaults())
            .with_channels(ChannelConfig::default().with_work_buffer(64));

        assert_eq!(config.parallelism, 8);
        assert_eq!(config.signals, vec![Signal::Interrupt, Signal::Terminate]);
        assert_eq!(config.channels.work_buffer, 64);
    }

    #[test]
    fn test_config_validation_zero_parallelism() {
        let config = GeneratorConfig::new(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidParallelism(0)));
    }

    #[test]
    fn test_config_validation_zero_buffers() {
        let config =
            GeneratorConfig::new(1).with_channels(ChannelConfig::default().with_work_buffer(0));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBuffer("work_buffer"))
        );

        let config =
            GeneratorConfig::new(1).with_channels(ChannelConfig::default().with_result_buffer(0));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBuffer("result_buffer"))
        );
    }

    #[test]
    fn test_config_validation_zero_progress_interval() {
        let mut config = GeneratorConfig::new(1);
        config.progress_interval = Some(Duration::ZERO);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidProgressInterval)
        );

        config.progress_interval = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"parallelism": 4, "signals": ["interrupt"]}"#).unwrap();

        assert_eq!(config.parallelism, 4);
        assert_eq!(config.signals, vec![Signal::Interrupt]);
        assert_eq!(config.channels, ChannelConfig::default());
        assert_eq!(config.error_sample_limit, DEFAULT_ERROR_SAMPLE_LIMIT);
        assert_eq!(config.progress_interval, Some(DEFAULT_PROGRESS_INTERVAL));
    }
}
