//! Builder pattern for Generator construction

use std::time::Duration;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::signal::Signal;

use super::executor::Generator;

/// Builder for creating a Generator with proper configuration
///
/// # Example
///
/// ```ignore
/// let generator = GeneratorBuilder::new(100)
///     .with_signal_handlers_for([Signal::Interrupt, Signal::Terminate])
///     .queue_capacity(500)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorBuilder {
    config: GeneratorConfig,
}

impl GeneratorBuilder {
    /// Create a new builder for `parallelism` workers
    pub fn new(parallelism: usize) -> Self {
        Self {
            config: GeneratorConfig::new(parallelism),
        }
    }

    /// Replace the full generator configuration
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Enter draining cancellation when any of `signals` is received
    pub fn with_signal_handlers_for(mut self, signals: impl IntoIterator<Item = Signal>) -> Self {
        self.config.signals = signals.into_iter().collect();
        self
    }

    /// Set the work queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.channels.work_buffer = capacity;
        self
    }

    /// Set the result channel capacity
    pub fn result_buffer(mut self, capacity: usize) -> Self {
        self.config.channels.result_buffer = capacity;
        self
    }

    /// Set how many error messages the summary keeps
    pub fn error_sample_limit(mut self, limit: usize) -> Self {
        self.config.error_sample_limit = limit;
        self
    }

    /// Set the progress report interval (`None` disables progress reports)
    pub fn progress_interval(mut self, interval: Option<Duration>) -> Self {
        self.config.progress_interval = interval;
        self
    }

    /// Build the generator
    ///
    /// # Errors
    ///
    /// Returns [`StressError::Config`](crate::StressError::Config) if
    /// configuration validation fails.
    pub fn build(self) -> Result<Generator> {
        Generator::from_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::error::StressError;

    #[test]
    fn test_builder_applies_settings() {
        let generator = GeneratorBuilder::new(8)
            .with_signal_handlers_for(Signal::defaults())
            .queue_capacity(16)
            .result_buffer(32)
            .error_sample_limit(3)
            .progress_interval(None)
            .build()
            .unwrap();

        let config = generator.config();
        assert_eq!(config.parallelism, 8);
        assert_eq!(config.signals, vec![Signal::Interrupt, Signal::Terminate]);
        assert_eq!(config.channels.work_buffer, 16);
        assert_eq!(config.channels.result_buffer, 32);
        assert_eq!(config.error_sample_limit, 3);
        assert!(config.progress_interval.is_none());
    }

    #[test]
    fn test_builder_rejects_zero_parallelism() {
        let err = GeneratorBuilder::new(0).build().unwrap_err();
        assert!(matches!(
            err,
            StressError::Config(ConfigError::InvalidParallelism(0))
        ));
    }

    #[test]
    fn test_builder_rejects_zero_queue() {
        let err = GeneratorBuilder::new(1).queue_capacity(0).build().unwrap_err();
        assert!(matches!(
            err,
            StressError::Config(ConfigError::InvalidBuffer("work_buffer"))
        ));
    }

    #[test]
    fn test_config_replaces_parallelism() {
        let generator = GeneratorBuilder::new(1)
            .config(GeneratorConfig::new(4))
            .build()
            .unwrap();
        assert_eq!(generator.parallelism(), 4);
        assert!(generator.config().signals.is_empty());
    }
}
