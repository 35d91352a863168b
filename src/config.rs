use std::num::NonZeroUsize;
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

/// Default bound on candidates waiting for a matcher
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Settings for one search, fixed before the pipeline starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of matcher workers. Capped at the available parallelism.
    pub workers: usize,
    /// Capacity of the bounded candidate queue
    pub queue_capacity: usize,
    /// Cancel the search once this much time has passed
    pub timeout: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            workers: available_parallelism(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            timeout: None,
        }
    }
}

impl SearchConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Worker count actually spawned
    pub fn effective_workers(&self) -> usize {
        let cores = available_parallelism();
        if self.workers > cores {
            warn!(
                "Requested {} workers, but only {} cores are available",
                self.workers, cores
            );
            return cores;
        }
        self.workers.max(1)
    }
}

pub fn available_parallelism() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SearchConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert!(config.workers >= 1);
    }

    #[test]
    fn test_rejects_zero_values() {
        let config = SearchConfig::default();
        assert_eq!(
            config.clone().with_workers(0).validate(),
            Err(ConfigError::NoWorkers)
        );
        assert_eq!(
            config.with_queue_capacity(0).validate(),
            Err(ConfigError::ZeroCapacity)
        );
    }

    #[test]
    fn test_workers_capped_by_cores() {
        let config = SearchConfig::default().with_workers(usize::MAX);
        assert_eq!(config.effective_workers(), available_parallelism());
        assert_eq!(SearchConfig::default().with_workers(1).effective_workers(), 1);
    }
}
