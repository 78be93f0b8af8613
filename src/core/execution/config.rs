//! Configuration for conveyor sessions and multi-seed sweeps
//!
//! This module provides the configuration types that size a session (belt,
//! worker pool, assembly latency), choose its randomness, and control how
//! sweeps over many seeds are executed.

use crate::core::errors::SimulationError;
use crate::core::source::EntryDistribution;
use crate::core::worker::DeliveryPolicy;
use serde::{Deserialize, Serialize};

/// Configuration for a single simulation session
///
/// All sizes are validated by [`SessionConfig::validate`] when a session is
/// created; invalid values are rejected, never clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of belt positions
    pub belt_length: usize,
    /// Number of workers in the pool
    pub worker_count: usize,
    /// Steps from starting an assembly until the product is ready
    pub assembly_steps: u32,
    /// Seed for the belt entry draws; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// How new belt items are drawn
    pub distribution: EntryDistribution,
    /// What happens to a product with no free delivery position
    pub delivery_policy: DeliveryPolicy,
}

impl SessionConfig {
    /// Create a configuration with default values
    ///
    /// Defaults: 10 positions, 3 workers, 4-step assembly, seed 42,
    /// uniform entry draws, products dropped when the belt is full.
    pub fn new() -> Self {
        Self {
            belt_length: 10,
            worker_count: 3,
            assembly_steps: 4,
            seed: Some(42),
            distribution: EntryDistribution::default(),
            delivery_policy: DeliveryPolicy::default(),
        }
    }

    pub fn with_belt_length(mut self, length: usize) -> Self {
        self.belt_length = length;
        self
    }

    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    pub fn with_assembly_steps(mut self, steps: u32) -> Self {
        self.assembly_steps = steps;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_distribution(mut self, distribution: EntryDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_delivery_policy(mut self, policy: DeliveryPolicy) -> Self {
        self.delivery_policy = policy;
        self
    }

    /// Check every size parameter
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.belt_length == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "belt_length must be positive".to_string(),
            ));
        }
        if self.worker_count == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "worker_count must be positive".to_string(),
            ));
        }
        if self.assembly_steps < 2 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "assembly_steps must be at least 2, got {}",
                self.assembly_steps
            )));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Enumeration of supported concurrency modes for sweeps
///
/// Each session always steps on a single thread; the mode only decides
/// whether independent sessions run side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Sessions run one after another on the calling thread
    #[default]
    Sequential,
    /// Sessions run concurrently on a Rayon pool
    Rayon,
}

/// Configuration for sweep execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// The concurrency mode to use for execution
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel execution
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl SweepConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency mode for the sweep
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}
