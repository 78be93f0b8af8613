/// Errors surfaced by the simulation core
///
/// Dropped products and components falling off the belt are normal outcomes
/// and are reported through counters, never through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// A size or duration parameter is out of range
    InvalidConfiguration(String),
    /// Manual access to a worker index outside the pool
    WorkerNotFound(usize),
    /// A manual hand override would break the worker invariants
    InvalidHands(String),
    /// Manual access to a belt position past the exit
    SlotOutOfRange(usize),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            SimulationError::WorkerNotFound(index) => write!(f, "Worker {} not found", index),
            SimulationError::InvalidHands(msg) => write!(f, "Invalid hands: {}", msg),
            SimulationError::SlotOutOfRange(index) => write!(f, "Belt position {} out of range", index),
        }
    }
}

impl std::error::Error for SimulationError {}
