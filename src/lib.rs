pub mod core;

// Re-export commonly used types
pub use crate::core::belt::Belt;
pub use crate::core::errors::SimulationError;
pub use crate::core::execution::{
    create_session, run_sweep, ConcurrencyMode, Session, SessionConfig, SweepConfig, SweepResult,
};
pub use crate::core::snapshot::{Snapshot, WorkerSnapshot};
pub use crate::core::source::{EntryDistribution, ItemSource, RandomSource, ScriptedSource};
pub use crate::core::types::{Component, Hands, Slot};
pub use crate::core::worker::{DeliveryPolicy, Worker, WorkerState};
