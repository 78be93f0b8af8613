pub mod config;
pub mod session;
pub mod sweep;

// Re-export commonly used types
pub use config::{ConcurrencyMode, SessionConfig, SweepConfig};
pub use session::{create_session, Session};
pub use sweep::{mean_efficiency, run_sweep, sweep_seeds, SweepResult};
