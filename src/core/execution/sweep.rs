use crate::core::errors::SimulationError;
use crate::core::execution::config::{ConcurrencyMode, SessionConfig, SweepConfig};
use crate::core::execution::session::Session;
use crate::core::snapshot::Snapshot;
use log::info;
use rayon::prelude::*;

/// Final state of one seeded session in a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub seed: u64,
    pub snapshot: Snapshot,
}

/// Run one independent session per seed for `steps` steps each
///
/// Results come back in seed order whatever the concurrency mode, and each
/// session is identical to running it alone with the same seed.
pub fn run_sweep(
    session_config: &SessionConfig,
    sweep_config: &SweepConfig,
    seeds: &[u64],
    steps: usize,
) -> Result<Vec<SweepResult>, SimulationError> {
    if seeds.is_empty() {
        return Err(SimulationError::InvalidConfiguration(
            "sweep needs at least one seed".to_string(),
        ));
    }
    if steps == 0 {
        return Err(SimulationError::InvalidConfiguration(
            "batch size must be positive".to_string(),
        ));
    }
    session_config.validate()?;

    let run_one = |seed: &u64| -> Result<SweepResult, SimulationError> {
        let config = session_config.clone().with_seed(Some(*seed));
        let mut session = Session::new(config)?;
        let snapshot = session.run(steps)?;
        Ok(SweepResult { seed: *seed, snapshot })
    };

    let results = match sweep_config.concurrency_mode {
        ConcurrencyMode::Sequential => seeds.iter().map(run_one).collect::<Result<Vec<_>, _>>()?,
        ConcurrencyMode::Rayon => match sweep_config.thread_pool_size {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|err| SimulationError::InvalidConfiguration(err.to_string()))?;
                pool.install(|| seeds.par_iter().map(run_one).collect::<Result<Vec<_>, _>>())?
            }
            None => seeds.par_iter().map(run_one).collect::<Result<Vec<_>, _>>()?,
        },
    };

    info!(
        "Sweep finished: {} sessions x {} steps ({:?})",
        results.len(),
        steps,
        sweep_config.concurrency_mode
    );
    Ok(results)
}

/// `count` consecutive seeds starting at `base`
///
/// Fails instead of wrapping when the range runs past `u64::MAX`.
pub fn sweep_seeds(base: u64, count: u64) -> Result<Vec<u64>, SimulationError> {
    (0..count)
        .map(|offset| {
            base.checked_add(offset).ok_or_else(|| {
                SimulationError::InvalidConfiguration(format!(
                    "{} seeds starting at {} overflow u64",
                    count, base
                ))
            })
        })
        .collect()
}

/// Mean efficiency across a sweep, 0 for an empty slice
pub fn mean_efficiency(results: &[SweepResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|result| result.snapshot.efficiency()).sum::<f64>() / results.len() as f64
}
