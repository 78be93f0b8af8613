use crate::core::belt::Belt;
use crate::core::errors::SimulationError;
use crate::core::execution::config::SessionConfig;
use crate::core::snapshot::{Snapshot, WorkerSnapshot};
use crate::core::source::{ItemSource, RandomSource};
use crate::core::types::{Hands, Slot};
use crate::core::worker::{Delivery, Worker, WorkerAction};
use log::{debug, info, warn};

/// One simulation run: a belt, a worker pool and the source feeding the belt
///
/// Each call to [`Session::step`] runs a full tick before returning:
/// belt advance, worker evaluation in pool order, delivery placement in
/// pool order, snapshot.
pub struct Session {
    config: SessionConfig,
    belt: Belt,
    workers: Vec<Worker>,
    source: Box<dyn ItemSource + Send>,
    step_index: u64,
    dropped_products: u64,
}

/// Create a session fed by a [`RandomSource`] built from the config
pub fn create_session(config: SessionConfig) -> Result<Session, SimulationError> {
    Session::new(config)
}

impl Session {
    /// Create a session whose belt items come from a [`RandomSource`]
    /// seeded by `config.seed`
    pub fn new(config: SessionConfig) -> Result<Self, SimulationError> {
        let source = match config.seed {
            Some(seed) => RandomSource::new(seed, config.distribution),
            None => RandomSource::from_entropy(config.distribution),
        };
        Self::with_source(config, Box::new(source))
    }

    /// Create a session with an explicit item source
    pub fn with_source(
        config: SessionConfig,
        source: Box<dyn ItemSource + Send>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let belt = Belt::new(config.belt_length)?;
        let workers = (0..config.worker_count)
            .map(|index| Worker::new(index, config.assembly_steps))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Created session: belt_length={}, workers={}, assembly_steps={}, policy={:?}",
            config.belt_length, config.worker_count, config.assembly_steps, config.delivery_policy
        );

        Ok(Self {
            config,
            belt,
            workers,
            source,
            step_index: 0,
            dropped_products: 0,
        })
    }

    /// Run one tick and return the resulting snapshot
    pub fn step(&mut self) -> Snapshot {
        self.step_index += 1;

        let entering = self.source.next_item();
        let evicted = self.belt.advance(entering);

        let mut ready = Vec::new();
        for worker in &mut self.workers {
            if let WorkerAction::ProductReady = worker.evaluate(&mut self.belt) {
                ready.push(worker.index());
            }
        }

        for index in ready {
            let placed = self.belt.place_product();
            let worker = &mut self.workers[index];
            match worker.finish_product(placed, self.config.delivery_policy) {
                Delivery::Placed(position) => {
                    debug!("[Worker {}] Placed product at position {}", index, position);
                }
                Delivery::Dropped => {
                    self.dropped_products += 1;
                    warn!(
                        "[Worker {}] No free delivery position at step {}, product dropped",
                        index, self.step_index
                    );
                }
                Delivery::Held => {
                    debug!("[Worker {}] No free delivery position, holding product", index);
                }
            }
        }

        let snapshot = self.snapshot();
        debug!(
            "=== Step {} === in={} out={} belt=[{}] A={} B={} C={}",
            snapshot.step_index,
            entering,
            evicted,
            snapshot.belt_line(),
            snapshot.unused_a,
            snapshot.unused_b,
            snapshot.products_c
        );
        snapshot
    }

    /// Run `count` consecutive steps and return every snapshot in order
    pub fn step_batch(&mut self, count: usize) -> Result<Vec<Snapshot>, SimulationError> {
        if count == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "batch size must be positive".to_string(),
            ));
        }
        Ok((0..count).map(|_| self.step()).collect())
    }

    /// Run `count` consecutive steps keeping only the final snapshot
    pub fn run(&mut self, count: usize) -> Result<Snapshot, SimulationError> {
        if count == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "batch size must be positive".to_string(),
            ));
        }
        for _ in 1..count {
            self.step();
        }
        Ok(self.step())
    }

    /// Return belt, workers and every counter (step index included) to their
    /// initial state. The item source is not rewound.
    pub fn reset(&mut self) {
        self.belt.reset();
        self.workers.iter_mut().for_each(Worker::reset);
        self.step_index = 0;
        self.dropped_products = 0;
        info!("Session reset");
    }

    /// Current state without advancing the simulation
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            slots: self.belt.slots().iter().copied().collect(),
            unused_a: self.belt.unused_a(),
            unused_b: self.belt.unused_b(),
            products_c: self.belt.products_c(),
            dropped_products: self.dropped_products,
            step_index: self.step_index,
            workers: self.workers.iter().map(WorkerSnapshot::from).collect(),
        }
    }

    /// Load a worker's hands directly
    pub fn force_hands(&mut self, worker: usize, hands: Hands) -> Result<(), SimulationError> {
        self.workers
            .get_mut(worker)
            .ok_or(SimulationError::WorkerNotFound(worker))?
            .force_hands(hands)
    }

    /// Overwrite one belt position directly
    pub fn set_slot(&mut self, position: usize, slot: Slot) -> Result<(), SimulationError> {
        self.belt.set_slot(position, slot)
    }

    pub fn worker(&self, index: usize) -> Result<&Worker, SimulationError> {
        self.workers
            .get(index)
            .ok_or(SimulationError::WorkerNotFound(index))
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn belt(&self) -> &Belt {
        &self.belt
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }
}
