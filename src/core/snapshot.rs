use super::types::{Hands, Slot};
use super::worker::{Worker, WorkerState};
use serde::{Deserialize, Serialize};

/// Read-only view of one worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    pub index: usize,
    pub hands: Hands,
    pub state: WorkerState,
    pub assembly_timer: u32,
    pub products_completed: u64,
}

impl From<&Worker> for WorkerSnapshot {
    fn from(worker: &Worker) -> Self {
        Self {
            index: worker.index(),
            hands: worker.hands(),
            state: worker.state(),
            assembly_timer: worker.assembly_timer(),
            products_completed: worker.products_completed(),
        }
    }
}

/// Immutable view of the simulation after a given step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub slots: Vec<Slot>,
    pub unused_a: u64,
    pub unused_b: u64,
    pub products_c: u64,
    /// Finished products lost because no delivery position was free
    pub dropped_products: u64,
    pub step_index: u64,
    pub workers: Vec<WorkerSnapshot>,
}

impl Snapshot {
    /// Products placed as a percentage of everything that left the line;
    /// 0 when nothing has.
    pub fn efficiency(&self) -> f64 {
        let total = self.products_c + self.unused_a + self.unused_b;
        if total == 0 {
            0.0
        } else {
            self.products_c as f64 / total as f64 * 100.0
        }
    }

    /// Belt contents as a compact string, entry first, `.` for empty
    pub fn belt_line(&self) -> String {
        self.slots.iter().map(|slot| slot.to_string()).collect()
    }
}
