//! Projections of snapshots for the layers around the simulation: batch
//! summaries, Prometheus text exposition and the indicator light panel.
//!
//! Everything here is a pure function of [`Snapshot`] values. The session
//! never calls into this module.

use super::snapshot::Snapshot;
use super::worker::WorkerState;
use serde::Serialize;

/// Number of trailing snapshots kept in a [`BatchReport`]
pub const REPORT_TAIL: usize = 5;

/// Summary of one batch of steps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub steps_completed: usize,
    pub products_c: u64,
    pub unused_a: u64,
    pub unused_b: u64,
    pub dropped_products: u64,
    /// Products placed during this batch only
    pub products_in_batch: u64,
    /// Efficiency percentage rounded to two decimals
    pub efficiency: f64,
    pub last_steps: Vec<Snapshot>,
}

impl BatchReport {
    /// Summarize `snapshots`, a batch that started from `initial`
    ///
    /// With an empty batch the counters are those of `initial`.
    pub fn from_snapshots(initial: &Snapshot, snapshots: &[Snapshot]) -> Self {
        let last = snapshots.last().unwrap_or(initial);
        let tail_start = snapshots.len().saturating_sub(REPORT_TAIL);

        Self {
            steps_completed: snapshots.len(),
            products_c: last.products_c,
            unused_a: last.unused_a,
            unused_b: last.unused_b,
            dropped_products: last.dropped_products,
            products_in_batch: last.products_c.saturating_sub(initial.products_c),
            efficiency: (last.efficiency() * 100.0).round() / 100.0,
            last_steps: snapshots[tail_start..].to_vec(),
        }
    }
}

/// One metric family of the exposition: header lines plus its samples
struct MetricFamily {
    name: &'static str,
    help: &'static str,
    kind: &'static str,
    samples: Vec<(&'static str, u64)>,
}

impl MetricFamily {
    fn render(&self) -> String {
        let header = format!(
            "# HELP {name} {help}\n# TYPE {name} {kind}\n",
            name = self.name,
            help = self.help,
            kind = self.kind
        );
        self.samples
            .iter()
            .fold(header, |text, (labels, value)| {
                text + &format!("{}{} {}\n", self.name, labels, value)
            })
    }
}

/// Render a snapshot in the Prometheus text exposition format
pub fn render_prometheus(snapshot: &Snapshot) -> String {
    let families = [
        MetricFamily {
            name: "conveyor_products_total",
            help: "Total products manufactured",
            kind: "counter",
            samples: vec![("", snapshot.products_c)],
        },
        MetricFamily {
            name: "conveyor_components_unused",
            help: "Unused components count",
            kind: "gauge",
            samples: vec![
                ("{type=\"A\"}", snapshot.unused_a),
                ("{type=\"B\"}", snapshot.unused_b),
            ],
        },
        MetricFamily {
            name: "conveyor_products_dropped_total",
            help: "Finished products lost for lack of a delivery position",
            kind: "counter",
            samples: vec![("", snapshot.dropped_products)],
        },
        MetricFamily {
            name: "conveyor_steps_total",
            help: "Simulated steps since the last reset",
            kind: "counter",
            samples: vec![("", snapshot.step_index)],
        },
    ];
    families.iter().map(MetricFamily::render).collect()
}

/// One light of the indicator panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub name: String,
    pub lit: bool,
}

/// Panel state for a snapshot: `beltActive` once the belt has moved, then
/// `worker1`..`workerN` lit while that worker assembles or holds a product.
pub fn indicator_states(snapshot: &Snapshot) -> Vec<Indicator> {
    let belt = Indicator {
        name: "beltActive".to_string(),
        lit: snapshot.step_index > 0,
    };
    let workers = snapshot.workers.iter().map(|worker| Indicator {
        name: format!("worker{}", worker.index + 1),
        lit: worker.state != WorkerState::Idle,
    });
    std::iter::once(belt).chain(workers).collect()
}
