use super::types::Slot;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Supplies the item entering the belt on each step
pub trait ItemSource {
    fn next_item(&mut self) -> Slot;
}

/// How a random source chooses the next belt item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntryDistribution {
    /// One draw over {A, B, Empty}, exactly 1/3 each
    #[default]
    Uniform,
    /// Two chained draws: A below 0.33, then B below 0.5, otherwise Empty.
    /// Gives A 0.33, B 0.335 and Empty 0.335.
    Chained,
}

/// Seedable random item source
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    distribution: EntryDistribution,
}

impl RandomSource {
    pub fn new(seed: u64, distribution: EntryDistribution) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            distribution,
        }
    }

    /// Source seeded from OS entropy; not reproducible
    pub fn from_entropy(distribution: EntryDistribution) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            distribution,
        }
    }
}

impl ItemSource for RandomSource {
    fn next_item(&mut self) -> Slot {
        match self.distribution {
            EntryDistribution::Uniform => match self.rng.gen_range(0..3u8) {
                0 => Slot::ComponentA,
                1 => Slot::ComponentB,
                _ => Slot::Empty,
            },
            EntryDistribution::Chained => {
                if self.rng.gen::<f64>() < 0.33 {
                    Slot::ComponentA
                } else if self.rng.gen::<f64>() < 0.5 {
                    Slot::ComponentB
                } else {
                    Slot::Empty
                }
            }
        }
    }
}

/// Replays a fixed list of items
///
/// Once exhausted it yields `Empty`, or starts over when built with
/// [`ScriptedSource::cycling`].
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: Vec<Slot>,
    pending: VecDeque<Slot>,
    cycle: bool,
}

impl ScriptedSource {
    pub fn new(script: Vec<Slot>) -> Self {
        Self {
            pending: script.iter().copied().collect(),
            script,
            cycle: false,
        }
    }

    pub fn cycling(script: Vec<Slot>) -> Self {
        Self {
            cycle: true,
            ..Self::new(script)
        }
    }

    /// Source that never puts anything on the belt
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl ItemSource for ScriptedSource {
    fn next_item(&mut self) -> Slot {
        if self.pending.is_empty() && self.cycle {
            self.pending.extend(self.script.iter().copied());
        }
        self.pending.pop_front().unwrap_or(Slot::Empty)
    }
}
