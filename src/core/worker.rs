use super::belt::Belt;
use super::errors::SimulationError;
use super::types::{Component, Hands};
use log::trace;
use serde::{Deserialize, Serialize};

/// Worker lifecycle
///
/// `Assembling.remaining` is always at least 2; the step that would bring it
/// to 1 moves the worker to `ProductReady` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerState {
    Idle,
    Assembling { remaining: u32 },
    ProductReady,
}

/// What to do with a finished product when every delivery position is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliveryPolicy {
    /// Discard the product; it still counts as completed by the worker
    #[default]
    DropWhenFull,
    /// Keep the product and retry placement on the next step
    HoldUntilPlaced,
}

/// Outcome of evaluating one worker for one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerAction {
    /// Assembly continues; `remaining` is the timer after the decrement
    Assembling { remaining: u32 },
    /// A product is finished and waits for the delivery pass
    ProductReady,
    /// Both hands were emptied into a new assembly
    StartedAssembly,
    /// Components taken off the belt as (position, component)
    Picked(Vec<(usize, Component)>),
    Waited,
}

/// Outcome of the delivery pass for a `ProductReady` worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Placed(usize),
    Dropped,
    Held,
}

/// One assembly worker with two hands and an assembly countdown
#[derive(Debug, Clone)]
pub struct Worker {
    index: usize,
    hands: Hands,
    state: WorkerState,
    products_completed: u64,
    assembly_steps: u32,
}

impl Worker {
    /// Create an idle worker whose assemblies last `assembly_steps` steps
    pub fn new(index: usize, assembly_steps: u32) -> Result<Self, SimulationError> {
        if assembly_steps < 2 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "assembly_steps must be at least 2, got {}",
                assembly_steps
            )));
        }
        Ok(Self {
            index,
            hands: [None, None],
            state: WorkerState::Idle,
            products_completed: 0,
            assembly_steps,
        })
    }

    /// Apply this step's transition, taking components from the belt's
    /// pickup positions when idle.
    ///
    /// A `ProductReady` worker is left untouched here; the session resolves
    /// it in the delivery pass through [`Worker::finish_product`].
    pub fn evaluate(&mut self, belt: &mut Belt) -> WorkerAction {
        let action = match self.state {
            WorkerState::Assembling { remaining } => {
                let remaining = remaining - 1;
                self.state = if remaining > 1 {
                    WorkerState::Assembling { remaining }
                } else {
                    WorkerState::ProductReady
                };
                WorkerAction::Assembling { remaining }
            }
            WorkerState::ProductReady => WorkerAction::ProductReady,
            WorkerState::Idle if self.has_pair() => {
                self.hands = [None, None];
                self.state = WorkerState::Assembling {
                    remaining: self.assembly_steps,
                };
                WorkerAction::StartedAssembly
            }
            WorkerState::Idle => {
                let picked = self.pick_from(belt);
                if picked.is_empty() {
                    WorkerAction::Waited
                } else {
                    WorkerAction::Picked(picked)
                }
            }
        };
        trace!("[Worker {}] {:?} -> {:?}", self.index, action, self.state);
        action
    }

    fn pick_from(&mut self, belt: &mut Belt) -> Vec<(usize, Component)> {
        let mut picked = Vec::new();
        let positions: Vec<usize> = belt.pickup_positions().collect();

        for position in positions {
            let Some(free_hand) = self.free_hand() else {
                break;
            };
            let Some(component) = belt.peek_component(position) else {
                continue;
            };
            if self.holds(component) {
                continue;
            }
            if let Some(component) = belt.take_component(position) {
                self.hands[free_hand] = Some(component);
                picked.push((position, component));
            }
        }
        picked
    }

    /// Resolve a finished product after the delivery pass looked for a
    /// position. `placed` is the position used, if any.
    pub fn finish_product(&mut self, placed: Option<usize>, policy: DeliveryPolicy) -> Delivery {
        match (placed, policy) {
            (Some(position), _) => {
                self.state = WorkerState::Idle;
                self.products_completed += 1;
                Delivery::Placed(position)
            }
            (None, DeliveryPolicy::DropWhenFull) => {
                self.state = WorkerState::Idle;
                self.products_completed += 1;
                Delivery::Dropped
            }
            (None, DeliveryPolicy::HoldUntilPlaced) => Delivery::Held,
        }
    }

    /// Load both hands directly, bypassing the belt
    ///
    /// Rejected while the worker is busy or when both hands would hold the
    /// same component.
    pub fn force_hands(&mut self, hands: Hands) -> Result<(), SimulationError> {
        if self.state != WorkerState::Idle {
            return Err(SimulationError::InvalidHands(format!(
                "worker {} is {:?}",
                self.index, self.state
            )));
        }
        if let [Some(left), Some(right)] = hands {
            if left == right {
                return Err(SimulationError::InvalidHands(format!(
                    "worker {} cannot hold two {} components",
                    self.index, left
                )));
            }
        }
        self.hands = hands;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.hands = [None, None];
        self.state = WorkerState::Idle;
        self.products_completed = 0;
    }

    fn has_pair(&self) -> bool {
        self.holds(Component::A) && self.holds(Component::B)
    }

    fn holds(&self, component: Component) -> bool {
        self.hands.contains(&Some(component))
    }

    fn free_hand(&self) -> Option<usize> {
        self.hands.iter().position(Option::is_none)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn hands(&self) -> Hands {
        self.hands
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// 0 when idle, the countdown while assembling, 1 when a product is ready
    pub fn assembly_timer(&self) -> u32 {
        match self.state {
            WorkerState::Idle => 0,
            WorkerState::Assembling { remaining } => remaining,
            WorkerState::ProductReady => 1,
        }
    }

    pub fn products_completed(&self) -> u64 {
        self.products_completed
    }

    /// True while assembling or holding a finished product
    pub fn is_busy(&self) -> bool {
        self.state != WorkerState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Slot;

    fn worker() -> Worker {
        Worker::new(0, 4).unwrap()
    }

    #[test]
    fn test_short_assembly_rejected() {
        assert!(matches!(
            Worker::new(0, 1),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_picks_one_of_each_component() {
        let mut belt = Belt::new(6).unwrap();
        belt.set_slot(1, Slot::ComponentA).unwrap();
        belt.set_slot(3, Slot::ComponentA).unwrap();
        belt.set_slot(5, Slot::ComponentB).unwrap();

        let mut worker = worker();
        let action = worker.evaluate(&mut belt);

        assert_eq!(
            action,
            WorkerAction::Picked(vec![(1, Component::A), (5, Component::B)])
        );
        assert_eq!(worker.hands(), [Some(Component::A), Some(Component::B)]);
        assert_eq!(belt.slots()[1], Slot::Empty);
        assert_eq!(belt.slots()[3], Slot::ComponentA);
        assert_eq!(belt.slots()[5], Slot::Empty);
    }

    #[test]
    fn test_ignores_delivery_positions_and_products() {
        let mut belt = Belt::new(4).unwrap();
        belt.set_slot(0, Slot::ComponentA).unwrap();
        belt.set_slot(1, Slot::Product).unwrap();
        belt.set_slot(2, Slot::ComponentB).unwrap();

        let mut worker = worker();
        assert_eq!(worker.evaluate(&mut belt), WorkerAction::Waited);
        assert_eq!(worker.hands(), [None, None]);
    }

    #[test]
    fn test_full_assembly_cycle() {
        let mut belt = Belt::new(4).unwrap();
        let mut worker = worker();
        worker.force_hands([Some(Component::B), Some(Component::A)]).unwrap();

        assert_eq!(worker.evaluate(&mut belt), WorkerAction::StartedAssembly);
        assert_eq!(worker.assembly_timer(), 4);
        assert_eq!(worker.hands(), [None, None]);

        for expected in [3, 2, 1] {
            worker.evaluate(&mut belt);
            assert_eq!(worker.assembly_timer(), expected);
            assert_eq!(worker.hands(), [None, None]);
        }
        assert_eq!(worker.state(), WorkerState::ProductReady);
        assert_eq!(worker.evaluate(&mut belt), WorkerAction::ProductReady);

        let placed = belt.place_product();
        assert_eq!(worker.finish_product(placed, DeliveryPolicy::DropWhenFull), Delivery::Placed(0));
        assert_eq!(worker.state(), WorkerState::Idle);
        assert_eq!(worker.products_completed(), 1);
    }

    #[test]
    fn test_no_pickup_while_assembling() {
        let mut belt = Belt::new(4).unwrap();
        let mut worker = worker();
        worker.force_hands([Some(Component::A), Some(Component::B)]).unwrap();
        worker.evaluate(&mut belt);

        belt.set_slot(1, Slot::ComponentA).unwrap();
        worker.evaluate(&mut belt);
        assert_eq!(belt.slots()[1], Slot::ComponentA);
        assert_eq!(worker.hands(), [None, None]);
    }

    #[test]
    fn test_drop_policy_discards_product() {
        let mut worker = worker();
        worker.state = WorkerState::ProductReady;
        assert_eq!(worker.finish_product(None, DeliveryPolicy::DropWhenFull), Delivery::Dropped);
        assert_eq!(worker.state(), WorkerState::Idle);
        assert_eq!(worker.products_completed(), 1);
    }

    #[test]
    fn test_hold_policy_keeps_product() {
        let mut worker = worker();
        worker.state = WorkerState::ProductReady;
        assert_eq!(worker.finish_product(None, DeliveryPolicy::HoldUntilPlaced), Delivery::Held);
        assert_eq!(worker.state(), WorkerState::ProductReady);
        assert_eq!(worker.products_completed(), 0);
    }

    #[test]
    fn test_force_hands_validation() {
        let mut worker = worker();
        assert!(matches!(
            worker.force_hands([Some(Component::A), Some(Component::A)]),
            Err(SimulationError::InvalidHands(_))
        ));

        worker.state = WorkerState::Assembling { remaining: 3 };
        assert!(matches!(
            worker.force_hands([Some(Component::A), None]),
            Err(SimulationError::InvalidHands(_))
        ));
    }

    #[test]
    fn test_reset() {
        let mut worker = worker();
        worker.force_hands([Some(Component::A), None]).unwrap();
        worker.products_completed = 5;
        worker.reset();
        assert_eq!(worker.hands(), [None, None]);
        assert_eq!(worker.state(), WorkerState::Idle);
        assert_eq!(worker.products_completed(), 0);
    }
}
