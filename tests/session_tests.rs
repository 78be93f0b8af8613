use conveyor_sim::core::report::BatchReport;
use conveyor_sim::{
    create_session, Component, DeliveryPolicy, EntryDistribution, ItemSource, RandomSource, ScriptedSource,
    Session, SessionConfig, SimulationError, Slot, Snapshot, WorkerState,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn single_worker_session() -> Session {
    let config = SessionConfig::new().with_belt_length(10).with_worker_count(1);
    Session::with_source(config, Box::new(ScriptedSource::empty())).unwrap()
}

fn items_seen(snapshot: &Snapshot) -> u64 {
    snapshot.unused_a + snapshot.unused_b + snapshot.products_c
}

#[test]
fn test_forced_pair_assembles_and_delivers() {
    let mut session = single_worker_session();
    session.reset();
    session
        .force_hands(0, [Some(Component::A), Some(Component::B)])
        .unwrap();

    let first = session.step();
    assert_eq!(first.workers[0].state, WorkerState::Assembling { remaining: 4 });
    assert_eq!(first.workers[0].assembly_timer, 4);
    assert_eq!(first.workers[0].hands, [None, None]);

    let timers: Vec<u32> = (0..3).map(|_| session.step().workers[0].assembly_timer).collect();
    assert_eq!(timers, vec![3, 2, 1]);

    let fifth = session.step();
    assert_eq!(fifth.products_c, 1);
    assert_eq!(fifth.slots[0], Slot::Product);
    assert_eq!(fifth.workers[0].assembly_timer, 0);
    assert_eq!(fifth.workers[0].products_completed, 1);
}

fn busy_belt_session() -> Session {
    // An A enters every step; the lone worker is busy assembling so none are picked
    let config = SessionConfig::new().with_belt_length(10).with_worker_count(1);
    let mut session = Session::with_source(
        config,
        Box::new(ScriptedSource::cycling(vec![Slot::ComponentA])),
    )
    .unwrap();
    session
        .force_hands(0, [Some(Component::A), Some(Component::B)])
        .unwrap();
    for _ in 0..4 {
        session.step();
    }
    session
}

#[test]
fn test_product_goes_to_first_empty_even_position() {
    let mut session = busy_belt_session();
    // Moves to position 6 on the next advance
    session.set_slot(5, Slot::Product).unwrap();

    let fifth = session.step();
    assert!(fifth.slots[..5].iter().all(|slot| *slot == Slot::ComponentA));
    assert_eq!(fifth.slots[6], Slot::Product);
    assert_eq!(fifth.slots[8], Slot::Product);
    assert_eq!(fifth.products_c, 1);
}

#[test]
fn test_product_dropped_when_no_even_position_free() {
    let mut session = busy_belt_session();
    session.set_slot(5, Slot::Product).unwrap();
    session.set_slot(7, Slot::Product).unwrap();

    let fifth = session.step();
    assert!(session.belt().delivery_positions().all(|position| !fifth.slots[position].is_empty()));
    assert_eq!(fifth.products_c, 0);
    assert_eq!(fifth.dropped_products, 1);
    assert_eq!(fifth.workers[0].products_completed, 1);
    assert_eq!(fifth.workers[0].state, WorkerState::Idle);
}

#[test]
fn test_step_batch_returns_ordered_snapshots() {
    let mut session = create_session(SessionConfig::default()).unwrap();
    let snapshots = session.step_batch(100).unwrap();

    assert_eq!(snapshots.len(), 100);
    assert!(snapshots
        .windows(2)
        .all(|pair| pair[0].step_index < pair[1].step_index));
    assert_eq!(snapshots[0].step_index, 1);
    assert_eq!(snapshots[99].step_index, 100);
}

#[test]
fn test_batch_equals_sequential_steps() {
    let mut batched = create_session(SessionConfig::default()).unwrap();
    let mut stepped = create_session(SessionConfig::default()).unwrap();

    let batch = batched.step_batch(40).unwrap();
    let single: Vec<Snapshot> = (0..40).map(|_| stepped.step()).collect();
    assert_eq!(batch, single);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    for distribution in [EntryDistribution::Uniform, EntryDistribution::Chained] {
        let config = SessionConfig::new().with_seed(Some(2024)).with_distribution(distribution);
        let first = create_session(config.clone()).unwrap().step_batch(300).unwrap();
        let second = create_session(config).unwrap().step_batch(300).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_invariants_hold_every_step() {
    for policy in [DeliveryPolicy::DropWhenFull, DeliveryPolicy::HoldUntilPlaced] {
        let config = SessionConfig::new()
            .with_seed(Some(11))
            .with_worker_count(4)
            .with_delivery_policy(policy);
        let mut session = create_session(config).unwrap();
        let mut previous = session.snapshot();

        for _ in 0..1000 {
            let snapshot = session.step();
            assert_eq!(snapshot.slots.len(), 10);
            assert!(snapshot.unused_a >= previous.unused_a);
            assert!(snapshot.unused_b >= previous.unused_b);
            assert!(snapshot.products_c >= previous.products_c);
            assert!(items_seen(&snapshot) >= items_seen(&previous));

            for worker in &snapshot.workers {
                if worker.assembly_timer > 0 {
                    assert_eq!(worker.hands, [None, None]);
                }
                if let [Some(left), Some(right)] = worker.hands {
                    assert_ne!(left, right);
                }
                if let WorkerState::Assembling { remaining } = worker.state {
                    assert!((2..=4).contains(&remaining));
                }
            }
            previous = snapshot;
        }
        assert!(previous.products_c > 0, "no products with {:?}", policy);
    }
}

/// Random source that tallies every component it puts on the belt
struct RecordingSource {
    inner: RandomSource,
    entered_a: Arc<AtomicU64>,
    entered_b: Arc<AtomicU64>,
}

impl ItemSource for RecordingSource {
    fn next_item(&mut self) -> Slot {
        let item = self.inner.next_item();
        match item {
            Slot::ComponentA => {
                self.entered_a.fetch_add(1, Ordering::Relaxed);
            }
            Slot::ComponentB => {
                self.entered_b.fetch_add(1, Ordering::Relaxed);
            }
            Slot::Product | Slot::Empty => {}
        }
        item
    }
}

fn count_on_belt(snapshot: &Snapshot, slot: Slot) -> u64 {
    snapshot.slots.iter().filter(|item| **item == slot).count() as u64
}

fn count_in_hands(snapshot: &Snapshot, component: Component) -> u64 {
    snapshot
        .workers
        .iter()
        .flat_map(|worker| worker.hands)
        .filter(|hand| *hand == Some(component))
        .count() as u64
}

#[test]
fn test_components_are_conserved_every_step() {
    // Each entered component is on the belt, in a hand, inside an assembly,
    // in a finished product or counted as unused
    for policy in [DeliveryPolicy::DropWhenFull, DeliveryPolicy::HoldUntilPlaced] {
        for worker_count in [1, 3, 6] {
            let entered_a = Arc::new(AtomicU64::new(0));
            let entered_b = Arc::new(AtomicU64::new(0));
            let source = RecordingSource {
                inner: RandomSource::new(worker_count as u64 + 17, EntryDistribution::Uniform),
                entered_a: Arc::clone(&entered_a),
                entered_b: Arc::clone(&entered_b),
            };
            let config = SessionConfig::new()
                .with_worker_count(worker_count)
                .with_delivery_policy(policy);
            let mut session = Session::with_source(config, Box::new(source)).unwrap();

            for _ in 0..2000 {
                let snapshot = session.step();
                let in_assembly = snapshot
                    .workers
                    .iter()
                    .filter(|worker| worker.state != WorkerState::Idle)
                    .count() as u64;
                let completed: u64 = snapshot
                    .workers
                    .iter()
                    .map(|worker| worker.products_completed)
                    .sum();

                assert_eq!(
                    entered_a.load(Ordering::Relaxed),
                    snapshot.unused_a
                        + count_on_belt(&snapshot, Slot::ComponentA)
                        + count_in_hands(&snapshot, Component::A)
                        + in_assembly
                        + completed,
                    "A lost at step {} with {:?} and {} workers",
                    snapshot.step_index,
                    policy,
                    worker_count
                );
                assert_eq!(
                    entered_b.load(Ordering::Relaxed),
                    snapshot.unused_b
                        + count_on_belt(&snapshot, Slot::ComponentB)
                        + count_in_hands(&snapshot, Component::B)
                        + in_assembly
                        + completed,
                    "B lost at step {} with {:?} and {} workers",
                    snapshot.step_index,
                    policy,
                    worker_count
                );
                assert_eq!(completed, snapshot.products_c + snapshot.dropped_products);
            }
            assert!(session.snapshot().products_c > 0);
        }
    }
}

#[test]
fn test_counters_match_items_leaving_the_line() {
    // Every placed product and every evicted component is counted once
    let config = SessionConfig::new().with_belt_length(4).with_worker_count(1);
    let script = vec![Slot::ComponentA, Slot::ComponentA, Slot::ComponentB, Slot::Empty];
    let mut session = Session::with_source(config, Box::new(ScriptedSource::new(script))).unwrap();

    let snapshots = session.step_batch(20).unwrap();
    let last = snapshots.last().unwrap();

    // One A and one B are picked and assembled, the second A rides off
    assert_eq!(last.products_c, 1);
    assert_eq!(last.unused_a, 1);
    assert_eq!(last.unused_b, 0);
    assert_eq!(last.workers[0].products_completed, 1);
}

#[test]
fn test_reset_clears_state() {
    let mut session = create_session(SessionConfig::default()).unwrap();
    session.step_batch(250).unwrap();
    let _ = session.force_hands(0, [Some(Component::B), None]);
    session.reset();

    let snapshot = session.snapshot();
    assert!(snapshot.slots.iter().all(Slot::is_empty));
    assert_eq!(snapshot.unused_a, 0);
    assert_eq!(snapshot.unused_b, 0);
    assert_eq!(snapshot.products_c, 0);
    assert_eq!(snapshot.dropped_products, 0);
    assert_eq!(snapshot.step_index, 0);
    for worker in &snapshot.workers {
        assert_eq!(worker.hands, [None, None]);
        assert_eq!(worker.state, WorkerState::Idle);
        assert_eq!(worker.products_completed, 0);
    }
}

#[test]
fn test_snapshot_does_not_mutate() {
    let mut session = create_session(SessionConfig::default()).unwrap();
    session.step_batch(10).unwrap();

    let first = session.snapshot();
    let second = session.snapshot();
    assert_eq!(first, second);
    assert_eq!(session.step().step_index, 11);
}

#[test]
fn test_invalid_configurations() {
    for config in [
        SessionConfig::new().with_belt_length(0),
        SessionConfig::new().with_worker_count(0),
        SessionConfig::new().with_assembly_steps(0),
    ] {
        assert!(matches!(
            create_session(config),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    let mut session = create_session(SessionConfig::default()).unwrap();
    assert!(matches!(
        session.step_batch(0),
        Err(SimulationError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_batch_report_from_session() {
    let mut session = create_session(SessionConfig::default()).unwrap();
    let initial = session.snapshot();
    let snapshots = session.step_batch(100).unwrap();
    let report = BatchReport::from_snapshots(&initial, &snapshots);

    assert_eq!(report.steps_completed, 100);
    assert_eq!(report.last_steps.len(), 5);
    assert_eq!(report.last_steps[4], session.snapshot());
    assert_eq!(report.products_in_batch, report.products_c);
    assert!((0.0..=100.0).contains(&report.efficiency));
}
