//! Property-based tests for the drivetrain graph and coupling models.
//!
//! Random link sequences must keep the graph a forest, and the clutch and
//! differential torque splits must honour their conservation rules for any
//! input.

use gearwork_core::clutch::{Clutch, ClutchState};
use gearwork_core::differential::{DiffType, Differential};
use gearwork_core::graph::{DrivetrainGraph, GraphError};
use gearwork_core::id::NodeId;
use gearwork_core::math::Vec2;
use gearwork_core::test_utils::*;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

#[derive(Debug, Clone, Copy)]
enum LinkOp {
    Link(usize, usize),
    Left(usize, usize),
    Right(usize, usize),
    Unlink(usize),
}

fn arb_ops(pool: usize, max_ops: usize) -> impl Strategy<Value = Vec<LinkOp>> {
    let op = prop_oneof![
        (0..pool, 0..pool).prop_map(|(p, c)| LinkOp::Link(p, c)),
        (0..pool, 0..pool).prop_map(|(p, c)| LinkOp::Left(p, c)),
        (0..pool, 0..pool).prop_map(|(p, c)| LinkOp::Right(p, c)),
        (0..pool).prop_map(LinkOp::Unlink),
    ];
    proptest::collection::vec(op, 0..max_ops)
}

/// Half leaf nodes (gearboxes), half split nodes (differentials).
fn build_pool(n: usize) -> (DrivetrainGraph, Vec<NodeId>) {
    let mut graph = DrivetrainGraph::new();
    let ids = (0..n)
        .map(|i| {
            if i % 2 == 0 {
                graph.add(test_gearbox())
            } else {
                graph.add(Differential::new(2.0, 0.1, DiffType::Open))
            }
        })
        .collect();
    (graph, ids)
}

type Snapshot = Vec<(Option<NodeId>, Vec<NodeId>)>;

fn snapshot(graph: &DrivetrainGraph, ids: &[NodeId]) -> Snapshot {
    ids.iter()
        .map(|&id| (graph.parent(id), graph.children(id)))
        .collect()
}

fn assert_forest(graph: &DrivetrainGraph, ids: &[NodeId]) {
    for &id in ids {
        // Parent chain terminates within the node count.
        let mut steps = 0;
        let mut current = graph.parent(id);
        while let Some(p) = current {
            assert_ne!(p, id, "node reaches itself");
            steps += 1;
            assert!(steps <= ids.len(), "parent chain does not terminate");
            current = graph.parent(p);
        }

        // Parent and child links agree.
        for child in graph.children(id) {
            assert_eq!(graph.parent(child), Some(id));
        }
        if let Some(p) = graph.parent(id) {
            let count = graph.children(p).iter().filter(|&&c| c == id).count();
            assert_eq!(count, 1, "child listed {count} times by its parent");
        }
    }
}

// ===========================================================================
// Graph properties
// ===========================================================================

proptest! {
    #[test]
    fn random_links_keep_a_forest(ops in arb_ops(8, 60)) {
        let (mut graph, ids) = build_pool(8);

        for op in ops {
            let before = snapshot(&graph, &ids);
            let result = match op {
                LinkOp::Link(p, c) => graph.link(ids[p], ids[c]),
                LinkOp::Left(p, c) => graph.link_left(ids[p], ids[c]),
                LinkOp::Right(p, c) => graph.link_right(ids[p], ids[c]),
                LinkOp::Unlink(c) => graph.unlink(ids[c]).map(|_| ()),
            };
            if result.is_err() {
                prop_assert_eq!(&snapshot(&graph, &ids), &before);
            }
            if let (Err(GraphError::Cyclic), LinkOp::Link(p, c) | LinkOp::Left(p, c) | LinkOp::Right(p, c)) = (&result, op) {
                // The child really is the parent or one of its ancestors.
                let mut current = Some(ids[p]);
                let mut found = false;
                while let Some(n) = current {
                    if n == ids[c] {
                        found = true;
                        break;
                    }
                    current = graph.parent(n);
                }
                prop_assert!(found);
            }
            assert_forest(&graph, &ids);
        }
    }

    #[test]
    fn removing_a_subtree_keeps_the_rest_consistent(ops in arb_ops(8, 40), victim in 0..8usize) {
        let (mut graph, ids) = build_pool(8);
        for op in ops {
            let _ = match op {
                LinkOp::Link(p, c) => graph.link(ids[p], ids[c]),
                LinkOp::Left(p, c) => graph.link_left(ids[p], ids[c]),
                LinkOp::Right(p, c) => graph.link_right(ids[p], ids[c]),
                LinkOp::Unlink(c) => graph.unlink(ids[c]).map(|_| ()),
            };
        }

        let before = graph.len();
        let removed = graph.remove_subtree(ids[victim]).unwrap();
        prop_assert_eq!(graph.len(), before - removed);
        prop_assert!(!graph.contains(ids[victim]));

        let alive: Vec<NodeId> = ids.iter().copied().filter(|&id| graph.contains(id)).collect();
        for &id in &alive {
            if let Some(p) = graph.parent(id) {
                prop_assert!(graph.contains(p));
            }
            for c in graph.children(id) {
                prop_assert!(graph.contains(c));
            }
        }
        assert_forest(&graph, &alive);
    }
}

// ===========================================================================
// Coupling properties
// ===========================================================================

proptest! {
    #[test]
    fn clutch_lock_passes_torque_unchanged(
        torque in -400.0f32..400.0,
        left in 0.0f32..600.0,
        offset in -0.99f32..0.99,
    ) {
        let clutch = Clutch::with_torque(400.0, 300.0);
        let t = clutch.torque_out(torque, 400.0, left, left + offset);
        prop_assert_eq!(t.state, ClutchState::Locked);
        prop_assert_eq!(t.torque_left, torque);
        prop_assert_eq!(t.torque_right, torque);
    }

    #[test]
    fn clutch_slip_is_bounded_by_kinetic_capacity(
        torque in -2000.0f32..2000.0,
        normal in 0.0f32..400.0,
        left in -600.0f32..600.0,
        right in -600.0f32..600.0,
    ) {
        let clutch = Clutch::with_torque(400.0, 300.0);
        let t = clutch.torque_out(torque, normal, left, right);
        if t.state == ClutchState::Slipping {
            let capacity = clutch.kinetic_coefficient * normal;
            prop_assert!(t.torque_right.abs() <= capacity + 1e-3);
            prop_assert!((t.torque_left + t.torque_right - torque).abs() <= 1e-3 * torque.abs().max(1.0));
        } else {
            prop_assert_eq!(t.torque_left, torque);
            prop_assert_eq!(t.torque_right, torque);
        }
    }

    #[test]
    fn open_differential_ignores_reactions(
        torque in -2000.0f32..2000.0,
        ratio in 1.0f32..5.0,
        rl in -5000.0f32..5000.0,
        rr in -5000.0f32..5000.0,
    ) {
        let diff = Differential::new(ratio, 0.2, DiffType::Open);
        let (l, r) = diff.torque(torque, rl, rr);
        prop_assert_eq!(l, torque * ratio / 2.0);
        prop_assert_eq!(r, torque * ratio / 2.0);
    }

    #[test]
    fn locked_differential_conserves_torque(
        torque in -2000.0f32..2000.0,
        ratio in 1.0f32..5.0,
        rl in -5000.0f32..5000.0,
        rr in -5000.0f32..5000.0,
    ) {
        let diff = Differential::new(ratio, 0.2, DiffType::Locked);
        let (l, r) = diff.torque(torque, rl, rr);
        let total = torque * ratio;
        let scale = total.abs().max(rl.abs()).max(rr.abs()).max(1.0);
        prop_assert!((l + r - total).abs() <= 1e-5 * scale);
    }

    #[test]
    fn standstill_floor_holds_for_any_braking(
        brake in -20000.0f32..0.0,
        speed in 0.0f32..0.01,
        steps in 1usize..50,
    ) {
        let mut wheel = test_wheel(Vec2::ZERO);
        for _ in 0..steps {
            wheel.update(Vec2::new(speed, 0.0), 0.0, 0.0, brake, 1.0 / 400.0);
            prop_assert!(wheel.hub_velocity.x.abs() >= MIN_SPEED);
            prop_assert!(wheel.angular_velocity * wheel.effective_radius >= MIN_SPEED * 0.999_99);
        }
    }
}
