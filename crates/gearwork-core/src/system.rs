use crate::graph::{DrivetrainGraph, GraphError};
use crate::id::NodeId;
use serde::{Deserialize, Serialize};

/// The graph entry points that must be visited by the velocity update pass
/// each tick: the driven chain plus every wheel that is not part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowertrainSystem {
    roots: Vec<NodeId>,
}

impl PowertrainSystem {
    pub fn new(roots: Vec<NodeId>) -> Self {
        Self { roots }
    }

    /// Every parentless node currently in `graph`.
    pub fn from_graph(graph: &DrivetrainGraph) -> Self {
        Self::new(graph.roots().collect())
    }

    pub fn add_root(&mut self, root: NodeId) {
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Reconcile angular velocities below every root.
    pub fn update(&self, graph: &mut DrivetrainGraph) {
        for &root in &self.roots {
            graph.update_angular_velocity(root);
        }
    }

    /// Remove every root and its subtree from `graph`.
    pub fn free(self, graph: &mut DrivetrainGraph) -> Result<usize, GraphError> {
        let mut removed = 0;
        for root in self.roots {
            removed += graph.remove_subtree(root)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differential::DiffType;
    use crate::math::Vec2;
    use crate::test_utils::{self, Drivetrain};
    use crate::wheel::Wheel;

    #[test]
    fn from_graph_finds_every_root() {
        let Drivetrain {
            mut graph, engine, ..
        } = test_utils::rwd_drivetrain(DiffType::Open);
        let front = graph.add(Wheel::new(0.6, 0.344, Vec2::new(1.3, 0.8), 0.01));

        let system = PowertrainSystem::from_graph(&graph);
        assert_eq!(system.roots().len(), 2);
        assert!(system.roots().contains(&engine));
        assert!(system.roots().contains(&front));
    }

    #[test]
    fn add_root_ignores_duplicates() {
        let mut graph = DrivetrainGraph::new();
        let w = graph.add(Wheel::new(0.6, 0.344, Vec2::ZERO, 0.01));
        let mut system = PowertrainSystem::default();
        system.add_root(w);
        system.add_root(w);
        assert_eq!(system.roots(), &[w]);
    }

    #[test]
    fn update_visits_undriven_wheels() {
        let Drivetrain {
            mut graph,
            engine,
            gearbox,
            ..
        } = test_utils::rwd_drivetrain(DiffType::Locked);
        graph.shift(gearbox, 1).unwrap();
        let front = graph.add(Wheel::new(0.6, 0.344, Vec2::new(1.3, 0.8), 0.01));
        graph.wheel_mut(front).unwrap().angular_velocity = 12.0;

        let system = PowertrainSystem::new(vec![engine, front]);
        system.update(&mut graph);
        assert_eq!(graph.wheel(front).unwrap().angular_velocity, 12.0);
    }

    #[test]
    fn free_removes_everything() {
        let Drivetrain {
            mut graph, engine, ..
        } = test_utils::rwd_drivetrain(DiffType::Open);
        let front = graph.add(Wheel::new(0.6, 0.344, Vec2::ZERO, 0.01));
        let total = graph.len();

        let removed = PowertrainSystem::new(vec![engine, front]).free(&mut graph).unwrap();
        assert_eq!(removed, total);
        assert!(graph.is_empty());
    }
}
