//! Arena-backed drivetrain graph.
//!
//! Nodes live in a `SlotMap` and refer to each other by [`NodeId`]. Each
//! node owns its children by id and keeps a non-owning parent id for
//! upward traversal. The parent/child relation is always a forest: link
//! operations that would give a node two parents or close a cycle are
//! rejected before anything is changed.
//!
//! Per tick, torque flows from a root toward the leaves with
//! [`DrivetrainGraph::send_torque`], then velocities are reconciled from
//! the leaves back up with [`DrivetrainGraph::update_angular_velocity`].

use crate::clutch::{Clutch, ClutchState};
use crate::component::{Component, ComponentKind};
use crate::differential::{DiffType, Differential};
use crate::engine::Engine;
use crate::event::DrivetrainEvent;
use crate::gearbox::Gearbox;
use crate::id::NodeId;
use crate::math::{AngularVelocity, Vec2};
use crate::wheel::{Wheel, WheelDirection};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while building or editing the graph.
///
/// A failed call leaves the graph exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("link call does not match the node's topology")]
    InvalidTopology,
    #[error("the same child cannot fill both slots of a split node")]
    DuplicateChild,
    #[error("link would create a cycle")]
    Cyclic,
    #[error("node {0:?} is already attached to another parent")]
    AlreadyAttached(NodeId),
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
    #[error("node {node:?} is not a {expected:?}")]
    UnexpectedComponent {
        node: NodeId,
        expected: ComponentKind,
    },
    #[error("node {0:?} and its parent disagree about their link")]
    ParentMismatch(NodeId),
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// Which way an inertia query looks from the asking neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    TowardRoot,
    TowardLeaf,
}

/// Vehicle body motion handed to every wheel during a torque pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocities {
    /// Velocity of the centre of gravity in the body frame.
    pub velocity_cog: Vec2,
    pub yaw_velocity: f32,
}

/// Child slots of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Links {
    Leaf {
        child: Option<NodeId>,
    },
    Split {
        left: Option<NodeId>,
        right: Option<NodeId>,
    },
}

impl Links {
    pub fn children(&self) -> impl Iterator<Item = NodeId> {
        let pair = match *self {
            Links::Leaf { child } => [child, None],
            Links::Split { left, right } => [left, right],
        };
        pair.into_iter().flatten()
    }

    fn child(&self) -> Option<NodeId> {
        match *self {
            Links::Leaf { child } => child,
            Links::Split { .. } => None,
        }
    }

    fn split(&self) -> (Option<NodeId>, Option<NodeId>) {
        match *self {
            Links::Leaf { .. } => (None, None),
            Links::Split { left, right } => (left, right),
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> Option<&mut Option<NodeId>> {
        match (self, slot) {
            (Links::Leaf { child }, Slot::Next) => Some(child),
            (Links::Split { left, .. }, Slot::Left) => Some(left),
            (Links::Split { right, .. }, Slot::Right) => Some(right),
            _ => None,
        }
    }

    /// Occupant of the slot opposite `slot` on a split node.
    fn sibling(&self, slot: Slot) -> Option<NodeId> {
        match (*self, slot) {
            (Links::Split { right, .. }, Slot::Left) => right,
            (Links::Split { left, .. }, Slot::Right) => left,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Next,
    Left,
    Right,
}

/// A component together with its place in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    component: Component,
    parent: Option<NodeId>,
    links: Links,
}

impl Node {
    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn links(&self) -> Links {
        self.links
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> {
        self.links.children()
    }
}

// ---------------------------------------------------------------------------
// DrivetrainGraph
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDrivetrainGraph")]
pub struct DrivetrainGraph {
    nodes: SlotMap<NodeId, Node>,
    /// Transitions recorded since the last `take_events`.
    #[serde(skip)]
    events: Vec<DrivetrainEvent>,
}

/// Serialized form. Parent and child links are checked against each other
/// before it becomes a [`DrivetrainGraph`].
#[derive(Serialize, Deserialize)]
struct RawDrivetrainGraph {
    nodes: SlotMap<NodeId, Node>,
}

impl TryFrom<RawDrivetrainGraph> for DrivetrainGraph {
    type Error = GraphError;

    fn try_from(raw: RawDrivetrainGraph) -> Result<Self, Self::Error> {
        let nodes = raw.nodes;
        for (id, node) in &nodes {
            let split = matches!(node.links, Links::Split { .. });
            if split != (node.component.kind() == ComponentKind::Differential) {
                return Err(GraphError::InvalidTopology);
            }
            if let Links::Split {
                left: Some(l),
                right: Some(r),
            } = node.links
                && l == r
            {
                return Err(GraphError::DuplicateChild);
            }
            for child in node.children() {
                let child_node = nodes.get(child).ok_or(GraphError::NodeNotFound(child))?;
                if child_node.parent != Some(id) {
                    return Err(GraphError::ParentMismatch(child));
                }
            }
            if let Some(parent) = node.parent {
                let parent_node = nodes.get(parent).ok_or(GraphError::NodeNotFound(parent))?;
                if !parent_node.children().any(|c| c == id) {
                    return Err(GraphError::ParentMismatch(id));
                }
            }
        }

        // Every parent chain must reach a root within `len` steps.
        for (id, _) in &nodes {
            let mut current = nodes.get(id).and_then(|n| n.parent);
            let mut steps = 0;
            while let Some(p) = current {
                steps += 1;
                if steps > nodes.len() {
                    return Err(GraphError::Cyclic);
                }
                current = nodes.get(p).and_then(|n| n.parent);
            }
        }

        Ok(Self {
            nodes,
            events: Vec::new(),
        })
    }
}

impl DrivetrainGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Construction --

    /// Add an unattached node whose topology follows from its payload:
    /// differentials become split nodes, everything else a leaf node.
    pub fn add(&mut self, component: impl Into<Component>) -> NodeId {
        let component = component.into();
        let links = match component.kind() {
            ComponentKind::Differential => Links::Split {
                left: None,
                right: None,
            },
            _ => Links::Leaf { child: None },
        };
        self.nodes.insert(Node {
            component,
            parent: None,
            links,
        })
    }

    /// Add an unattached single-child node.
    pub fn new_leaf(&mut self, component: impl Into<Component>) -> Result<NodeId, GraphError> {
        let component = component.into();
        if component.kind() == ComponentKind::Differential {
            return Err(GraphError::InvalidTopology);
        }
        Ok(self.add(component))
    }

    /// Add an unattached two-child node.
    pub fn new_split(&mut self, component: impl Into<Component>) -> Result<NodeId, GraphError> {
        let component = component.into();
        if component.kind() != ComponentKind::Differential {
            return Err(GraphError::InvalidTopology);
        }
        Ok(self.add(component))
    }

    /// Attach `child` below the single-child node `parent`.
    pub fn link(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        self.attach(parent, child, Slot::Next)
    }

    pub fn link_left(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        self.attach(parent, child, Slot::Left)
    }

    pub fn link_right(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        self.attach(parent, child, Slot::Right)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, slot: Slot) -> Result<(), GraphError> {
        let mut links = self
            .nodes
            .get(parent)
            .ok_or(GraphError::NodeNotFound(parent))?
            .links;
        let child_parent = self
            .nodes
            .get(child)
            .ok_or(GraphError::NodeNotFound(child))?
            .parent;

        let occupant = *links.slot_mut(slot).ok_or(GraphError::InvalidTopology)?;
        if links.sibling(slot) == Some(child) {
            return Err(GraphError::DuplicateChild);
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(GraphError::Cyclic);
        }
        match child_parent {
            Some(p) if p != parent => return Err(GraphError::AlreadyAttached(child)),
            Some(_) => return Ok(()),
            None => {}
        }

        // Validated; commit.
        if let Some(old) = occupant
            && let Some(node) = self.nodes.get_mut(old)
        {
            node.parent = None;
        }
        if let Some(entry) = links.slot_mut(slot) {
            *entry = Some(child);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.links = links;
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Whether `candidate` is `node` or one of its ancestors.
    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Detach `child` from its parent. Returns the former parent.
    pub fn unlink(&mut self, child: NodeId) -> Result<Option<NodeId>, GraphError> {
        let parent = self
            .nodes
            .get_mut(child)
            .ok_or(GraphError::NodeNotFound(child))?
            .parent
            .take();
        if let Some(parent) = parent
            && let Some(node) = self.nodes.get_mut(parent)
        {
            match &mut node.links {
                Links::Leaf { child: slot } => {
                    if *slot == Some(child) {
                        *slot = None;
                    }
                }
                Links::Split { left, right } => {
                    if *left == Some(child) {
                        *left = None;
                    }
                    if *right == Some(child) {
                        *right = None;
                    }
                }
            }
        }
        Ok(parent)
    }

    /// Remove `node` and everything below it. Returns the number of nodes
    /// removed.
    pub fn remove_subtree(&mut self, node: NodeId) -> Result<usize, GraphError> {
        self.unlink(node)?;
        let mut stack = vec![node];
        let mut removed = 0;
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(id) {
                stack.extend(n.children());
                removed += 1;
            }
        }
        Ok(removed)
    }

    // -- Queries --

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node)
    }

    pub fn component(&self, node: NodeId) -> Option<&Component> {
        self.nodes.get(node).map(|n| &n.component)
    }

    pub fn component_mut(&mut self, node: NodeId) -> Option<&mut Component> {
        self.nodes.get_mut(node).map(|n| &mut n.component)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node)
            .map(|n| n.children().collect())
            .unwrap_or_default()
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Drain the transitions recorded so far.
    pub fn take_events(&mut self) -> Vec<DrivetrainEvent> {
        std::mem::take(&mut self.events)
    }

    fn links_of(&self, node: Option<NodeId>) -> Links {
        node.and_then(|id| self.nodes.get(id))
            .map_or(Links::Leaf { child: None }, |n| n.links)
    }

    fn child_of(&self, node: NodeId) -> Option<NodeId> {
        self.links_of(Some(node)).child()
    }

    // -----------------------------------------------------------------------
    // Drivetrain operations
    // -----------------------------------------------------------------------

    /// Rotational inertia seen from `asking` when looking through `node`
    /// in `direction`.
    pub fn inertia(&self, node: NodeId, asking: Option<NodeId>, direction: Direction) -> f32 {
        self.inertia_of(Some(node), asking, direction)
    }

    fn inertia_of(&self, node: Option<NodeId>, asking: Option<NodeId>, direction: Direction) -> f32 {
        let Some((id, n)) = node.and_then(|id| self.nodes.get(id).map(|n| (id, n))) else {
            return 0.0;
        };
        let child = n.links.child();
        let parent = n.parent;
        let beyond = |next: Option<NodeId>| self.inertia_of(next, Some(id), direction);

        match (&n.component, direction) {
            (Component::Engine(e), Direction::TowardLeaf) => e.inertia + beyond(child),
            (Component::Engine(e), Direction::TowardRoot) => e.inertia,

            (Component::Clutch(c), _) if !c.is_locked() => 0.0,
            (Component::Clutch(_), Direction::TowardLeaf) => beyond(child),
            (Component::Clutch(_), Direction::TowardRoot) => beyond(parent),

            (Component::Gearbox(g), Direction::TowardLeaf) => g.inertia() + beyond(child),
            (Component::Gearbox(g), Direction::TowardRoot) => g.inertia() + beyond(parent),

            (Component::Differential(d), Direction::TowardLeaf) => {
                let (left, right) = n.links.split();
                d.inertia + beyond(left) + beyond(right)
            }
            (Component::Differential(d), Direction::TowardRoot) => {
                let upstream = beyond(parent) + d.inertia;
                if d.ty == DiffType::Open {
                    return upstream;
                }
                let (left, right) = n.links.split();
                let branch = |b: Option<NodeId>| self.inertia_of(b, Some(id), Direction::TowardLeaf);
                match asking {
                    a if a.is_some() && a == left => upstream + branch(right),
                    a if a.is_some() && a == right => upstream + branch(left),
                    _ => upstream + branch(left) + branch(right),
                }
            }

            (Component::Wheel(w), Direction::TowardLeaf) => w.inertia,
            (Component::Wheel(w), Direction::TowardRoot) => beyond(parent) + w.inertia,
        }
    }

    /// Current angular velocity of `node` without changing any state.
    pub fn angular_velocity(&self, node: NodeId) -> AngularVelocity {
        self.angular_velocity_of(Some(node))
    }

    fn angular_velocity_of(&self, node: Option<NodeId>) -> AngularVelocity {
        let Some(n) = node.and_then(|id| self.nodes.get(id)) else {
            return 0.0;
        };
        match &n.component {
            Component::Engine(e) => e.angular_velocity,
            Component::Clutch(_) => self.angular_velocity_of(n.links.child()),
            Component::Gearbox(g) => g.input_velocity(self.angular_velocity_of(n.links.child())),
            Component::Differential(d) => {
                let (left, right) = n.links.split();
                d.velocity(self.angular_velocity_of(left), self.angular_velocity_of(right))
            }
            Component::Wheel(w) => w.angular_velocity,
        }
    }

    /// Torque visible to a neighbour looking past `node`: tire reaction
    /// plus external (brake) torque accumulated at or below it.
    pub fn external_torque(&self, node: NodeId) -> f32 {
        self.external_torque_of(Some(node))
    }

    fn external_torque_of(&self, node: Option<NodeId>) -> f32 {
        let Some(n) = node.and_then(|id| self.nodes.get(id)) else {
            return 0.0;
        };
        match &n.component {
            Component::Engine(_) | Component::Gearbox(_) => self.external_torque_of(n.links.child()),
            Component::Clutch(c) if c.is_locked() => self.external_torque_of(n.links.child()),
            Component::Clutch(_) => 0.0,
            Component::Differential(_) => {
                let (left, right) = n.links.split();
                self.external_torque_of(left) + self.external_torque_of(right)
            }
            Component::Wheel(w) => w.reaction_torque + w.external_torque,
        }
    }

    /// Inject `torque` at `node` and propagate it toward the leaves.
    pub fn send_torque(&mut self, node: NodeId, torque: f32, velocities: Velocities, dt: f32) {
        self.send_torque_to(Some(node), torque, velocities, dt);
    }

    fn send_torque_to(&mut self, node: Option<NodeId>, torque: f32, v: Velocities, dt: f32) {
        let Some(id) = node else { return };
        let Some(n) = self.nodes.get(id) else { return };
        let parent = n.parent;
        let links = n.links;

        match &n.component {
            Component::Engine(_) => self.send_torque_to(links.child(), torque, v, dt),
            Component::Clutch(clutch) => {
                let left = self.angular_velocity_of(parent);
                let right = self.angular_velocity_of(links.child());
                let transfer = clutch.torque_out(torque, clutch.normal_force, left, right);
                self.store_clutch_state(id, transfer.state);

                self.send_torque_to(links.child(), transfer.torque_right, v, dt);
                if transfer.state == ClutchState::Slipping {
                    self.receive_torque_at(parent, transfer.torque_left, dt);
                }
            }
            Component::Gearbox(g) => {
                let out = g.torque_out(torque);
                self.send_torque_to(links.child(), out, v, dt);
            }
            Component::Differential(d) => {
                let (left, right) = links.split();
                let (t_left, t_right) = d.torque(
                    torque,
                    self.external_torque_of(left),
                    self.external_torque_of(right),
                );
                self.send_torque_to(left, t_left, v, dt);
                self.send_torque_to(right, t_right, v, dt);
            }
            Component::Wheel(_) => {
                let external_inertia = self.inertia_of(parent, Some(id), Direction::TowardRoot);
                if let Some(w) = self.wheel_mut(id) {
                    w.update(v.velocity_cog, v.yaw_velocity, external_inertia, torque, dt);
                }
            }
        }
    }

    fn store_clutch_state(&mut self, node: NodeId, state: ClutchState) {
        let Some(clutch) = self.clutch_mut(node) else { return };
        if clutch.state == state {
            return;
        }
        clutch.state = state;
        self.events.push(match state {
            ClutchState::Locked => DrivetrainEvent::ClutchLocked { node },
            ClutchState::Slipping => DrivetrainEvent::ClutchSlipping { node },
        });
    }

    /// Deliver a reflected torque to `node`. Only engines react to it.
    pub fn receive_torque(&mut self, node: NodeId, torque: f32, dt: f32) {
        self.receive_torque_at(Some(node), torque, dt);
    }

    fn receive_torque_at(&mut self, node: Option<NodeId>, torque: f32, dt: f32) {
        if let Some(e) = node.and_then(|id| self.engine_mut(id)) {
            e.receive_torque(torque, dt);
        }
    }

    /// Recompute the angular velocity of `node` from its (already updated)
    /// children, bottom-up.
    pub fn update_angular_velocity(&mut self, node: NodeId) -> AngularVelocity {
        self.update_angular_velocity_of(Some(node))
    }

    fn update_angular_velocity_of(&mut self, node: Option<NodeId>) -> AngularVelocity {
        let Some(id) = node else { return 0.0 };
        let Some(n) = self.nodes.get(id) else { return 0.0 };
        let parent = n.parent;
        let links = n.links;

        match n.component.kind() {
            ComponentKind::Engine => {
                let child = links.child();
                let downstream = child.map(|c| self.update_angular_velocity_of(Some(c)));
                let Some(e) = self.engine_mut(id) else { return 0.0 };
                if let Some(v) = downstream {
                    e.set_angular_velocity(v);
                }
                e.angular_velocity
            }
            ComponentKind::Clutch => {
                let downstream = self.update_angular_velocity_of(links.child());
                let locked = self.clutch(id).is_some_and(Clutch::is_locked);
                if locked {
                    downstream
                } else {
                    // Decoupled: the input shaft keeps its own speed. The
                    // subtree was still visited above so the gearbox input
                    // cache follows the wheels while the clutch slips.
                    self.angular_velocity_of(parent)
                }
            }
            ComponentKind::Gearbox => {
                let out = self.update_angular_velocity_of(links.child());
                self.gearbox_mut(id)
                    .map_or(0.0, |g| g.angular_velocity_in(out))
            }
            ComponentKind::Differential => {
                let (left, right) = links.split();
                let vl = self.update_angular_velocity_of(left);
                let vr = self.update_angular_velocity_of(right);
                self.differential(id).map_or(0.0, |d| d.velocity(vl, vr))
            }
            ComponentKind::Wheel => self.wheel(id).map_or(0.0, |w| w.angular_velocity),
        }
    }

    /// Whether the engine (or any node) at `node` is cut off from the
    /// wheels: a slipping clutch or a gearbox in neutral below it, or no
    /// driven child at all.
    pub fn is_decoupled(&self, node: NodeId) -> bool {
        let mut current = self.child_of(node);
        while let Some(id) = current {
            match self.component(id) {
                Some(Component::Clutch(c)) if !c.is_locked() => return true,
                Some(Component::Gearbox(g)) if g.is_neutral() => return true,
                Some(Component::Differential(_) | Component::Wheel(_)) => return false,
                Some(_) => {}
                None => return true,
            }
            current = self.child_of(id);
        }
        true
    }

    // -----------------------------------------------------------------------
    // Component mutation helpers
    // -----------------------------------------------------------------------

    /// Put the gearbox at `node` in `gear` (clamped to its range).
    pub fn shift(&mut self, node: NodeId, gear: i32) -> Result<i32, GraphError> {
        let gearbox = self.expect_gearbox(node)?;
        let from = gearbox.gear();
        gearbox.set_gear(gear);
        let to = gearbox.gear();
        if from != to {
            self.events.push(DrivetrainEvent::GearChanged { node, from, to });
        }
        Ok(to)
    }

    pub fn upshift(&mut self, node: NodeId) -> Result<i32, GraphError> {
        let gear = self.expect_gearbox(node)?.gear();
        self.shift(node, gear + 1)
    }

    pub fn downshift(&mut self, node: NodeId) -> Result<i32, GraphError> {
        let gear = self.expect_gearbox(node)?.gear();
        self.shift(node, gear - 1)
    }

    /// Flip the wheel at `node` unconditionally.
    pub fn change_wheel_direction(
        &mut self,
        node: NodeId,
        direction: WheelDirection,
    ) -> Result<(), GraphError> {
        let wheel = self.expect_wheel(node)?;
        let before = wheel.direction();
        wheel.change_direction(direction);
        if before != direction {
            self.events
                .push(DrivetrainEvent::WheelDirectionChanged { node, direction });
        }
        Ok(())
    }

    /// Flip the wheel at `node` only if it is at standstill. Returns
    /// whether the wheel now holds `direction`.
    pub fn try_change_wheel_direction(
        &mut self,
        node: NodeId,
        direction: WheelDirection,
    ) -> Result<bool, GraphError> {
        let wheel = self.expect_wheel(node)?;
        let before = wheel.direction();
        if before == direction {
            return Ok(true);
        }
        let changed = wheel.try_change_direction(direction);
        if changed {
            self.events
                .push(DrivetrainEvent::WheelDirectionChanged { node, direction });
        }
        Ok(changed)
    }

    fn expect_gearbox(&mut self, node: NodeId) -> Result<&mut Gearbox, GraphError> {
        self.component_mut(node)
            .ok_or(GraphError::NodeNotFound(node))?
            .as_gearbox_mut()
            .ok_or(GraphError::UnexpectedComponent {
                node,
                expected: ComponentKind::Gearbox,
            })
    }

    fn expect_wheel(&mut self, node: NodeId) -> Result<&mut Wheel, GraphError> {
        self.component_mut(node)
            .ok_or(GraphError::NodeNotFound(node))?
            .as_wheel_mut()
            .ok_or(GraphError::UnexpectedComponent {
                node,
                expected: ComponentKind::Wheel,
            })
    }
}

macro_rules! typed_access {
    ($($get:ident, $get_mut:ident => $as_ref:ident, $as_mut:ident, $ty:ty;)*) => {
        impl DrivetrainGraph {
            $(
                pub fn $get(&self, node: NodeId) -> Option<&$ty> {
                    self.nodes.get(node).and_then(|n| n.component.$as_ref())
                }

                pub fn $get_mut(&mut self, node: NodeId) -> Option<&mut $ty> {
                    self.nodes.get_mut(node).and_then(|n| n.component.$as_mut())
                }
            )*
        }
    };
}

typed_access! {
    engine, engine_mut => as_engine, as_engine_mut, Engine;
    clutch, clutch_mut => as_clutch, as_clutch_mut, Clutch;
    gearbox, gearbox_mut => as_gearbox, as_gearbox_mut, Gearbox;
    differential, differential_mut => as_differential, as_differential_mut, Differential;
    wheel, wheel_mut => as_wheel, as_wheel_mut, Wheel;
}
