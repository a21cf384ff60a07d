//! Stepped force-directed simulator

use super::{LayoutConfig, Vec2};
use crate::Result;
use crate::graph::{GraphTopology, VertexKey};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Offset keeping gravity defined at the origin
const GRAVITY_OFFSET: f64 = 0.01;

/// Position table plus per-step displacement accumulators
#[derive(Debug, Clone)]
pub struct LayoutSimulator {
    config: LayoutConfig,
    positions: BTreeMap<VertexKey, Vec2>,
    displacements: BTreeMap<VertexKey, Vec2>,
    rng: StdRng,
}

impl LayoutSimulator {
    /// Empty simulator; fails if `config` does not validate
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            positions: BTreeMap::new(),
            displacements: BTreeMap::new(),
            rng,
        })
    }

    /// Simulator with every current vertex of `graph` placed at random
    pub fn for_graph<G: GraphTopology>(graph: &G, config: LayoutConfig) -> Result<Self> {
        let mut simulator = Self::new(config)?;
        for key in graph.vertex_keys() {
            simulator.register_vertex(key);
        }
        debug!(vertices = simulator.len(), "layout simulator created");
        Ok(simulator)
    }

    /// Active configuration
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Number of tracked keys, stale ones included
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no key is tracked
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Place `key` at a random viewport point unless already tracked.
    ///
    /// Returns the key's position either way.
    pub fn register_vertex(&mut self, key: VertexKey) -> Vec2 {
        if let Some(&position) = self.positions.get(&key) {
            return position;
        }

        let viewport = self.config.viewport;
        let position = Vec2::new(
            self.rng.gen_range(viewport.min_x..=viewport.max_x),
            self.rng.gen_range(viewport.min_y..=viewport.max_y),
        );
        self.positions.insert(key, position);
        self.displacements.insert(key, Vec2::ZERO);
        trace!(key, x = position.x, y = position.y, "vertex placed");
        position
    }

    /// Overwrite (or create) the position of `key`
    pub fn set_position(&mut self, key: VertexKey, position: Vec2) {
        self.positions.insert(key, position);
        self.displacements.entry(key).or_insert(Vec2::ZERO);
    }

    /// Current position of `key`
    pub fn position(&self, key: VertexKey) -> Option<Vec2> {
        self.positions.get(&key).copied()
    }

    /// Net displacement accumulated for `key` by the last step
    pub fn displacement(&self, key: VertexKey) -> Option<Vec2> {
        self.displacements.get(&key).copied()
    }

    /// Copy of the position table
    pub fn positions_snapshot(&self) -> BTreeMap<VertexKey, Vec2> {
        self.positions.clone()
    }

    /// Drop the entry for `key`
    pub fn forget(&mut self, key: VertexKey) -> Option<Vec2> {
        self.displacements.remove(&key);
        self.positions.remove(&key)
    }

    /// Drop entries whose key is no longer a vertex of `graph`; returns how many
    pub fn prune<G: GraphTopology>(&mut self, graph: &G) -> usize {
        let before = self.positions.len();
        self.positions.retain(|key, _| graph.contains_vertex(*key));
        self.displacements.retain(|key, _| graph.contains_vertex(*key));
        let removed = before - self.positions.len();
        if removed > 0 {
            debug!(removed, "stale layout entries pruned");
        }
        removed
    }

    /// Advance the simulation by one tick.
    ///
    /// Vertices of `graph` the simulator has not seen yet are placed first.
    /// When `dragged` is a live vertex it snaps to `drag_position` (or
    /// follows physics if none is given), and every vertex sharing an
    /// edge with it blends its physics target toward the dragged
    /// vertex's new position by `follow_factor`. Stale keys are left
    /// untouched.
    pub fn step<G: GraphTopology>(
        &mut self,
        graph: &G,
        dragged: Option<VertexKey>,
        drag_position: Option<Vec2>,
    ) {
        let keys: Vec<VertexKey> = graph.vertex_keys().collect();
        for &key in &keys {
            self.register_vertex(key);
        }
        for displacement in self.displacements.values_mut() {
            *displacement = Vec2::ZERO;
        }

        self.apply_repulsion(&keys);
        self.apply_attraction(graph);
        self.apply_gravity(&keys);

        let targets: BTreeMap<VertexKey, Vec2> = keys
            .iter()
            .map(|&key| {
                let position = self.positions[&key];
                let step = self.displacements[&key].clamp_length(self.config.max_displacement);
                (key, position + step * self.config.speed)
            })
            .collect();

        let anchor = dragged
            .filter(|key| targets.contains_key(key))
            .map(|key| (key, drag_position.unwrap_or(targets[&key])));

        let mut largest_move = 0.0f64;
        for (&key, &target) in &targets {
            let next = match anchor {
                Some((anchor_key, anchor_position)) if anchor_key == key => anchor_position,
                Some((anchor_key, anchor_position)) if graph.connects(key, anchor_key) => {
                    target.lerp(anchor_position, self.config.follow_factor)
                }
                _ => target,
            };
            if let Some(position) = self.positions.get_mut(&key) {
                largest_move = largest_move.max((next - *position).norm());
                *position = next;
            }
        }

        trace!(
            vertices = keys.len(),
            dragged = ?anchor.map(|(key, _)| key),
            largest_move,
            "layout step"
        );
    }

    fn apply_repulsion(&mut self, keys: &[VertexKey]) {
        let k = self.config.ideal_distance;
        for (i, &u) in keys.iter().enumerate() {
            for &v in &keys[i + 1..] {
                let delta = self.positions[&u] - self.positions[&v];
                let distance = delta.norm().max(self.config.min_distance);
                let force = self.config.repulsion_strength * k * k / distance;
                self.push(u, v, delta.normalize() * force);
            }
        }
    }

    fn apply_attraction<G: GraphTopology>(&mut self, graph: &G) {
        let k = self.config.ideal_distance;
        for link in graph.links() {
            let (Some(&pu), Some(&pv)) = (
                self.positions.get(&link.source),
                self.positions.get(&link.target),
            ) else {
                continue;
            };
            let delta = pu - pv;
            let distance = delta.norm().max(self.config.min_distance);
            let force = self.config.attraction_strength * distance * distance / k;
            self.push(link.source, link.target, delta.normalize() * -force);
        }
    }

    fn apply_gravity(&mut self, keys: &[VertexKey]) {
        for &key in keys {
            let position = self.positions[&key];
            let scale = if self.config.strong_gravity {
                position.norm() + GRAVITY_OFFSET
            } else {
                1.0
            };
            let pull = position.normalize() * (self.config.gravity * scale);
            if let Some(displacement) = self.displacements.get_mut(&key) {
                *displacement -= pull;
            }
        }
    }

    /// Add `force` to `u` and its opposite to `v`
    fn push(&mut self, u: VertexKey, v: VertexKey, force: Vec2) {
        if let Some(displacement) = self.displacements.get_mut(&u) {
            *displacement += force;
        }
        if let Some(displacement) = self.displacements.get_mut(&v) {
            *displacement -= force;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use approx::assert_relative_eq;

    fn seeded() -> LayoutConfig {
        LayoutConfig {
            seed: Some(7),
            ..LayoutConfig::default()
        }
    }

    fn path(n: usize) -> Graph<(), ()> {
        let mut graph = Graph::plain();
        for _ in 0..n {
            graph.add_vertex(());
        }
        for key in 1..n as u64 {
            graph.add_edge(key - 1, key, ());
        }
        graph
    }

    #[test]
    fn test_initial_positions_inside_viewport() {
        let graph = path(20);
        let simulator = LayoutSimulator::for_graph(&graph, seeded()).unwrap();
        let viewport = simulator.config().viewport;
        assert_eq!(simulator.len(), 20);
        assert!(simulator.positions_snapshot().values().all(|p| viewport.contains(*p)));
    }

    #[test]
    fn test_seed_makes_placement_reproducible() {
        let graph = path(5);
        let a = LayoutSimulator::for_graph(&graph, seeded()).unwrap();
        let b = LayoutSimulator::for_graph(&graph, seeded()).unwrap();
        assert_eq!(a.positions_snapshot(), b.positions_snapshot());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LayoutConfig {
            speed: -1.0,
            ..LayoutConfig::default()
        };
        assert!(LayoutSimulator::new(config).is_err());
    }

    #[test]
    fn test_step_registers_new_vertices() {
        let mut graph = path(2);
        let mut simulator = LayoutSimulator::for_graph(&graph, seeded()).unwrap();
        graph.add_vertex(());
        assert_eq!(simulator.position(2), None);

        simulator.step(&graph, None, None);
        assert!(simulator.position(2).is_some());
        assert_eq!(simulator.len(), 3);
    }

    #[test]
    fn test_edge_pulls_distant_endpoints_together() {
        let graph = path(2);
        let mut simulator = LayoutSimulator::new(seeded()).unwrap();
        simulator.set_position(0, Vec2::new(100.0, 300.0));
        simulator.set_position(1, Vec2::new(500.0, 300.0));

        simulator.step(&graph, None, None);
        let gap = (simulator.position(0).unwrap() - simulator.position(1).unwrap()).norm();
        assert!(gap < 400.0);
    }

    #[test]
    fn test_unconnected_vertices_repel() {
        let mut graph: Graph<(), ()> = Graph::plain();
        graph.add_vertex(());
        graph.add_vertex(());
        let mut simulator = LayoutSimulator::new(seeded()).unwrap();
        simulator.set_position(0, Vec2::new(300.0, 300.0));
        simulator.set_position(1, Vec2::new(310.0, 300.0));

        simulator.step(&graph, None, None);
        let gap = (simulator.position(0).unwrap() - simulator.position(1).unwrap()).norm();
        assert!(gap > 10.0);
    }

    #[test]
    fn test_displacement_is_clamped() {
        let graph = path(6);
        let mut simulator = LayoutSimulator::for_graph(&graph, seeded()).unwrap();
        let before = simulator.positions_snapshot();
        simulator.step(&graph, None, None);

        let limit = simulator.config().max_displacement * simulator.config().speed;
        for (key, position) in simulator.positions_snapshot() {
            assert!((position - before[&key]).norm() <= limit + 1e-9);
        }
    }

    #[test]
    fn test_gravity_pulls_toward_origin() {
        let graph = path(1);
        let start = Vec2::new(300.0, 400.0);

        let mut weak = LayoutSimulator::new(seeded()).unwrap();
        weak.set_position(0, start);
        weak.step(&graph, None, None);
        let weak_pull = start.norm() - weak.position(0).unwrap().norm();
        assert_relative_eq!(weak_pull, 0.001 * 0.1, epsilon = 1e-9);

        let mut strong = LayoutSimulator::new(LayoutConfig {
            strong_gravity: true,
            ..seeded()
        })
        .unwrap();
        strong.set_position(0, start);
        strong.step(&graph, None, None);
        let strong_pull = start.norm() - strong.position(0).unwrap().norm();
        assert!(strong_pull > weak_pull);
    }

    #[test]
    fn test_drag_snaps_and_neighbors_follow() {
        let mut graph = path(3);
        graph.add_vertex(());
        let mut dragged = LayoutSimulator::for_graph(&graph, seeded()).unwrap();
        let mut free = dragged.clone();

        let grab = Vec2::new(42.0, 24.0);
        dragged.step(&graph, Some(1), Some(grab));
        free.step(&graph, None, None);

        assert_eq!(dragged.position(1), Some(grab));
        for neighbor in [0, 2] {
            let expected = free.position(neighbor).unwrap().lerp(grab, 0.05);
            let actual = dragged.position(neighbor).unwrap();
            assert_relative_eq!(actual.x, expected.x, epsilon = 1e-9);
            assert_relative_eq!(actual.y, expected.y, epsilon = 1e-9);
        }
        assert_eq!(dragged.position(3), free.position(3));
    }

    #[test]
    fn test_drag_without_position_follows_physics() {
        let graph = path(2);
        let mut dragged = LayoutSimulator::for_graph(&graph, seeded()).unwrap();
        let mut free = dragged.clone();

        dragged.step(&graph, Some(0), None);
        free.step(&graph, None, None);
        assert_eq!(dragged.position(0), free.position(0));
    }

    #[test]
    fn test_stale_entries_tolerated_until_pruned() {
        let mut graph = path(3);
        let mut simulator = LayoutSimulator::for_graph(&graph, seeded()).unwrap();
        graph.remove_vertex(2);
        let stale = simulator.position(2);

        simulator.step(&graph, Some(2), Some(Vec2::ZERO));
        assert_eq!(simulator.position(2), stale);

        assert_eq!(simulator.prune(&graph), 1);
        assert_eq!(simulator.position(2), None);
        assert!(simulator.forget(0).is_some());
        assert_eq!(simulator.len(), 1);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut simulator = LayoutSimulator::new(seeded()).unwrap();
        let first = simulator.register_vertex(9);
        assert_eq!(simulator.register_vertex(9), first);
        simulator.set_position(9, Vec2::new(1.0, 1.0));
        assert_eq!(simulator.register_vertex(9), Vec2::new(1.0, 1.0));
        assert_eq!(simulator.displacement(9), Some(Vec2::ZERO));
    }
}
