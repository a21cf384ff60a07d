//! Bellman-Ford shortest paths with negative-cycle detection

use super::ShortestPaths;
use crate::graph::{GraphTopology, Link, VertexKey};
use crate::{Error, Result};
use tracing::{debug, warn};

/// Result of a Bellman-Ford run
#[derive(Debug, Clone, PartialEq)]
pub struct BellmanFordResult {
    /// Distances and predecessors after relaxation
    pub paths: ShortestPaths,
    /// Whether a negative cycle is reachable from the source
    pub negative_cycle: bool,
}

impl BellmanFordResult {
    /// Path from the source to `target`.
    ///
    /// `None` when `target` is unreachable or a negative cycle was found,
    /// since distances are meaningless then.
    pub fn path_to(&self, target: VertexKey) -> Option<Vec<VertexKey>> {
        if self.negative_cycle {
            return None;
        }
        self.paths.path_to(target)
    }
}

/// Bellman-Ford over a borrowed graph.
///
/// Every edge is relaxed in its stored orientation; undirected kinds also
/// relax the opposite orientation. A negative edge in an undirected graph
/// is therefore a negative cycle of length two.
#[derive(Debug, Clone, Copy)]
pub struct BellmanFord<'a, G> {
    graph: &'a G,
}

impl<'a, G: GraphTopology> BellmanFord<'a, G> {
    /// Wrap a graph
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Relax from `start`; fails only when `start` is not a live vertex.
    ///
    /// An empty graph has no valid source and so returns
    /// [`Error::VertexNotFound`]; a single-vertex graph reports no
    /// negative cycle without relaxing anything.
    pub fn run(&self, start: VertexKey) -> Result<BellmanFordResult> {
        if !self.graph.contains_vertex(start) {
            return Err(Error::VertexNotFound(start));
        }

        let mut paths = ShortestPaths::unreached(start, self.graph.vertex_keys());
        let vertex_count = self.graph.vertex_count();
        // Zero vertices never gets here: the start check above refuses it
        if vertex_count <= 1 {
            return Ok(BellmanFordResult {
                paths,
                negative_cycle: false,
            });
        }

        let arcs = self.arcs();
        let mut rounds = 0;
        for _ in 0..vertex_count - 1 {
            rounds += 1;
            if !relax_round(&arcs, &mut paths) {
                break;
            }
        }

        let negative_cycle = arcs.iter().any(|arc| improves(arc, &paths).is_some());
        if negative_cycle {
            warn!(start, "negative cycle reachable from source");
        }
        debug!(start, rounds, arcs = arcs.len(), negative_cycle, "bellman-ford finished");

        Ok(BellmanFordResult {
            paths,
            negative_cycle,
        })
    }

    fn arcs(&self) -> Vec<Link> {
        let directed = self.graph.is_directed();
        let mut arcs = Vec::with_capacity(self.graph.edge_count() * 2);
        for link in self.graph.links() {
            arcs.push(link);
            if !directed {
                arcs.push(Link::new(link.target, link.source, link.weight));
            }
        }
        arcs
    }
}

/// Candidate distance through `arc` if it beats the current one
fn improves(arc: &Link, paths: &ShortestPaths) -> Option<f64> {
    let from = paths.distances.get(&arc.source).copied()?;
    if !from.is_finite() {
        return None;
    }
    let candidate = from + arc.weight;
    let current = paths
        .distances
        .get(&arc.target)
        .copied()
        .unwrap_or(f64::INFINITY);
    (candidate < current).then_some(candidate)
}

/// One pass over all arcs; returns whether anything changed
fn relax_round(arcs: &[Link], paths: &mut ShortestPaths) -> bool {
    let mut changed = false;
    for arc in arcs {
        if let Some(distance) = improves(arc, paths) {
            paths.distances.insert(arc.target, distance);
            paths.previous.insert(arc.target, Some(arc.source));
            changed = true;
        }
    }
    changed
}
