//! Minimum spanning tree (Kruskal)

use super::DisjointSet;
use crate::graph::{GraphTopology, Link};
use crate::{Error, Result};
use tracing::{debug, warn};

/// Accepted edges of a minimum spanning forest
#[derive(Debug, Clone, PartialEq)]
pub struct MstResult {
    /// Accepted edges in ascending weight order
    pub edges: Vec<Link>,
    /// Sum of accepted weights
    pub total_weight: f64,
}

impl MstResult {
    /// Whether the forest is a single tree over `vertex_count` vertices
    pub fn spans(&self, vertex_count: usize) -> bool {
        self.edges.len() + 1 == vertex_count
    }
}

/// Kruskal's algorithm over an undirected weighted graph.
///
/// Disconnected graphs yield a spanning forest. Equal weights keep the
/// graph's edge order.
pub fn minimum_spanning_tree<G: GraphTopology>(graph: &G) -> Result<MstResult> {
    if graph.is_directed() || !graph.is_weighted() {
        warn!(kind = %graph.kind(), "minimum spanning tree refused");
        return Err(Error::unsupported("minimum spanning tree", graph.kind()));
    }

    let mut links: Vec<Link> = graph.links().collect();
    links.sort_by(|a, b| a.weight.total_cmp(&b.weight));

    let target = graph.vertex_count().saturating_sub(1);
    let mut sets = DisjointSet::new(graph.vertex_keys());
    let mut edges = Vec::with_capacity(target);
    let mut total_weight = 0.0;

    for link in links {
        if edges.len() == target {
            break;
        }
        if sets.union(link.source, link.target) {
            total_weight += link.weight;
            edges.push(link);
        }
    }

    debug!(
        vertices = graph.vertex_count(),
        accepted = edges.len(),
        total_weight,
        "minimum spanning tree finished"
    );
    Ok(MstResult {
        edges,
        total_weight,
    })
}
