//! Single-source shortest paths
//!
//! - [`Dijkstra`]: priority-queue relaxation, refuses negative weights
//! - [`BellmanFord`]: `|V| - 1` relaxation rounds plus a negative-cycle check
//!
//! Both resolve neighbors through [`GraphTopology::neighbors`], so
//! directed kinds only follow outgoing edges and unweighted kinds cost
//! `1.0` per edge.
//!
//! [`GraphTopology::neighbors`]: crate::graph::GraphTopology::neighbors

mod bellman_ford;
mod dijkstra;

pub use bellman_ford::{BellmanFord, BellmanFordResult};
pub use dijkstra::Dijkstra;

use crate::graph::VertexKey;
use std::collections::{BTreeMap, HashSet};

/// Distances and predecessors from one source vertex
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    /// Source vertex
    pub source: VertexKey,
    /// Distance per vertex, `f64::INFINITY` when unreachable
    pub distances: BTreeMap<VertexKey, f64>,
    /// Predecessor per vertex, `None` for the source and unreachable vertices
    pub previous: BTreeMap<VertexKey, Option<VertexKey>>,
}

impl ShortestPaths {
    pub(crate) fn unreached(source: VertexKey, keys: impl Iterator<Item = VertexKey>) -> Self {
        let mut distances = BTreeMap::new();
        let mut previous = BTreeMap::new();
        for key in keys {
            distances.insert(key, f64::INFINITY);
            previous.insert(key, None);
        }
        distances.insert(source, 0.0);
        Self {
            source,
            distances,
            previous,
        }
    }

    /// Distance to `key`; `None` if `key` was not a vertex at run time
    pub fn distance(&self, key: VertexKey) -> Option<f64> {
        self.distances.get(&key).copied()
    }

    /// Whether `key` has a finite distance
    pub fn is_reachable(&self, key: VertexKey) -> bool {
        self.distance(key).is_some_and(f64::is_finite)
    }

    /// Path from the source to `target`, both included
    pub fn path_to(&self, target: VertexKey) -> Option<Vec<VertexKey>> {
        if !self.is_reachable(target) {
            return None;
        }
        reconstruct_path(&self.previous, target)
    }
}

/// Distance and vertex sequence of a single shortest path
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Total path cost
    pub distance: f64,
    /// Vertices from start to target, both included
    pub path: Vec<VertexKey>,
}

/// Walk predecessors back from `target` and reverse.
///
/// Returns `None` if the predecessor chain loops, which only happens on
/// tables left behind by a negative cycle.
pub fn reconstruct_path(
    previous: &BTreeMap<VertexKey, Option<VertexKey>>,
    target: VertexKey,
) -> Option<Vec<VertexKey>> {
    let mut path = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(target);

    while let Some(key) = current {
        if !seen.insert(key) {
            return None;
        }
        path.push(key);
        current = previous.get(&key).copied().flatten();
    }

    path.reverse();
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruct_path() {
        let previous = BTreeMap::from([(0, None), (1, Some(0)), (2, Some(1)), (3, None)]);
        assert_eq!(reconstruct_path(&previous, 2), Some(vec![0, 1, 2]));
        assert_eq!(reconstruct_path(&previous, 0), Some(vec![0]));
    }

    #[test]
    fn test_reconstruct_path_rejects_loops() {
        let previous = BTreeMap::from([(0, Some(2)), (1, Some(0)), (2, Some(1))]);
        assert_eq!(reconstruct_path(&previous, 2), None);
    }

    #[test]
    fn test_path_to_unreachable() {
        let paths = ShortestPaths::unreached(0, [0, 1, 2].into_iter());
        assert!(paths.is_reachable(0));
        assert!(!paths.is_reachable(1));
        assert_eq!(paths.path_to(1), None);
        assert_eq!(paths.path_to(0), Some(vec![0]));
        assert_eq!(paths.distance(9), None);
    }
}
