//! Dijkstra's algorithm

use super::{ShortestPath, ShortestPaths};
use crate::graph::{GraphTopology, VertexKey};
use crate::{Error, Result};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{debug, warn};

/// Frontier entry, ordered so the max-heap pops the smallest distance first
#[derive(Debug, PartialEq)]
struct QueueItem(f64, VertexKey);

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .total_cmp(&self.0)
            .then_with(|| other.1.cmp(&self.1))
    }
}

/// Dijkstra shortest paths over a borrowed graph
#[derive(Debug, Clone, Copy)]
pub struct Dijkstra<'a, G> {
    graph: &'a G,
}

impl<'a, G: GraphTopology> Dijkstra<'a, G> {
    /// Wrap a graph
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    /// Distances and predecessors from `start` to every vertex.
    ///
    /// Fails with [`Error::NegativeWeight`] if any edge weight is negative
    /// and with [`Error::VertexNotFound`] if `start` is not live.
    pub fn shortest_paths(&self, start: VertexKey) -> Result<ShortestPaths> {
        self.check_preconditions(start)?;
        let paths = self.relax(start, None);
        debug!(
            start,
            reachable = paths.distances.values().filter(|d| d.is_finite()).count(),
            "dijkstra finished"
        );
        Ok(paths)
    }

    /// Shortest path from `start` to `target`, stopping once `target` is settled.
    ///
    /// `Ok(None)` means `target` is unreachable.
    pub fn shortest_path(
        &self,
        start: VertexKey,
        target: VertexKey,
    ) -> Result<Option<ShortestPath>> {
        self.check_preconditions(start)?;
        if !self.graph.contains_vertex(target) {
            return Err(Error::VertexNotFound(target));
        }

        let paths = self.relax(start, Some(target));
        let Some(distance) = paths.distance(target).filter(|d| d.is_finite()) else {
            debug!(start, target, "target unreachable");
            return Ok(None);
        };

        Ok(paths
            .path_to(target)
            .map(|path| ShortestPath { distance, path }))
    }

    fn check_preconditions(&self, start: VertexKey) -> Result<()> {
        if !self.graph.contains_vertex(start) {
            return Err(Error::VertexNotFound(start));
        }
        if let Some(link) = self.graph.links().find(|link| link.weight < 0.0) {
            warn!(
                from = link.source,
                to = link.target,
                weight = link.weight,
                "dijkstra refused: negative edge weight"
            );
            return Err(Error::NegativeWeight {
                from: link.source,
                to: link.target,
                weight: link.weight,
            });
        }
        Ok(())
    }

    fn relax(&self, start: VertexKey, target: Option<VertexKey>) -> ShortestPaths {
        let mut paths = ShortestPaths::unreached(start, self.graph.vertex_keys());
        let mut heap = BinaryHeap::new();
        heap.push(QueueItem(0.0, start));

        while let Some(QueueItem(dist, current)) = heap.pop() {
            if Some(current) == target {
                break;
            }
            if dist > paths.distances[&current] {
                continue;
            }

            for (neighbor, weight) in self.graph.neighbors(current) {
                let new_dist = dist + weight;
                let known = paths
                    .distances
                    .get(&neighbor)
                    .copied()
                    .unwrap_or(f64::INFINITY);
                if new_dist < known {
                    paths.distances.insert(neighbor, new_dist);
                    paths.previous.insert(neighbor, Some(current));
                    heap.push(QueueItem(new_dist, neighbor));
                }
            }
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn triangle() -> Graph<&'static str, &'static str> {
        let mut graph = Graph::plain();
        for name in ["a", "b", "c"] {
            graph.add_vertex(name);
        }
        graph.add_edge(0, 1, "ab");
        graph.add_edge(1, 2, "bc");
        graph.add_edge(2, 0, "ca");
        graph
    }

    fn diamond() -> Graph<&'static str, &'static str> {
        let mut graph = Graph::directed_weighted();
        for name in ["s", "a", "b", "t"] {
            graph.add_vertex(name);
        }
        graph.add_weighted_edge(0, 1, "sa", 1.0);
        graph.add_weighted_edge(0, 2, "sb", 2.0);
        graph.add_weighted_edge(1, 3, "at", 5.0);
        graph.add_weighted_edge(2, 3, "bt", 1.0);
        graph
    }

    #[test]
    fn test_triangle_direct_edge() {
        let graph = triangle();
        let result = Dijkstra::new(&graph).shortest_path(0, 2).unwrap();
        assert_eq!(
            result,
            Some(ShortestPath {
                distance: 1.0,
                path: vec![0, 2],
            })
        );
    }

    #[test]
    fn test_directed_weighted_diamond() {
        let graph = diamond();
        let result = Dijkstra::new(&graph).shortest_path(0, 3).unwrap().unwrap();
        assert_eq!(result.distance, 3.0);
        assert_eq!(result.path, vec![0, 2, 3]);
    }

    #[test]
    fn test_all_distances_and_predecessors() {
        let graph = diamond();
        let paths = Dijkstra::new(&graph).shortest_paths(0).unwrap();
        assert_eq!(paths.distance(0), Some(0.0));
        assert_eq!(paths.distance(1), Some(1.0));
        assert_eq!(paths.distance(2), Some(2.0));
        assert_eq!(paths.distance(3), Some(3.0));
        assert_eq!(paths.previous[&0], None);
        assert_eq!(paths.previous[&3], Some(2));
    }

    #[test]
    fn test_directed_edges_not_walked_backwards() {
        let graph = diamond();
        let paths = Dijkstra::new(&graph).shortest_paths(3).unwrap();
        assert!(!paths.is_reachable(0));
        assert_eq!(paths.previous[&0], None);
        assert_eq!(Dijkstra::new(&graph).shortest_path(3, 0).unwrap(), None);
    }

    #[test]
    fn test_unreachable_component() {
        let mut graph = triangle();
        graph.add_vertex("isolated");
        let paths = Dijkstra::new(&graph).shortest_paths(0).unwrap();
        assert_eq!(paths.distance(3), Some(f64::INFINITY));
        assert_eq!(paths.path_to(3), None);
    }

    #[test]
    fn test_negative_weight_refused() {
        let mut graph = diamond();
        graph.add_weighted_edge(3, 1, "back", -1.0);
        let err = Dijkstra::new(&graph).shortest_paths(0).unwrap_err();
        assert!(matches!(
            err,
            Error::NegativeWeight {
                from: 3,
                to: 1,
                ..
            }
        ));
        assert!(Dijkstra::new(&graph).shortest_path(0, 3).is_err());
    }

    #[test]
    fn test_missing_vertices() {
        let graph = triangle();
        let dijkstra = Dijkstra::new(&graph);
        assert!(matches!(
            dijkstra.shortest_paths(9),
            Err(Error::VertexNotFound(9))
        ));
        assert!(matches!(
            dijkstra.shortest_path(0, 9),
            Err(Error::VertexNotFound(9))
        ));
    }

    #[test]
    fn test_start_equals_target() {
        let graph = triangle();
        let result = Dijkstra::new(&graph).shortest_path(1, 1).unwrap().unwrap();
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.path, vec![1]);
    }
}
