//! Cycle enumeration from a start vertex

use crate::graph::{GraphTopology, VertexKey};
use crate::{Error, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

struct Frame {
    vertex: VertexKey,
    parent: Option<VertexKey>,
    neighbors: Vec<VertexKey>,
    next: usize,
}

/// Cycles reachable from `start`, canonicalized and deduplicated.
///
/// A cycle is reported when the DFS meets a vertex already on the current
/// path that is not the immediate parent. Each cycle is rotated (and
/// possibly reversed) to its lexicographically smallest form; the result
/// is sorted. Which cycles are found depends on the traversal, so this is
/// not an enumeration of every elementary cycle.
pub fn find_cycles<G: GraphTopology>(graph: &G, start: VertexKey) -> Result<Vec<Vec<VertexKey>>> {
    if !graph.contains_vertex(start) {
        return Err(Error::VertexNotFound(start));
    }

    let neighbors_of = |key: VertexKey| -> Vec<VertexKey> {
        graph.neighbors(key).map(|(neighbor, _)| neighbor).collect()
    };

    let mut visited: HashSet<VertexKey> = HashSet::from([start]);
    let mut path: Vec<VertexKey> = vec![start];
    let mut on_path: HashMap<VertexKey, usize> = HashMap::from([(start, 0)]);
    let mut cycles: BTreeSet<Vec<VertexKey>> = BTreeSet::new();
    let mut stack = vec![Frame {
        vertex: start,
        parent: None,
        neighbors: neighbors_of(start),
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.neighbors.len() {
            on_path.remove(&frame.vertex);
            path.pop();
            stack.pop();
            continue;
        }

        let neighbor = frame.neighbors[frame.next];
        frame.next += 1;
        if Some(neighbor) == frame.parent {
            continue;
        }

        if let Some(&index) = on_path.get(&neighbor) {
            let cycle = &path[index..];
            if cycle.len() > 1 {
                cycles.insert(canonical_cycle(cycle));
            }
        } else if visited.insert(neighbor) {
            let parent = frame.vertex;
            on_path.insert(neighbor, path.len());
            path.push(neighbor);
            stack.push(Frame {
                vertex: neighbor,
                parent: Some(parent),
                neighbors: neighbors_of(neighbor),
                next: 0,
            });
        }
    }

    debug!(start, cycles = cycles.len(), "cycle search finished");
    Ok(cycles.into_iter().collect())
}

/// Smallest rotation of `cycle` or of its reversal
pub fn canonical_cycle(cycle: &[VertexKey]) -> Vec<VertexKey> {
    let n = cycle.len();
    let reversed: Vec<VertexKey> = cycle.iter().rev().copied().collect();

    (0..n)
        .flat_map(|shift| {
            let forward: Vec<VertexKey> = cycle[shift..].iter().chain(&cycle[..shift]).copied().collect();
            let backward: Vec<VertexKey> = reversed[shift..]
                .iter()
                .chain(&reversed[..shift])
                .copied()
                .collect();
            [forward, backward]
        })
        .min()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, GraphKind};

    fn graph(kind: GraphKind, vertices: usize, edges: &[(u64, u64)]) -> Graph<usize, ()> {
        let mut graph = Graph::new(kind);
        for i in 0..vertices {
            graph.add_vertex(i);
        }
        for &(u, v) in edges {
            graph.add_edge(u, v, ());
        }
        graph
    }

    #[test]
    fn test_canonical_cycle() {
        assert_eq!(canonical_cycle(&[2, 0, 1]), vec![0, 1, 2]);
        assert_eq!(canonical_cycle(&[2, 1, 0]), vec![0, 1, 2]);
        assert_eq!(canonical_cycle(&[3, 0, 2, 1]), vec![0, 2, 1, 3]);
        assert_eq!(canonical_cycle(&[]), Vec::<VertexKey>::new());
    }

    #[test]
    fn test_triangles() {
        let undirected = graph(GraphKind::Plain, 3, &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(find_cycles(&undirected, 0).unwrap(), vec![vec![0, 1, 2]]);

        let directed = graph(GraphKind::Directed, 3, &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(find_cycles(&directed, 0).unwrap(), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_square_and_pentagon() {
        let square = graph(GraphKind::Plain, 4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert_eq!(find_cycles(&square, 0).unwrap(), vec![vec![0, 1, 2, 3]]);

        let edges: Vec<(u64, u64)> = (0..5).map(|i| (i, (i + 1) % 5)).collect();
        let pentagon = graph(GraphKind::Plain, 5, &edges);
        assert_eq!(find_cycles(&pentagon, 2).unwrap(), vec![vec![0, 1, 2, 3, 4]]);
    }

    #[test]
    fn test_square_with_chord() {
        let g = graph(GraphKind::Plain, 4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
        assert_eq!(
            find_cycles(&g, 0).unwrap(),
            vec![vec![0, 1, 2], vec![0, 1, 2, 3]]
        );
    }

    #[test]
    fn test_directed_parent_edge_skipped() {
        let g = graph(
            GraphKind::Directed,
            4,
            &[(0, 1), (1, 2), (2, 0), (1, 3), (3, 1)],
        );
        assert_eq!(find_cycles(&g, 0).unwrap(), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_acyclic_graphs() {
        let line = graph(GraphKind::Directed, 3, &[(0, 1), (1, 2)]);
        assert!(find_cycles(&line, 0).unwrap().is_empty());

        let tree = graph(GraphKind::Plain, 4, &[(0, 1), (0, 2), (2, 3)]);
        assert!(find_cycles(&tree, 3).unwrap().is_empty());

        let lonely = graph(GraphKind::Plain, 1, &[(0, 0)]);
        assert!(find_cycles(&lonely, 0).unwrap().is_empty());
    }

    #[test]
    fn test_only_start_component() {
        let g = graph(GraphKind::Plain, 6, &[(0, 1), (3, 4), (4, 5), (5, 3)]);
        assert!(find_cycles(&g, 0).unwrap().is_empty());
        assert_eq!(find_cycles(&g, 4).unwrap(), vec![vec![3, 4, 5]]);
    }

    #[test]
    fn test_missing_start() {
        let g = graph(GraphKind::Plain, 2, &[(0, 1)]);
        assert!(matches!(find_cycles(&g, 7), Err(Error::VertexNotFound(7))));
    }
}
