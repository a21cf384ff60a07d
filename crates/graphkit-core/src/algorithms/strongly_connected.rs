//! Strongly connected components (Kosaraju)

use crate::graph::{GraphTopology, VertexKey};
use crate::{Error, Result};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Strongly connected components result
#[derive(Debug, Clone, PartialEq)]
pub struct SccResult {
    /// Vertex groups in discovery order
    pub components: Vec<Vec<VertexKey>>,
    /// Component index for each grouped vertex
    pub membership: BTreeMap<VertexKey, usize>,
}

impl SccResult {
    /// Number of components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Whether `u` and `v` landed in the same component
    pub fn same_component(&self, u: VertexKey, v: VertexKey) -> bool {
        match (self.membership.get(&u), self.membership.get(&v)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

type Adjacency = BTreeMap<VertexKey, Vec<VertexKey>>;

/// Kosaraju's two-pass algorithm over a directed graph.
///
/// Adjacency is built from the edge list, so a vertex without any edge
/// belongs to no component and is left out of the result.
pub fn strongly_connected_components<G: GraphTopology>(graph: &G) -> Result<SccResult> {
    if !graph.is_directed() {
        warn!(kind = %graph.kind(), "strongly connected components refused");
        return Err(Error::unsupported("strongly connected components", graph.kind()));
    }

    let mut forward: Adjacency = BTreeMap::new();
    let mut reverse: Adjacency = BTreeMap::new();
    for link in graph.links() {
        forward.entry(link.source).or_default().push(link.target);
        forward.entry(link.target).or_default();
        reverse.entry(link.target).or_default().push(link.source);
        reverse.entry(link.source).or_default();
    }

    let order = finish_order(&forward);

    let mut visited = HashSet::new();
    let mut components = Vec::new();
    let mut membership = BTreeMap::new();
    for &seed in order.iter().rev() {
        if !visited.insert(seed) {
            continue;
        }

        let index = components.len();
        let mut component = Vec::new();
        let mut stack = vec![seed];
        while let Some(current) = stack.pop() {
            component.push(current);
            membership.insert(current, index);
            for &next in reverse.get(&current).into_iter().flatten() {
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }
        components.push(component);
    }

    debug!(
        vertices = forward.len(),
        components = components.len(),
        "strongly connected components finished"
    );
    Ok(SccResult {
        components,
        membership,
    })
}

/// Vertices in DFS finishing order over `adjacency`
fn finish_order(adjacency: &Adjacency) -> Vec<VertexKey> {
    let mut visited = HashSet::new();
    let mut order = Vec::with_capacity(adjacency.len());

    for &root in adjacency.keys() {
        if !visited.insert(root) {
            continue;
        }

        let mut stack: Vec<(VertexKey, usize)> = vec![(root, 0)];
        while let Some((vertex, next)) = stack.last_mut() {
            let successors = adjacency.get(vertex).map(Vec::as_slice).unwrap_or(&[]);
            if let Some(&successor) = successors.get(*next) {
                *next += 1;
                if visited.insert(successor) {
                    stack.push((successor, 0));
                }
            } else {
                order.push(*vertex);
                stack.pop();
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, GraphKind};

    fn directed(vertices: usize, edges: &[(u64, u64)]) -> Graph<(), ()> {
        let mut graph = Graph::directed();
        for _ in 0..vertices {
            graph.add_vertex(());
        }
        for &(u, v) in edges {
            graph.add_edge(u, v, ());
        }
        graph
    }

    fn normalized(result: &SccResult) -> Vec<Vec<VertexKey>> {
        let mut groups: Vec<Vec<VertexKey>> = result
            .components
            .iter()
            .map(|group| {
                let mut group = group.clone();
                group.sort_unstable();
                group
            })
            .collect();
        groups.sort();
        groups
    }

    #[test]
    fn test_scc_scenario() {
        let graph = directed(
            8,
            &[
                (0, 1),
                (1, 2),
                (2, 0),
                (2, 3),
                (3, 4),
                (4, 5),
                (5, 6),
                (6, 7),
                (6, 4),
                (4, 7),
            ],
        );
        let result = strongly_connected_components(&graph).unwrap();
        assert_eq!(
            normalized(&result),
            vec![vec![0, 1, 2], vec![3], vec![4, 5, 6], vec![7]]
        );
        assert!(result.same_component(4, 6));
        assert!(!result.same_component(2, 3));
    }

    #[test]
    fn test_topological_component_order() {
        let graph = directed(4, &[(0, 1), (1, 0), (1, 2), (2, 3)]);
        let result = strongly_connected_components(&graph).unwrap();
        let order: Vec<usize> = [0, 2, 3].iter().map(|k| result.membership[k]).collect();
        assert!(order[0] < order[1] && order[1] < order[2]);
    }

    #[test]
    fn test_zero_edge_vertices_are_omitted() {
        let graph = directed(4, &[(0, 1)]);
        let result = strongly_connected_components(&graph).unwrap();
        assert_eq!(normalized(&result), vec![vec![0], vec![1]]);
        assert!(!result.membership.contains_key(&3));
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let edges: Vec<(u64, u64)> = (0..50_000).map(|i| (i, i + 1)).collect();
        let graph = directed(50_001, &edges);
        let result = strongly_connected_components(&graph).unwrap();
        assert_eq!(result.component_count(), 50_001);
    }

    #[test]
    fn test_refuses_undirected() {
        let graph: Graph<(), ()> = Graph::new(GraphKind::Weighted);
        assert!(matches!(
            strongly_connected_components(&graph),
            Err(Error::UnsupportedGraph { .. })
        ));
    }
}
