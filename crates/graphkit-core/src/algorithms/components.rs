//! Connected components of the underlying undirected graph

use crate::graph::{GraphTopology, VertexKey};
use std::collections::HashSet;

/// Weakly connected components, each sorted, ordered by smallest key.
///
/// Direction is ignored and isolated vertices form singleton components.
pub fn connected_components<G: GraphTopology>(graph: &G) -> Vec<Vec<VertexKey>> {
    let mut visited = HashSet::new();
    let mut components = Vec::new();

    for root in graph.vertex_keys() {
        if !visited.insert(root) {
            continue;
        }

        let mut component = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            component.push(current);
            for neighbor in graph.incident(current) {
                if visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        component.sort_unstable();
        components.push(component);
    }

    components
}

/// Number of weakly connected components
pub fn component_count<G: GraphTopology>(graph: &G) -> usize {
    connected_components(graph).len()
}
