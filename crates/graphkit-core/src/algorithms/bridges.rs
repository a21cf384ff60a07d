//! Bridge finding (Tarjan low-link)

use crate::graph::{EdgeKey, GraphTopology, VertexKey};
use std::collections::HashMap;
use tracing::debug;

struct Frame {
    vertex: VertexKey,
    parent: Option<VertexKey>,
    neighbors: Vec<VertexKey>,
    next: usize,
}

impl Frame {
    fn new<G: GraphTopology>(graph: &G, vertex: VertexKey, parent: Option<VertexKey>) -> Self {
        Self {
            vertex,
            parent,
            neighbors: graph.neighbors(vertex).map(|(key, _)| key).collect(),
            next: 0,
        }
    }
}

/// Every bridge of the graph, in the order the DFS closes them.
///
/// Each component is searched from its smallest key. Directed kinds only
/// follow outgoing edges, so their result describes the outgoing
/// adjacency rather than undirected connectivity.
pub fn bridges<G: GraphTopology>(graph: &G) -> Vec<EdgeKey> {
    let mut tin: HashMap<VertexKey, usize> = HashMap::new();
    let mut low: HashMap<VertexKey, usize> = HashMap::new();
    let mut timer = 0usize;
    let mut found = Vec::new();

    for root in graph.vertex_keys() {
        if tin.contains_key(&root) {
            continue;
        }

        tin.insert(root, timer);
        low.insert(root, timer);
        timer += 1;
        let mut stack = vec![Frame::new(graph, root, None)];

        while let Some(frame) = stack.last_mut() {
            let u = frame.vertex;

            if frame.next < frame.neighbors.len() {
                let v = frame.neighbors[frame.next];
                frame.next += 1;
                if Some(v) == frame.parent {
                    continue;
                }

                match tin.get(&v) {
                    Some(&discovered) => {
                        let entry = low.entry(u).or_insert(discovered);
                        *entry = (*entry).min(discovered);
                    }
                    None => {
                        tin.insert(v, timer);
                        low.insert(v, timer);
                        timer += 1;
                        stack.push(Frame::new(graph, v, Some(u)));
                    }
                }
                continue;
            }

            let Some(finished) = stack.pop() else { break };
            let Some(parent) = finished.parent else {
                continue;
            };

            let child_low = low[&finished.vertex];
            let parent_low = low.entry(parent).or_insert(child_low);
            *parent_low = (*parent_low).min(child_low);

            if child_low > tin[&parent] {
                if let Some(key) = graph.edge_key(parent, finished.vertex) {
                    found.push(key);
                }
            }
        }
    }

    debug!(
        vertices = graph.vertex_count(),
        bridges = found.len(),
        "bridge search finished"
    );
    found
}
