//! Plain-data enumeration of a graph and the inverse rebuild.
//!
//! Persistence adapters serialize a [`GraphSnapshot`] however they like;
//! the core only guarantees that `Graph::from_snapshot(g.snapshot())`
//! yields a graph of the same kind with the same keys, values and
//! weights.

use super::{Graph, GraphKind, RESTORED_KEY_LIMIT, VertexKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One vertex of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord<V> {
    /// Vertex key
    pub key: VertexKey,
    /// Attached value
    pub value: V,
}

/// One edge of a snapshot, in stored orientation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord<E> {
    /// First endpoint
    pub from: VertexKey,
    /// Second endpoint
    pub to: VertexKey,
    /// Attached value
    pub value: E,
    /// Weight, present for weighted kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Enumeration of a graph's kind, vertices and edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot<V, E> {
    /// Graph kind
    pub kind: GraphKind,
    /// Key counter at snapshot time
    #[serde(default)]
    pub next_key: VertexKey,
    /// Vertices in ascending key order
    pub vertices: Vec<VertexRecord<V>>,
    /// Edges in ascending stored-key order
    pub edges: Vec<EdgeRecord<E>>,
}

impl<V: Clone, E: Clone> Graph<V, E> {
    /// Copy the graph into a snapshot
    pub fn snapshot(&self) -> GraphSnapshot<V, E> {
        GraphSnapshot {
            kind: self.kind(),
            next_key: self.next_key(),
            vertices: self
                .vertices()
                .map(|vertex| VertexRecord {
                    key: vertex.key(),
                    value: vertex.value().clone(),
                })
                .collect(),
            edges: self
                .edges()
                .map(|edge| EdgeRecord {
                    from: edge.key().first,
                    to: edge.key().second,
                    value: edge.value().clone(),
                    weight: edge.weight(),
                })
                .collect(),
        }
    }
}

impl<V, E> Graph<V, E> {
    /// Rebuild a graph from a snapshot.
    ///
    /// Vertex keys are kept as recorded, including holes left by removed
    /// vertices, and the key counter never falls below the recorded one.
    /// A repeated vertex key keeps its first record. Keys at or beyond
    /// [`RESTORED_KEY_LIMIT`] are skipped and the recorded counter is
    /// clamped to it.
    ///
    /// Edge records go through the normal insertion rules: self-loops,
    /// dangling endpoints and duplicates are skipped. A missing weight on
    /// a weighted kind defaults to `1.0`; a weight on an unweighted kind
    /// is ignored.
    pub fn from_snapshot(snapshot: GraphSnapshot<V, E>) -> Self {
        let GraphSnapshot {
            kind,
            next_key,
            vertices,
            edges,
        } = snapshot;

        let mut graph = Graph::new(kind);
        let recorded = vertices.len();
        let mut rejected = 0usize;
        for record in vertices {
            if !graph.insert_vertex_with_key(record.key, record.value) {
                rejected += 1;
            }
        }
        if rejected > 0 {
            warn!(rejected, recorded, "snapshot vertices rejected during rebuild");
        }
        if next_key > RESTORED_KEY_LIMIT {
            warn!(next_key, limit = RESTORED_KEY_LIMIT, "snapshot key counter clamped");
        }
        graph.reserve_keys(next_key);

        let total = edges.len();
        let mut skipped = 0usize;
        for record in edges {
            let weight = kind
                .is_weighted()
                .then(|| record.weight.unwrap_or(super::DEFAULT_WEIGHT));
            if !graph.insert_edge_raw(record.from, record.to, record.value, weight) {
                skipped += 1;
            }
        }

        if skipped > 0 {
            warn!(skipped, total, "snapshot edges rejected during rebuild");
        }
        debug!(
            %kind,
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph rebuilt from snapshot"
        );
        graph
    }
}
