//! Graph model
//!
//! A graph owns its vertices and edges. Vertices get dense keys assigned
//! from a monotonically increasing counter that is never rewound, so a
//! removed key stays dead for the lifetime of the graph.
//!
//! Four kinds share one storage type:
//!
//! | kind               | edge key         | weights          |
//! |--------------------|------------------|------------------|
//! | `Plain`            | unordered pair   | implicit `1.0`   |
//! | `Directed`         | ordered pair     | implicit `1.0`   |
//! | `Weighted`         | unordered pair   | stored per edge  |
//! | `DirectedWeighted` | ordered pair     | stored per edge  |
//!
//! Algorithms never match on the kind directly; they ask the
//! [`GraphTopology`] capabilities (`is_directed`, `is_weighted`) and the
//! neighbor queries that already follow the kind's semantics.

mod core;
mod snapshot;

pub use self::core::Graph;
pub use snapshot::{EdgeRecord, GraphSnapshot, VertexRecord};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vertex identifier, unique within a graph's lifetime
pub type VertexKey = u64;

/// Weight used for edges of unweighted kinds
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Upper bound on the key counter a snapshot rebuild may restore.
///
/// Keeps `2^63` fresh keys available to `add_vertex` after any rebuild,
/// so the counter never wraps back onto a used key.
pub const RESTORED_KEY_LIMIT: VertexKey = VertexKey::MAX / 2;

/// The four graph variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    /// Undirected, unweighted
    Plain,
    /// Directed, unweighted
    Directed,
    /// Undirected, weighted
    Weighted,
    /// Directed, weighted
    DirectedWeighted,
}

impl GraphKind {
    /// Whether edges are ordered pairs
    pub fn is_directed(self) -> bool {
        matches!(self, Self::Directed | Self::DirectedWeighted)
    }

    /// Whether edges carry their own weight
    pub fn is_weighted(self) -> bool {
        matches!(self, Self::Weighted | Self::DirectedWeighted)
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plain => "plain",
            Self::Directed => "directed",
            Self::Weighted => "weighted",
            Self::DirectedWeighted => "directed weighted",
        };
        f.write_str(name)
    }
}

/// Edge identifier: the pair of endpoint keys in stored orientation.
///
/// For undirected kinds the orientation is whichever one was inserted
/// first; lookups accept both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    /// First endpoint (source for directed kinds)
    pub first: VertexKey,
    /// Second endpoint (target for directed kinds)
    pub second: VertexKey,
}

impl EdgeKey {
    /// Create an edge key
    pub fn new(first: VertexKey, second: VertexKey) -> Self {
        Self { first, second }
    }

    /// The same pair in opposite orientation
    pub fn reversed(self) -> Self {
        Self::new(self.second, self.first)
    }

    /// Whether `key` is one of the endpoints
    pub fn touches(self, key: VertexKey) -> bool {
        self.first == key || self.second == key
    }

    /// The endpoint opposite to `key`, if `key` is an endpoint
    pub fn opposite(self, key: VertexKey) -> Option<VertexKey> {
        if self.first == key {
            Some(self.second)
        } else if self.second == key {
            Some(self.first)
        } else {
            None
        }
    }
}

impl From<(VertexKey, VertexKey)> for EdgeKey {
    fn from((first, second): (VertexKey, VertexKey)) -> Self {
        Self::new(first, second)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// A vertex and its attached value
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex<V> {
    key: VertexKey,
    value: V,
}

impl<V> Vertex<V> {
    pub(crate) fn new(key: VertexKey, value: V) -> Self {
        Self { key, value }
    }

    /// Vertex key
    pub fn key(&self) -> VertexKey {
        self.key
    }

    /// Attached value
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Mutable access to the attached value
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Consume the vertex, returning its value
    pub fn into_value(self) -> V {
        self.value
    }
}

/// An edge, its attached value and (for weighted kinds) its weight
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<E> {
    key: EdgeKey,
    value: E,
    weight: Option<f64>,
}

impl<E> Edge<E> {
    pub(crate) fn new(key: EdgeKey, value: E, weight: Option<f64>) -> Self {
        Self { key, value, weight }
    }

    /// Edge key in stored orientation
    pub fn key(&self) -> EdgeKey {
        self.key
    }

    /// Attached value
    pub fn value(&self) -> &E {
        &self.value
    }

    /// Mutable access to the attached value
    pub fn value_mut(&mut self) -> &mut E {
        &mut self.value
    }

    /// Stored weight; `None` for unweighted kinds
    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    /// Weight as seen by algorithms: unweighted edges cost `1.0`
    pub fn cost(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }

    /// Replace the weight of a weighted edge.
    ///
    /// Returns `false` (and changes nothing) on an unweighted edge.
    pub fn set_weight(&mut self, weight: f64) -> bool {
        match self.weight.as_mut() {
            Some(current) => {
                *current = weight;
                true
            }
            None => false,
        }
    }

    /// Consume the edge, returning its value
    pub fn into_value(self) -> E {
        self.value
    }
}

/// Source/target/weight projection of an edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// First endpoint in stored orientation
    pub source: VertexKey,
    /// Second endpoint in stored orientation
    pub target: VertexKey,
    /// Edge weight, `1.0` for unweighted kinds
    pub weight: f64,
}

impl Link {
    /// Create a link
    pub fn new(source: VertexKey, target: VertexKey, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Edge key of this link
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.source, self.target)
    }
}

impl<E> From<&Edge<E>> for Link {
    fn from(edge: &Edge<E>) -> Self {
        Link::new(edge.key.first, edge.key.second, edge.cost())
    }
}

/// Read-only view every algorithm runs against.
///
/// `neighbors` follows the traversal semantics of the kind: outgoing
/// edges for directed kinds, incidence in either orientation for
/// undirected ones. `incident` ignores direction and yields one entry
/// per incident edge, so a vertex joined by both `(u, v)` and `(v, u)`
/// in a directed graph shows up twice.
pub trait GraphTopology {
    /// Graph kind
    fn kind(&self) -> GraphKind;

    /// Whether edges are ordered pairs
    fn is_directed(&self) -> bool {
        self.kind().is_directed()
    }

    /// Whether edges carry their own weight
    fn is_weighted(&self) -> bool {
        self.kind().is_weighted()
    }

    /// Number of live vertices
    fn vertex_count(&self) -> usize;

    /// Number of edges
    fn edge_count(&self) -> usize;

    /// Whether `key` is a live vertex
    fn contains_vertex(&self, key: VertexKey) -> bool;

    /// Live vertex keys in ascending order
    fn vertex_keys(&self) -> impl Iterator<Item = VertexKey> + '_;

    /// Every edge projected to a link, in stored orientation
    fn links(&self) -> impl Iterator<Item = Link> + '_;

    /// Traversal neighbors of `key` with the cost of the connecting edge
    fn neighbors(&self, key: VertexKey) -> impl Iterator<Item = (VertexKey, f64)> + '_;

    /// Opposite endpoints of every edge touching `key`, ignoring direction
    fn incident(&self, key: VertexKey) -> impl Iterator<Item = VertexKey> + '_;

    /// Number of edges touching `key`, ignoring direction
    fn degree(&self, key: VertexKey) -> usize {
        self.incident(key).count()
    }

    /// Whether an edge joins `u` and `v` in either orientation
    fn connects(&self, u: VertexKey, v: VertexKey) -> bool;

    /// Stored key of the edge joining `u` and `v`, with the orientation
    /// rules of [`Graph::edge`]
    fn edge_key(&self, u: VertexKey, v: VertexKey) -> Option<EdgeKey>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_capabilities() {
        assert!(!GraphKind::Plain.is_directed());
        assert!(!GraphKind::Plain.is_weighted());
        assert!(GraphKind::Directed.is_directed());
        assert!(!GraphKind::Directed.is_weighted());
        assert!(!GraphKind::Weighted.is_directed());
        assert!(GraphKind::Weighted.is_weighted());
        assert!(GraphKind::DirectedWeighted.is_directed());
        assert!(GraphKind::DirectedWeighted.is_weighted());
    }

    #[test]
    fn test_edge_key_helpers() {
        let key = EdgeKey::new(3, 7);
        assert_eq!(key.reversed(), EdgeKey::new(7, 3));
        assert!(key.touches(3));
        assert!(!key.touches(4));
        assert_eq!(key.opposite(7), Some(3));
        assert_eq!(key.opposite(5), None);
        assert_eq!(key.to_string(), "(3, 7)");
    }

    #[test]
    fn test_edge_weight_mutation() {
        let mut weighted = Edge::new(EdgeKey::new(0, 1), "w", Some(2.5));
        assert!(weighted.set_weight(4.0));
        assert_eq!(weighted.weight(), Some(4.0));

        let mut plain = Edge::new(EdgeKey::new(0, 1), "p", None);
        assert!(!plain.set_weight(4.0));
        assert_eq!(plain.weight(), None);
        assert_eq!(plain.cost(), DEFAULT_WEIGHT);
    }
}
