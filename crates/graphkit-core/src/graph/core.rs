//! Graph storage and mutation

use super::{
    DEFAULT_WEIGHT, Edge, EdgeKey, GraphKind, GraphTopology, Link, RESTORED_KEY_LIMIT, Vertex,
    VertexKey,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Vertex/edge store shared by the four graph kinds
#[derive(Debug, Clone)]
pub struct Graph<V, E> {
    kind: GraphKind,
    vertices: BTreeMap<VertexKey, Vertex<V>>,
    edges: BTreeMap<EdgeKey, Edge<E>>,
    /// `successors[u]` holds `v` for every stored key `(u, v)`
    successors: BTreeMap<VertexKey, BTreeSet<VertexKey>>,
    /// `predecessors[v]` holds `u` for every stored key `(u, v)`
    predecessors: BTreeMap<VertexKey, BTreeSet<VertexKey>>,
    next_key: VertexKey,
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self::new(GraphKind::Plain)
    }
}

impl<V, E> Graph<V, E> {
    /// Create an empty graph of the given kind
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
            successors: BTreeMap::new(),
            predecessors: BTreeMap::new(),
            next_key: 0,
        }
    }

    /// Undirected, unweighted graph
    pub fn plain() -> Self {
        Self::new(GraphKind::Plain)
    }

    /// Directed, unweighted graph
    pub fn directed() -> Self {
        Self::new(GraphKind::Directed)
    }

    /// Undirected, weighted graph
    pub fn weighted() -> Self {
        Self::new(GraphKind::Weighted)
    }

    /// Directed, weighted graph
    pub fn directed_weighted() -> Self {
        Self::new(GraphKind::DirectedWeighted)
    }

    /// Graph kind
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Key the next inserted vertex will receive
    pub fn next_key(&self) -> VertexKey {
        self.next_key
    }

    /// Number of live vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Live vertices in ascending key order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<V>> + '_ {
        self.vertices.values()
    }

    /// Edges in ascending stored-key order
    pub fn edges(&self) -> impl Iterator<Item = &Edge<E>> + '_ {
        self.edges.values()
    }

    /// Insert a vertex under the next free key.
    ///
    /// The counter starts at zero and a rebuild restores it to at most
    /// [`RESTORED_KEY_LIMIT`], so it cannot wrap onto a used key.
    pub fn add_vertex(&mut self, value: V) -> &Vertex<V> {
        let key = self.next_key;
        self.next_key += 1;
        trace!(key, "vertex added");
        self.vertices
            .entry(key)
            .or_insert_with(|| Vertex::new(key, value))
    }

    /// Insert an edge with the kind's default weight.
    ///
    /// Returns `None` for a self-loop or when either endpoint is not a
    /// live vertex. Inserting a pair that is already present (in either
    /// orientation for undirected kinds) leaves the graph unchanged and
    /// returns the existing edge.
    pub fn add_edge(&mut self, u: VertexKey, v: VertexKey, value: E) -> Option<&Edge<E>> {
        let weight = self.kind.is_weighted().then_some(DEFAULT_WEIGHT);
        self.insert_edge(u, v, value, weight)
    }

    /// Insert an edge with an explicit weight.
    ///
    /// Unweighted kinds refuse the call and return `None`; otherwise the
    /// rules of [`Graph::add_edge`] apply.
    pub fn add_weighted_edge(
        &mut self,
        u: VertexKey,
        v: VertexKey,
        value: E,
        weight: f64,
    ) -> Option<&Edge<E>> {
        if !self.kind.is_weighted() {
            return None;
        }
        self.insert_edge(u, v, value, Some(weight))
    }

    fn insert_edge(
        &mut self,
        u: VertexKey,
        v: VertexKey,
        value: E,
        weight: Option<f64>,
    ) -> Option<&Edge<E>> {
        if u == v || !self.vertices.contains_key(&u) || !self.vertices.contains_key(&v) {
            return None;
        }

        let key = match self.stored_key(u, v) {
            Some(existing) => return self.edges.get(&existing),
            None => EdgeKey::new(u, v),
        };

        self.successors.entry(u).or_default().insert(v);
        self.predecessors.entry(v).or_default().insert(u);
        trace!(first = u, second = v, "edge added");

        let edge = self
            .edges
            .entry(key)
            .or_insert_with(|| Edge::new(key, value, weight));
        Some(&*edge)
    }

    /// Stored orientation of the pair, if an edge joins it
    fn stored_key(&self, u: VertexKey, v: VertexKey) -> Option<EdgeKey> {
        let key = EdgeKey::new(u, v);
        if self.edges.contains_key(&key) {
            Some(key)
        } else if !self.kind.is_directed() && self.edges.contains_key(&key.reversed()) {
            Some(key.reversed())
        } else {
            None
        }
    }

    /// Vertex by key
    pub fn vertex(&self, key: VertexKey) -> Option<&Vertex<V>> {
        self.vertices.get(&key)
    }

    /// Mutable vertex by key
    pub fn vertex_mut(&mut self, key: VertexKey) -> Option<&mut Vertex<V>> {
        self.vertices.get_mut(&key)
    }

    /// Edge joining `u` and `v`.
    ///
    /// Undirected kinds match either orientation, directed kinds only
    /// `(u, v)`.
    pub fn edge(&self, u: VertexKey, v: VertexKey) -> Option<&Edge<E>> {
        let key = self.stored_key(u, v)?;
        self.edges.get(&key)
    }

    /// Mutable edge joining `u` and `v`, same orientation rules as [`Graph::edge`]
    pub fn edge_mut(&mut self, u: VertexKey, v: VertexKey) -> Option<&mut Edge<E>> {
        let key = self.stored_key(u, v)?;
        self.edges.get_mut(&key)
    }

    /// Remove a vertex together with every edge touching it
    pub fn remove_vertex(&mut self, key: VertexKey) -> Option<Vertex<V>> {
        let vertex = self.vertices.remove(&key)?;

        let outgoing = self.successors.remove(&key).unwrap_or_default();
        for target in &outgoing {
            self.edges.remove(&EdgeKey::new(key, *target));
            if let Some(sources) = self.predecessors.get_mut(target) {
                sources.remove(&key);
            }
        }

        let incoming = self.predecessors.remove(&key).unwrap_or_default();
        for source in &incoming {
            self.edges.remove(&EdgeKey::new(*source, key));
            if let Some(targets) = self.successors.get_mut(source) {
                targets.remove(&key);
            }
        }

        trace!(
            key,
            removed_edges = outgoing.len() + incoming.len(),
            "vertex removed"
        );
        Some(vertex)
    }

    /// Remove the edge joining `u` and `v`, same orientation rules as [`Graph::edge`]
    pub fn remove_edge(&mut self, u: VertexKey, v: VertexKey) -> Option<Edge<E>> {
        let key = self.stored_key(u, v)?;
        let edge = self.edges.remove(&key)?;

        if let Some(targets) = self.successors.get_mut(&key.first) {
            targets.remove(&key.second);
        }
        if let Some(sources) = self.predecessors.get_mut(&key.second) {
            sources.remove(&key.first);
        }

        trace!(first = key.first, second = key.second, "edge removed");
        Some(edge)
    }

    fn successor_keys(&self, key: VertexKey) -> impl Iterator<Item = VertexKey> + '_ {
        self.successors.get(&key).into_iter().flatten().copied()
    }

    fn predecessor_keys(&self, key: VertexKey) -> impl Iterator<Item = VertexKey> + '_ {
        self.predecessors.get(&key).into_iter().flatten().copied()
    }

    /// Rebuild-only insertion that keeps the caller's key.
    ///
    /// Refuses a key already present or one that would push the counter
    /// past [`RESTORED_KEY_LIMIT`].
    pub(super) fn insert_vertex_with_key(&mut self, key: VertexKey, value: V) -> bool {
        let Some(next) = key
            .checked_add(1)
            .filter(|&next| next <= RESTORED_KEY_LIMIT)
        else {
            return false;
        };
        if self.vertices.contains_key(&key) {
            return false;
        }
        self.vertices.insert(key, Vertex::new(key, value));
        self.next_key = self.next_key.max(next);
        true
    }

    /// Raise the key counter, never lowering it nor past [`RESTORED_KEY_LIMIT`]
    pub(super) fn reserve_keys(&mut self, next_key: VertexKey) {
        self.next_key = self.next_key.max(next_key.min(RESTORED_KEY_LIMIT));
    }

    pub(super) fn insert_edge_raw(
        &mut self,
        u: VertexKey,
        v: VertexKey,
        value: E,
        weight: Option<f64>,
    ) -> bool {
        self.insert_edge(u, v, value, weight).is_some()
    }
}

impl<V, E> GraphTopology for Graph<V, E> {
    fn kind(&self) -> GraphKind {
        self.kind
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn contains_vertex(&self, key: VertexKey) -> bool {
        self.vertices.contains_key(&key)
    }

    fn vertex_keys(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.vertices.keys().copied()
    }

    fn links(&self) -> impl Iterator<Item = Link> + '_ {
        self.edges.values().map(Link::from)
    }

    fn neighbors(&self, key: VertexKey) -> impl Iterator<Item = (VertexKey, f64)> + '_ {
        let mut keys: Vec<VertexKey> = self.successor_keys(key).collect();
        if !self.kind.is_directed() {
            keys.extend(self.predecessor_keys(key));
            keys.sort_unstable();
        }
        keys.into_iter().filter_map(move |neighbor| {
            self.edge(key, neighbor)
                .map(|edge| (neighbor, edge.cost()))
        })
    }

    fn incident(&self, key: VertexKey) -> impl Iterator<Item = VertexKey> + '_ {
        let mut keys: Vec<VertexKey> = self
            .successor_keys(key)
            .chain(self.predecessor_keys(key))
            .collect();
        keys.sort_unstable();
        keys.into_iter()
    }

    fn connects(&self, u: VertexKey, v: VertexKey) -> bool {
        self.edges.contains_key(&EdgeKey::new(u, v)) || self.edges.contains_key(&EdgeKey::new(v, u))
    }

    fn edge_key(&self, u: VertexKey, v: VertexKey) -> Option<EdgeKey> {
        self.stored_key(u, v)
    }
}
