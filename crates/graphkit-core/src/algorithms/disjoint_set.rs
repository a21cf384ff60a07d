//! Disjoint-set union over vertex keys

use crate::graph::VertexKey;
use std::collections::HashMap;

/// Union-find with union by rank and path compression
#[derive(Debug, Clone, Default)]
pub struct DisjointSet {
    parent: HashMap<VertexKey, VertexKey>,
    rank: HashMap<VertexKey, u32>,
}

impl DisjointSet {
    /// One singleton set per key
    pub fn new(keys: impl IntoIterator<Item = VertexKey>) -> Self {
        let mut set = Self::default();
        for key in keys {
            set.make_set(key);
        }
        set
    }

    /// Add `key` as a singleton unless it is already tracked
    pub fn make_set(&mut self, key: VertexKey) {
        self.parent.entry(key).or_insert(key);
        self.rank.entry(key).or_insert(0);
    }

    /// Representative of the set holding `key`, `None` if untracked
    pub fn find(&mut self, key: VertexKey) -> Option<VertexKey> {
        let mut root = *self.parent.get(&key)?;
        while self.parent[&root] != root {
            root = self.parent[&root];
        }

        let mut current = key;
        while current != root {
            let next = self.parent[&current];
            self.parent.insert(current, root);
            current = next;
        }

        Some(root)
    }

    /// Merge the sets of `x` and `y`.
    ///
    /// Returns `false` if they were already joined or either is untracked.
    pub fn union(&mut self, x: VertexKey, y: VertexKey) -> bool {
        let (Some(px), Some(py)) = (self.find(x), self.find(y)) else {
            return false;
        };
        if px == py {
            return false;
        }

        let (rank_x, rank_y) = (self.rank[&px], self.rank[&py]);
        if rank_x < rank_y {
            self.parent.insert(px, py);
        } else if rank_x > rank_y {
            self.parent.insert(py, px);
        } else {
            self.parent.insert(py, px);
            self.rank.insert(px, rank_x + 1);
        }
        true
    }

    /// Whether `x` and `y` share a set
    pub fn connected(&mut self, x: VertexKey, y: VertexKey) -> bool {
        match (self.find(x), self.find(y)) {
            (Some(px), Some(py)) => px == py,
            _ => false,
        }
    }
}
