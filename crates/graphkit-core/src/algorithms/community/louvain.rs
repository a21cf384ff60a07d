//! Louvain modularity optimization
//!
//! Blondel et al. (2008), "Fast unfolding of communities in large
//! networks". Each level greedily moves single nodes to the neighboring
//! community with the best modularity gain until no move helps, then
//! collapses communities into nodes and repeats. The levels form a
//! dendrogram from finest (level 0) to coarsest.
//!
//! Nodes are visited in ascending key order and ties keep the smallest
//! community id, so the result is deterministic.

use super::{CommunityStrategy, Partition};
use crate::graph::{Link, VertexKey};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Modularity gain below which a level counts as converged
const MIN_GAIN: f64 = 1e-7;

/// Louvain strategy.
///
/// `depth` counts back from the coarsest level: `0` is the final
/// partition, `1` the level before it, and so on, stopping at the finest
/// level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Louvain {
    resolution: f64,
}

impl Default for Louvain {
    fn default() -> Self {
        Self { resolution: 1.0 }
    }
}

impl Louvain {
    /// Louvain with the standard modularity (`resolution = 1.0`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Louvain with a custom resolution; larger values favor smaller communities
    pub fn with_resolution(resolution: f64) -> Self {
        Self { resolution }
    }

    /// Resolution parameter
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Every aggregation level, finest first.
    ///
    /// Level `i` maps the nodes of level `i - 1` (vertex keys for level
    /// 0, as indices into the sorted endpoint list) to community ids.
    fn dendrogram(&self, graph: &WorkGraph) -> Vec<Vec<usize>> {
        if graph.total_weight <= 0.0 {
            return vec![(0..graph.size()).collect()];
        }

        let mut levels = Vec::new();
        let mut current = graph.clone();
        let mut status = Status::new(&current);
        self.one_level(&current, &mut status);
        let mut best = status.modularity(self.resolution);

        loop {
            let partition = status.renumbered();
            trace!(
                level = levels.len(),
                nodes = current.size(),
                modularity = best,
                "louvain level"
            );
            current = current.induced(&partition);
            levels.push(partition);

            status = Status::new(&current);
            self.one_level(&current, &mut status);
            let next = status.modularity(self.resolution);
            if next - best < MIN_GAIN {
                break;
            }
            best = next;
        }

        levels
    }

    /// Move nodes between communities until modularity stops improving
    fn one_level(&self, graph: &WorkGraph, status: &mut Status) {
        let mut current = status.modularity(self.resolution);
        let two_m = 2.0 * status.total_weight;

        loop {
            let mut modified = false;

            for node in 0..graph.size() {
                let home = status.node2com[node];
                let share = status.gdegrees[node] / two_m;
                let weights = status.neighbor_communities(graph, node);
                let home_weight = weights.get(&home).copied().unwrap_or(0.0);

                let remove_cost = -home_weight
                    + self.resolution * (status.degrees[home] - status.gdegrees[node]) * share;
                status.remove(node, home, home_weight);

                let mut best_community = home;
                let mut best_increase = 0.0;
                for (&community, &weight) in &weights {
                    let increase =
                        remove_cost + weight - self.resolution * status.degrees[community] * share;
                    if increase > best_increase {
                        best_increase = increase;
                        best_community = community;
                    }
                }

                let best_weight = weights.get(&best_community).copied().unwrap_or(0.0);
                status.insert(node, best_community, best_weight);
                if best_community != home {
                    modified = true;
                }
            }

            let next = status.modularity(self.resolution);
            if !modified || next - current < MIN_GAIN {
                break;
            }
            current = next;
        }
    }
}

impl CommunityStrategy for Louvain {
    fn partition(&self, links: &[Link], depth: usize) -> Partition {
        let keys: Vec<VertexKey> = links
            .iter()
            .flat_map(|link| [link.source, link.target])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if keys.is_empty() {
            return Partition::new();
        }

        let index: BTreeMap<VertexKey, usize> =
            keys.iter().enumerate().map(|(i, &key)| (key, i)).collect();
        let mut graph = WorkGraph::new(keys.len());
        for link in links {
            graph.add_edge(index[&link.source], index[&link.target], link.weight);
        }

        let levels = self.dendrogram(&graph);
        let level = levels.len().saturating_sub(1).saturating_sub(depth);

        let mut assignment: Vec<usize> = levels[0].clone();
        for partition in &levels[1..=level] {
            for community in assignment.iter_mut() {
                *community = partition[*community];
            }
        }

        keys.into_iter().zip(assignment).collect()
    }
}

/// Index-based weighted graph with self-loops, rebuilt at every level
#[derive(Debug, Clone)]
struct WorkGraph {
    adjacency: Vec<BTreeMap<usize, f64>>,
    total_weight: f64,
}

impl WorkGraph {
    fn new(size: usize) -> Self {
        Self {
            adjacency: vec![BTreeMap::new(); size],
            total_weight: 0.0,
        }
    }

    fn size(&self) -> usize {
        self.adjacency.len()
    }

    fn add_edge(&mut self, u: usize, v: usize, weight: f64) {
        *self.adjacency[u].entry(v).or_default() += weight;
        if u != v {
            *self.adjacency[v].entry(u).or_default() += weight;
        }
        self.total_weight += weight;
    }

    /// Weighted degree, self-loops counted twice
    fn degree(&self, node: usize) -> f64 {
        self.adjacency[node]
            .iter()
            .map(|(&other, &weight)| if other == node { 2.0 * weight } else { weight })
            .sum()
    }

    fn self_loop(&self, node: usize) -> f64 {
        self.adjacency[node].get(&node).copied().unwrap_or(0.0)
    }

    /// Collapse each community of `partition` into a single node
    fn induced(&self, partition: &[usize]) -> Self {
        let size = partition.iter().max().map_or(0, |&max| max + 1);
        let mut induced = Self::new(size);
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            for (&v, &weight) in neighbors.range(u..) {
                induced.add_edge(partition[u], partition[v], weight);
            }
        }
        induced
    }
}

/// Per-level bookkeeping: community of each node and community totals
#[derive(Debug, Clone)]
struct Status {
    node2com: Vec<usize>,
    total_weight: f64,
    /// Summed degree of each community's members
    degrees: Vec<f64>,
    /// Degree of each node
    gdegrees: Vec<f64>,
    /// Weight inside each community
    internals: Vec<f64>,
    loops: Vec<f64>,
}

impl Status {
    fn new(graph: &WorkGraph) -> Self {
        let size = graph.size();
        let gdegrees: Vec<f64> = (0..size).map(|node| graph.degree(node)).collect();
        let loops: Vec<f64> = (0..size).map(|node| graph.self_loop(node)).collect();
        Self {
            node2com: (0..size).collect(),
            total_weight: graph.total_weight,
            degrees: gdegrees.clone(),
            gdegrees,
            internals: loops.clone(),
            loops,
        }
    }

    fn neighbor_communities(&self, graph: &WorkGraph, node: usize) -> BTreeMap<usize, f64> {
        let mut weights = BTreeMap::new();
        for (&neighbor, &weight) in &graph.adjacency[node] {
            if neighbor != node {
                *weights.entry(self.node2com[neighbor]).or_default() += weight;
            }
        }
        weights
    }

    fn remove(&mut self, node: usize, community: usize, weight: f64) {
        self.degrees[community] -= self.gdegrees[node];
        self.internals[community] -= weight + self.loops[node];
    }

    fn insert(&mut self, node: usize, community: usize, weight: f64) {
        self.node2com[node] = community;
        self.degrees[community] += self.gdegrees[node];
        self.internals[community] += weight + self.loops[node];
    }

    fn modularity(&self, resolution: f64) -> f64 {
        let m = self.total_weight;
        self.degrees
            .iter()
            .zip(&self.internals)
            .filter(|(degree, _)| **degree > 0.0)
            .map(|(degree, internal)| internal / m - resolution * (degree / (2.0 * m)).powi(2))
            .sum()
    }

    /// Community ids renumbered densely in order of first appearance
    fn renumbered(&self) -> Vec<usize> {
        let mut ids: BTreeMap<usize, usize> = BTreeMap::new();
        self.node2com
            .iter()
            .map(|community| {
                let next = ids.len();
                *ids.entry(*community).or_insert(next)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::community::{modularity, partition_to_communities};

    fn links(edges: &[(u64, u64)]) -> Vec<Link> {
        edges.iter().map(|&(u, v)| Link::new(u, v, 1.0)).collect()
    }

    fn clique(keys: std::ops::Range<u64>) -> Vec<(u64, u64)> {
        let keys: Vec<u64> = keys.collect();
        let mut edges = Vec::new();
        for (i, &u) in keys.iter().enumerate() {
            for &v in &keys[i + 1..] {
                edges.push((u, v));
            }
        }
        edges
    }

    #[test]
    fn test_complete_graph_is_one_community() {
        let partition = Louvain::new().partition(&links(&clique(0..5)), 0);
        assert_eq!(partition.len(), 5);
        assert!(partition.values().all(|&c| c == partition[&0]));
    }

    #[test]
    fn test_bridged_cliques_split() {
        let mut edges = clique(0..5);
        edges.extend(clique(5..10));
        edges.push((4, 5));
        let links = links(&edges);

        let partition = Louvain::new().partition(&links, 0);
        let communities = partition_to_communities(&partition);
        assert_eq!(communities.len(), 2);
        assert!(communities.values().any(|g| g == &vec![0, 1, 2, 3, 4]));
        assert!(modularity(&links, &partition) > 0.4);
    }

    #[test]
    fn test_depth_walks_back_toward_finest_level() {
        let mut edges = Vec::new();
        for block in 0..8u64 {
            let base = block * 3;
            edges.extend([(base, base + 1), (base + 1, base + 2), (base + 2, base)]);
            edges.push((base + 2, (base + 3) % 24));
        }
        let links = links(&edges);
        let louvain = Louvain::new();

        let count = |depth| partition_to_communities(&louvain.partition(&links, depth)).len();
        let coarse = count(0);
        let fine = count(1);
        let finest = count(99);
        assert!(coarse >= 1);
        assert!(coarse <= fine && fine <= finest);
        assert_eq!(louvain.partition(&links, 99), louvain.partition(&links, 1000));
    }

    #[test]
    fn test_antiparallel_links_add_up() {
        let graph = {
            let mut graph = WorkGraph::new(2);
            graph.add_edge(0, 1, 1.0);
            graph.add_edge(1, 0, 2.0);
            graph
        };
        assert_eq!(graph.degree(0), 3.0);
        assert_eq!(graph.total_weight, 3.0);
    }

    #[test]
    fn test_induced_graph_keeps_weight() {
        let mut graph = WorkGraph::new(4);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(2, 3, 2.0);
        graph.add_edge(1, 2, 0.5);

        let induced = graph.induced(&[0, 0, 1, 1]);
        assert_eq!(induced.size(), 2);
        assert_eq!(induced.self_loop(0), 1.0);
        assert_eq!(induced.self_loop(1), 2.0);
        assert_eq!(induced.adjacency[0][&1], 0.5);
        assert_eq!(induced.total_weight, graph.total_weight);
    }

    #[test]
    fn test_zero_weight_links_stay_singletons() {
        let links = vec![Link::new(3, 8, 0.0)];
        let partition = Louvain::new().partition(&links, 0);
        assert_eq!(partition, Partition::from([(3, 0), (8, 1)]));
    }

    #[test]
    fn test_empty_links() {
        assert!(Louvain::new().partition(&[], 0).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let mut edges = clique(0..4);
        edges.extend(clique(4..8));
        edges.push((0, 7));
        let links = links(&edges);
        let louvain = Louvain::with_resolution(1.0);
        assert_eq!(louvain.partition(&links, 0), louvain.partition(&links, 0));
        assert_eq!(louvain.resolution(), 1.0);
    }
}
