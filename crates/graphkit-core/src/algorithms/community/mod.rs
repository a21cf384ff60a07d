//! Community detection by modularity optimization.
//!
//! Every edge is projected to a [`Link`] (unweighted kinds weigh `1.0`)
//! and handed to a [`CommunityStrategy`]. The strategy returns a
//! [`Partition`] mapping each link endpoint to a community id; this module
//! only owns the projection, the partition/group inversion and the
//! modularity score.
//!
//! ## Modularity
//!
//! ```text
//! Q = sum over communities c of [ in_c / m - (tot_c / 2m)^2 ]
//! ```
//!
//! where `m` is the total link weight, `in_c` the weight of links inside
//! `c` and `tot_c` the summed weighted degree of its members. Links are
//! read as undirected, so `u -> v` and `v -> u` add up.
//!
//! ## Strategies
//!
//! [`Louvain`] is the default. Anything deterministic for a fixed input
//! and depth can stand in for it, which is how tests pin partitions.

mod louvain;

pub use louvain::Louvain;

use crate::graph::{GraphTopology, Link, VertexKey};
use std::collections::BTreeMap;
use tracing::debug;

/// Community id per vertex
pub type Partition = BTreeMap<VertexKey, usize>;

/// Members per community id, each list ascending
pub type Communities = BTreeMap<usize, Vec<VertexKey>>;

/// Pluggable partitioning heuristic.
///
/// Implementations must be deterministic for a fixed `links` slice and
/// `depth`. Only vertices that appear in some link are partitioned.
pub trait CommunityStrategy {
    /// Partition the link endpoints at aggregation `depth`
    fn partition(&self, links: &[Link], depth: usize) -> Partition;
}

impl<S: CommunityStrategy + ?Sized> CommunityStrategy for &S {
    fn partition(&self, links: &[Link], depth: usize) -> Partition {
        (**self).partition(links, depth)
    }
}

/// Community detection over a borrowed graph
#[derive(Debug, Clone)]
pub struct CommunityDetection<'a, G, S = Louvain> {
    graph: &'a G,
    strategy: S,
}

impl<'a, G: GraphTopology> CommunityDetection<'a, G, Louvain> {
    /// Detection with the default Louvain strategy
    pub fn new(graph: &'a G) -> Self {
        Self::with_strategy(graph, Louvain::default())
    }
}

impl<'a, G: GraphTopology, S: CommunityStrategy> CommunityDetection<'a, G, S> {
    /// Detection with a custom strategy
    pub fn with_strategy(graph: &'a G, strategy: S) -> Self {
        Self { graph, strategy }
    }

    /// Every edge as a link in stored orientation
    pub fn links(&self) -> Vec<Link> {
        self.graph.links().collect()
    }

    /// Partition at `depth`
    pub fn partition(&self, depth: usize) -> Partition {
        let links = self.links();
        let partition = self.strategy.partition(&links, depth);
        debug!(
            links = links.len(),
            depth,
            vertices = partition.len(),
            "community partition computed"
        );
        partition
    }

    /// Community groups at `depth`
    pub fn communities(&self, depth: usize) -> Communities {
        partition_to_communities(&self.partition(depth))
    }

    /// Modularity of `partition` against this graph's links
    pub fn modularity(&self, partition: &Partition) -> f64 {
        modularity(&self.links(), partition)
    }
}

/// Invert a partition into member lists
pub fn partition_to_communities(partition: &Partition) -> Communities {
    let mut communities = Communities::new();
    for (&key, &community) in partition {
        communities.entry(community).or_default().push(key);
    }
    communities
}

/// Modularity of `partition` over `links`.
///
/// Endpoints missing from the partition count as singleton communities.
/// Returns `0.0` when the total link weight is not positive.
pub fn modularity(links: &[Link], partition: &Partition) -> f64 {
    let total: f64 = links.iter().map(|link| link.weight).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut internal: BTreeMap<usize, f64> = BTreeMap::new();
    let mut degree: BTreeMap<usize, f64> = BTreeMap::new();
    let mut singletons: BTreeMap<VertexKey, f64> = BTreeMap::new();

    for link in links {
        let source = partition.get(&link.source);
        let target = partition.get(&link.target);

        for (key, community) in [(link.source, source), (link.target, target)] {
            match community {
                Some(&c) => *degree.entry(c).or_default() += link.weight,
                None => *singletons.entry(key).or_default() += link.weight,
            }
        }

        if let (Some(a), Some(b)) = (source, target) {
            if a == b {
                *internal.entry(*a).or_default() += link.weight;
            }
        }
    }

    let expected = |tot: f64| (tot / (2.0 * total)).powi(2);
    let grouped: f64 = degree
        .iter()
        .map(|(community, &tot)| internal.get(community).copied().unwrap_or(0.0) / total - expected(tot))
        .sum();
    let isolated: f64 = singletons.values().map(|&tot| expected(tot)).sum();

    grouped - isolated
}
