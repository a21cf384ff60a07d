//! Graph algorithms
//!
//! Every entry point borrows a [`GraphTopology`] and returns a plain
//! value; nothing keeps a reference into the graph after it returns.
//!
//! - Shortest paths: [`Dijkstra`], [`BellmanFord`]
//! - Structure: [`bridges`], [`find_cycles`], [`minimum_spanning_tree`],
//!   [`strongly_connected_components`], [`connected_components`]
//! - Ranking and partitioning: [`CommunityDetection`], [`vote_rank`]
//!
//! Traversals use explicit stacks, so deep graphs do not overflow the
//! call stack.
//!
//! [`GraphTopology`]: crate::graph::GraphTopology

pub mod bridges;
pub mod community;
pub mod components;
pub mod cycles;
pub mod disjoint_set;
pub mod shortest_path;
pub mod spanning_tree;
pub mod strongly_connected;
pub mod vote_rank;

pub use bridges::bridges;
pub use community::{
    CommunityDetection, CommunityStrategy, Communities, Louvain, Partition, modularity,
    partition_to_communities,
};
pub use components::{component_count, connected_components};
pub use cycles::{canonical_cycle, find_cycles};
pub use disjoint_set::DisjointSet;
pub use shortest_path::{
    BellmanFord, BellmanFordResult, Dijkstra, ShortestPath, ShortestPaths, reconstruct_path,
};
pub use spanning_tree::{MstResult, minimum_spanning_tree};
pub use strongly_connected::{SccResult, strongly_connected_components};
pub use vote_rank::{VoteRankConfig, vote_rank};
