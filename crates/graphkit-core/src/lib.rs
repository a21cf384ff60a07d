//! Graphkit Core - typed graph model and algorithm suite
//!
//! This crate provides:
//! - A graph model covering four kinds (plain, directed, weighted,
//!   directed weighted) with dense, never-reused vertex keys
//! - Shortest paths (Dijkstra, Bellman-Ford with negative-cycle detection)
//! - Structural analysis (bridges, cycles, minimum spanning tree,
//!   strongly connected components)
//! - Community detection (pluggable strategy, Louvain by default) and
//!   VoteRank spreader selection
//! - A stepped force-directed layout simulator with interactive dragging
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │   algorithms                 layout          │
//! │   (paths, structure,         (simulator,     │
//! │    community, ranking)        positions)     │
//! └──────────────┬───────────────────┬───────────┘
//!                │   GraphTopology   │
//! ┌──────────────┴───────────────────┴───────────┐
//! │                   graph                       │
//! │   (Graph<V, E>, kinds, snapshot / rebuild)   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use graphkit_core::algorithms::Dijkstra;
//! use graphkit_core::graph::Graph;
//!
//! let mut graph: Graph<&str, ()> = Graph::directed_weighted();
//! let a = graph.add_vertex("a").key();
//! let b = graph.add_vertex("b").key();
//! let c = graph.add_vertex("c").key();
//! graph.add_weighted_edge(a, b, (), 1.0);
//! graph.add_weighted_edge(b, c, (), 2.0);
//!
//! let path = Dijkstra::new(&graph).shortest_path(a, c).unwrap().unwrap();
//! assert_eq!(path.distance, 3.0);
//! assert_eq!(path.path, vec![a, b, c]);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod config;
pub mod error;
pub mod graph;
pub mod layout;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use graph::{Graph, GraphKind, GraphTopology, VertexKey};
