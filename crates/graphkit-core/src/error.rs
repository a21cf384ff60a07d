//! Error types for Graphkit Core

use crate::graph::{GraphKind, VertexKey};
use thiserror::Error;

/// Result type alias using Graphkit Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at algorithm and configuration boundaries.
///
/// Graph lookups and mutations never produce these: a missing key, a
/// self-loop or a duplicate edge is reported as `None` by the graph
/// itself.
#[derive(Error, Debug)]
pub enum Error {
    /// Dijkstra refuses to run on a graph carrying a negative edge weight
    #[error("Negative edge weight {weight} on edge ({from}, {to})")]
    NegativeWeight {
        /// Edge source key
        from: VertexKey,
        /// Edge target key
        to: VertexKey,
        /// Offending weight
        weight: f64,
    },

    /// Start or target vertex is not live in the graph
    #[error("Vertex not found: {0}")]
    VertexNotFound(VertexKey),

    /// Algorithm requires a different graph kind
    #[error("{algorithm} does not support {kind} graphs")]
    UnsupportedGraph {
        /// Algorithm name
        algorithm: &'static str,
        /// Kind of the graph it was handed
        kind: GraphKind,
    },

    /// Malformed configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O errors while reading configuration files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse errors
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an unsupported graph error
    pub fn unsupported(algorithm: &'static str, kind: GraphKind) -> Self {
        Self::UnsupportedGraph { algorithm, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NegativeWeight {
            from: 1,
            to: 2,
            weight: -3.5,
        };
        assert_eq!(err.to_string(), "Negative edge weight -3.5 on edge (1, 2)");

        let err = Error::unsupported("minimum spanning tree", GraphKind::Directed);
        assert_eq!(
            err.to_string(),
            "minimum spanning tree does not support directed graphs"
        );
    }

    #[test]
    fn test_error_constructors() {
        let err = Error::invalid_config("top_k must be positive");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
