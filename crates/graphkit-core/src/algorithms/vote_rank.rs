//! VoteRank spreader selection

use crate::graph::{GraphTopology, VertexKey};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// VoteRank configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteRankConfig {
    /// Maximum number of selections, `None` for no limit
    pub top_k: Option<usize>,
    /// Return the smallest vertex key when voting selects nothing on a
    /// non-empty graph (edgeless graphs)
    pub fallback_to_first_vertex: bool,
}

impl Default for VoteRankConfig {
    fn default() -> Self {
        Self {
            top_k: None,
            fallback_to_first_vertex: true,
        }
    }
}

impl VoteRankConfig {
    /// Limit selections to `top_k`
    pub fn with_top_k(top_k: usize) -> Self {
        Self {
            top_k: Some(top_k),
            ..Self::default()
        }
    }

    /// Reject `top_k = 0`
    pub fn validate(&self) -> Result<()> {
        if self.top_k == Some(0) {
            return Err(Error::invalid_config("vote_rank.top_k must be at least 1"));
        }
        Ok(())
    }
}

/// Rank vertices by iterative voting.
///
/// Scores start at each vertex's degree (edges touching it, either
/// direction). The highest positive score is selected and zeroed, and
/// every vertex sharing an edge with it loses `1 / max(1, degree)`,
/// floored at zero. Equal scores resolve to the smallest key.
pub fn vote_rank<G: GraphTopology>(graph: &G, config: &VoteRankConfig) -> Result<Vec<VertexKey>> {
    config.validate()?;
    let limit = config.top_k.unwrap_or(usize::MAX);

    let mut scores: BTreeMap<VertexKey, f64> = graph
        .vertex_keys()
        .map(|key| (key, graph.degree(key) as f64))
        .collect();
    let mut selected = Vec::new();

    while selected.len() < limit {
        let Some(candidate) = best_candidate(&scores) else {
            break;
        };
        selected.push(candidate);
        scores.insert(candidate, 0.0);

        let penalty = 1.0 / (graph.degree(candidate) as f64).max(1.0);
        for neighbor in graph.incident(candidate) {
            if let Some(score) = scores.get_mut(&neighbor) {
                *score = (*score - penalty).max(0.0);
            }
        }
    }

    if selected.is_empty() && config.fallback_to_first_vertex {
        if let Some(first) = graph.vertex_keys().next() {
            selected.push(first);
        }
    }

    debug!(
        vertices = graph.vertex_count(),
        selected = selected.len(),
        "vote rank finished"
    );
    Ok(selected)
}

/// Highest positive score, smallest key on ties
fn best_candidate(scores: &BTreeMap<VertexKey, f64>) -> Option<VertexKey> {
    let mut best: Option<(VertexKey, f64)> = None;
    for (&key, &score) in scores {
        if score <= 0.0 {
            continue;
        }
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((key, score));
        }
    }
    best.map(|(key, _)| key)
}
