//! Engine configuration
//!
//! Loaded from TOML with every field optional:
//!
//! ```toml
//! [layout]
//! gravity = 0.001
//! strong_gravity = false
//! seed = 42
//!
//! [layout.viewport]
//! min_x = 0.0
//! max_x = 1024.0
//!
//! [vote_rank]
//! top_k = 10
//! fallback_to_first_vertex = true
//!
//! [community]
//! depth = 0
//! resolution = 1.0
//! ```
//!
//! Environment variables override the file: `GRAPHKIT_LAYOUT_SEED`,
//! `GRAPHKIT_VOTERANK_TOP_K` and `GRAPHKIT_COMMUNITY_DEPTH`.

use crate::algorithms::{Louvain, VoteRankConfig};
use crate::layout::LayoutConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Environment variable overriding [`LayoutConfig::seed`]
pub const ENV_LAYOUT_SEED: &str = "GRAPHKIT_LAYOUT_SEED";
/// Environment variable overriding [`VoteRankConfig::top_k`]
pub const ENV_VOTERANK_TOP_K: &str = "GRAPHKIT_VOTERANK_TOP_K";
/// Environment variable overriding [`CommunityConfig::depth`]
pub const ENV_COMMUNITY_DEPTH: &str = "GRAPHKIT_COMMUNITY_DEPTH";

/// Community detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// Dendrogram depth, `0` for the coarsest partition
    pub depth: usize,
    /// Louvain resolution
    pub resolution: f64,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            depth: 0,
            resolution: 1.0,
        }
    }
}

impl CommunityConfig {
    /// Louvain strategy with this resolution
    pub fn strategy(&self) -> Louvain {
        Louvain::with_resolution(self.resolution)
    }

    /// Reject a non-positive or non-finite resolution
    pub fn validate(&self) -> Result<()> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(Error::invalid_config(format!(
                "community.resolution must be a finite positive number, got {}",
                self.resolution
            )));
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Layout simulator physics
    pub layout: LayoutConfig,
    /// VoteRank limits
    pub vote_rank: VoteRankConfig,
    /// Community detection
    pub community: CommunityConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).inspect_err(|e| {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded engine configuration from {:?}", path);
        Ok(config)
    }

    /// File (if present) then environment, validated.
    ///
    /// A missing file falls back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found: {:?}", path);
            Self::default()
        };
        let config = config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `GRAPHKIT_*` environment overrides
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`.
    ///
    /// Unparsable values are logged and leave the field unchanged.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(seed) = parse_override::<u64>(&lookup, ENV_LAYOUT_SEED) {
            self.layout.seed = Some(seed);
        }
        if let Some(top_k) = parse_override::<usize>(&lookup, ENV_VOTERANK_TOP_K) {
            self.vote_rank.top_k = Some(top_k);
        }
        if let Some(depth) = parse_override::<usize>(&lookup, ENV_COMMUNITY_DEPTH) {
            self.community.depth = depth;
        }
        self
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.vote_rank.validate()?;
        self.community.validate()?;
        Ok(())
    }

    /// Replace the layout section
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the VoteRank section
    pub fn with_vote_rank(mut self, vote_rank: VoteRankConfig) -> Self {
        self.vote_rank = vote_rank;
        self
    }

    /// Replace the community section
    pub fn with_community(mut self, community: CommunityConfig) -> Self {
        self.community = community;
        self
    }
}

fn parse_override<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={:?}", name, raw);
            None
        }
    }
}
