//! Force-directed layout
//!
//! A ForceAtlas-style simulation stepped by an external loop. Pairwise
//! repulsion `repulsion * k^2 / d`, spring attraction along edges
//! `attraction * d^2 / k`, and a pull toward the origin. Per-step
//! displacement is clamped to `max_displacement` and scaled by `speed`.
//!
//! Positions live in the [`LayoutSimulator`], not in the graph. The
//! simulator learns about new vertices lazily on the next `step` and
//! keeps entries for removed vertices until told to drop them.

mod simulator;
mod vec2;

pub use simulator::LayoutSimulator;
pub use vec2::Vec2;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Rectangle new vertices are placed in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Left edge
    pub min_x: f64,
    /// Right edge
    pub max_x: f64,
    /// Top edge
    pub min_y: f64,
    /// Bottom edge
    pub max_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            min_x: 100.0,
            max_x: 800.0,
            min_y: 100.0,
            max_y: 600.0,
        }
    }
}

impl Viewport {
    /// Whether `point` lies inside, edges included
    pub fn contains(&self, point: Vec2) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }
}

/// Layout physics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Pull toward the origin
    pub gravity: f64,
    /// Scale gravity by the distance to the origin
    pub strong_gravity: bool,
    /// Multiplier applied to the clamped displacement
    pub speed: f64,
    /// Largest displacement a vertex takes per step, before `speed`
    pub max_displacement: f64,
    /// Ideal edge length `k`
    pub ideal_distance: f64,
    /// Repulsion multiplier
    pub repulsion_strength: f64,
    /// Attraction multiplier
    pub attraction_strength: f64,
    /// Distances are clamped to at least this much
    pub min_distance: f64,
    /// Blend factor pulling neighbors of a dragged vertex toward it
    pub follow_factor: f64,
    /// Placement rectangle for new vertices
    pub viewport: Viewport,
    /// RNG seed for initial placement; entropy when unset
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gravity: 0.001,
            strong_gravity: false,
            speed: 0.1,
            max_displacement: 5.0,
            ideal_distance: 50.0,
            repulsion_strength: 1.0,
            attraction_strength: 0.1,
            min_distance: 0.1,
            follow_factor: 0.05,
            viewport: Viewport::default(),
            seed: None,
        }
    }
}

impl LayoutConfig {
    /// Reject non-finite or out-of-range constants and an empty viewport
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("gravity", self.gravity),
            ("speed", self.speed),
            ("repulsion_strength", self.repulsion_strength),
            ("attraction_strength", self.attraction_strength),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_config(format!(
                    "layout.{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        let positive = [
            ("max_displacement", self.max_displacement),
            ("ideal_distance", self.ideal_distance),
            ("min_distance", self.min_distance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid_config(format!(
                    "layout.{name} must be a finite positive number, got {value}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.follow_factor) {
            return Err(Error::invalid_config(format!(
                "layout.follow_factor must be within [0, 1], got {}",
                self.follow_factor
            )));
        }

        let Viewport {
            min_x,
            max_x,
            min_y,
            max_y,
        } = self.viewport;
        if [min_x, max_x, min_y, max_y].iter().any(|v| !v.is_finite())
            || min_x > max_x
            || min_y > max_y
        {
            return Err(Error::invalid_config(format!(
                "layout.viewport is empty: x {min_x}..{max_x}, y {min_y}..{max_y}"
            )));
        }

        Ok(())
    }
}
