//! Seeded noise fields mapping an index pair `(i, j)` to a point.
//!
//! Both coordinates come from the same 2D SuperSimplex sampler: `x` at the
//! sampling location and `y` one unit further along the sampling x-axis.
//! A step in `i` moves every point only slightly, so the lines built for
//! successive `i` are near copies of each other; a step in `j` jumps far
//! enough in sampling space that the points of one line are uncorrelated.
//!
//! [`NoiseConfig`] is the serializable description; [`NoiseField`] owns the
//! seeded sampler built from it. Same config, same indices, same bits.

use std::f64::consts::TAU;

use noise::{NoiseFn, SuperSimplex};
use serde::{Deserialize, Serialize};

use crate::error::FluidityError;
use crate::point::Point;

/// Offset between the two samples making up one point.
const Y_SAMPLE_SHIFT: f64 = 1.0;

const DEFAULT_SEED: u32 = 1;
const DEFAULT_LINEAR_ISTART: f64 = 0.001;
const DEFAULT_ISTEP: f64 = 0.002;
const DEFAULT_JSTART: f64 = 1.0;
const DEFAULT_JSTEP: f64 = 17.0;
const DEFAULT_CIRCULAR_ISTART: f64 = 0.0;
const DEFAULT_ISTEPS: usize = 100;

/// Parameters of a noise field whose `i` axis advances in a straight line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearNoise {
    pub seed: u32,
    /// Sampling x at `i = 0`. A change of 1 step barely moves a point.
    pub istart: f64,
    pub istep: f64,
    /// Sampling y at `j = 0`. A change of 1 step is an uncorrelated jump.
    pub jstart: f64,
    pub jstep: f64,
}

impl Default for LinearNoise {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            istart: DEFAULT_LINEAR_ISTART,
            istep: DEFAULT_ISTEP,
            jstart: DEFAULT_JSTART,
            jstep: DEFAULT_JSTEP,
        }
    }
}

/// Parameters of a noise field whose `i` axis walks a circle in sampling
/// space, returning to its start every `isteps` steps.
///
/// Advancing `istart` by one per frame yields a seamlessly looping
/// animation of `isteps` frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularNoise {
    pub seed: u32,
    /// Phase offset, in steps.
    pub istart: f64,
    /// Arc length of one step in sampling space.
    pub istep: f64,
    /// Steps per full revolution. Must be positive.
    pub isteps: usize,
    pub jstart: f64,
    pub jstep: f64,
}

impl Default for CircularNoise {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            istart: DEFAULT_CIRCULAR_ISTART,
            istep: DEFAULT_ISTEP,
            isteps: DEFAULT_ISTEPS,
            jstart: DEFAULT_JSTART,
            jstep: DEFAULT_JSTEP,
        }
    }
}

/// Serializable choice of noise field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseConfig {
    Linear(LinearNoise),
    Circular(CircularNoise),
}

/// All recognized noise kind names.
const NOISE_NAMES: &[&str] = &["linear", "circular"];

impl Default for NoiseConfig {
    fn default() -> Self {
        NoiseConfig::Linear(LinearNoise::default())
    }
}

impl NoiseConfig {
    /// Default parameters for the named kind.
    pub fn from_name(name: &str) -> Result<Self, FluidityError> {
        match name {
            "linear" => Ok(NoiseConfig::Linear(LinearNoise::default())),
            "circular" => Ok(NoiseConfig::Circular(CircularNoise::default())),
            _ => Err(FluidityError::UnknownVariant {
                kind: "noise kind",
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NoiseConfig::Linear(_) => "linear",
            NoiseConfig::Circular(_) => "circular",
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        NOISE_NAMES
    }

    pub fn seed(&self) -> u32 {
        match self {
            NoiseConfig::Linear(n) => n.seed,
            NoiseConfig::Circular(n) => n.seed,
        }
    }

    /// Rejects parameters that make the field undefined.
    pub fn validate(&self) -> Result<(), FluidityError> {
        match self {
            NoiseConfig::Linear(_) => Ok(()),
            NoiseConfig::Circular(n) if n.isteps == 0 => Err(FluidityError::InvalidConfiguration(
                "circular noise isteps must be positive".into(),
            )),
            NoiseConfig::Circular(_) => Ok(()),
        }
    }
}

/// A seeded, deterministic map from `(i, j)` to a [`Point`].
pub struct NoiseField {
    sampler: SuperSimplex,
    config: NoiseConfig,
}

impl NoiseField {
    /// Builds the sampler for `config`.
    ///
    /// Returns `FluidityError::InvalidConfiguration` for a circular field
    /// with `isteps == 0`.
    pub fn new(config: NoiseConfig) -> Result<Self, FluidityError> {
        config.validate()?;
        Ok(Self {
            sampler: SuperSimplex::new(config.seed()),
            config,
        })
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// The point at slow index `i` and fast index `j`.
    pub fn point(&self, i: i64, j: i64) -> Point {
        let (sx, sy) = match &self.config {
            NoiseConfig::Linear(n) => (
                i as f64 * n.istep + n.istart,
                j as f64 * n.jstep + n.jstart,
            ),
            NoiseConfig::Circular(n) => {
                let steps = n.isteps as f64;
                let radius = n.istep * steps / TAU;
                let theta = TAU / steps * (n.istart + i as f64).rem_euclid(steps);
                (
                    radius * theta.cos(),
                    j as f64 * n.jstep + n.jstart + radius * theta.sin(),
                )
            }
        };
        Point::new(self.sample(sx, sy), self.sample(sx + Y_SAMPLE_SHIFT, sy))
    }

    /// Samples `point(i, j)` for `j` in `0..npoints`.
    pub fn line(&self, i: i64, npoints: usize) -> Vec<Point> {
        (0..npoints as i64).map(|j| self.point(i, j)).collect()
    }

    fn sample(&self, x: f64, y: f64) -> f64 {
        self.sampler.get([x, y])
    }
}
