//! Spatial reordering of an unordered point set along a Hilbert curve.
//!
//! A closed curve fitted through points in generation order crosses itself
//! constantly. Visiting the points in Hilbert order keeps spatial
//! neighbours adjacent in the traversal and avoids long jumps.
//!
//! The sorter only stores the resulting [`Permutation`], which can be
//! replayed against any other point set of the same size. Replaying one
//! permutation across all lines (or all animation frames) trades local
//! optimality for coherence: no flicker between frames.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FluidityError;
use crate::hilbert::{hilbert_index, MAX_ORDER};
use crate::point::{Bounds, Point};

/// Default grid exponent: 64 cells per axis.
pub const DEFAULT_RESOLUTION: u32 = 6;

/// A bijection on `[0, n)`: position `k` of the output takes input `indices[k]`.
///
/// Serialized as a bare index list; deserializing checks the bijection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation {
    indices: Vec<usize>,
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = FluidityError;

    fn try_from(indices: Vec<usize>) -> Result<Self, Self::Error> {
        Self::from_indices(indices)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(order: Permutation) -> Self {
        order.indices
    }
}

impl Permutation {
    /// The permutation that leaves `n` points in place.
    pub fn identity(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }

    /// Wraps an index list, checking that it is a bijection on `[0, len)`.
    pub fn from_indices(indices: Vec<usize>) -> Result<Self, FluidityError> {
        let mut seen = vec![false; indices.len()];
        for &i in &indices {
            match seen.get_mut(i) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(FluidityError::InvalidConfiguration(format!(
                        "index {i} repeated or out of range in permutation of {}",
                        indices.len()
                    )))
                }
            }
        }
        Ok(Self { indices })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The permutation that undoes this one.
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.indices.len()];
        for (k, &i) in self.indices.iter().enumerate() {
            inv[i] = k;
        }
        Self { indices: inv }
    }

    /// Reorders `points`. Pure reindexing; nothing is recomputed.
    ///
    /// Returns `FluidityError::PermutationSizeMismatch` if `points` is not
    /// the size this permutation was computed for.
    pub fn apply(&self, points: &[Point]) -> Result<Vec<Point>, FluidityError> {
        if points.len() != self.indices.len() {
            return Err(FluidityError::PermutationSizeMismatch {
                expected: self.indices.len(),
                got: points.len(),
            });
        }
        Ok(self.indices.iter().map(|&i| points[i]).collect())
    }
}

/// Computes Hilbert-order permutations at a fixed grid resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HilbertSorter {
    resolution: u32,
}

impl Default for HilbertSorter {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl HilbertSorter {
    /// A sorter on a `2^resolution` grid.
    ///
    /// Returns `FluidityError::InvalidConfiguration` unless
    /// `1 <= resolution <= 16`.
    pub fn new(resolution: u32) -> Result<Self, FluidityError> {
        if resolution == 0 || resolution > MAX_ORDER {
            return Err(FluidityError::InvalidConfiguration(format!(
                "hilbert resolution must be in 1..={MAX_ORDER}, got {resolution}"
            )));
        }
        Ok(Self { resolution })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Orders `points` by ascending Hilbert index of their grid cell.
    ///
    /// Points are min-max scaled onto the grid and truncated to integer
    /// cells. Points sharing a cell keep their input order.
    ///
    /// Returns `FluidityError::DegenerateInput` if the bounding box has no
    /// (or a non-finite) extent on either axis, including for empty input.
    pub fn choose_order(&self, points: &[Point]) -> Result<Permutation, FluidityError> {
        let bounds =
            Bounds::from_points(points).ok_or(FluidityError::DegenerateInput { axis: "x" })?;
        let extent = bounds.size();
        if !(extent.x.is_finite() && extent.x > 0.0) {
            return Err(FluidityError::DegenerateInput { axis: "x" });
        }
        if !(extent.y.is_finite() && extent.y > 0.0) {
            return Err(FluidityError::DegenerateInput { axis: "y" });
        }

        let max_coord = ((1u64 << self.resolution) - 1) as f64;
        let keys: Vec<u32> = points
            .iter()
            .map(|p| {
                let cell = (*p - bounds.min) / extent * max_coord;
                hilbert_index(self.resolution, cell.x as u32, cell.y as u32)
            })
            .collect();

        let mut indices: Vec<usize> = (0..points.len()).collect();
        indices.sort_by_key(|&i| keys[i]);
        debug!(
            len = indices.len(),
            resolution = self.resolution,
            "computed hilbert order"
        );
        Ok(Permutation { indices })
    }

    /// Convenience: compute the order of `points` and apply it to them.
    pub fn sort(&self, points: &[Point]) -> Result<Vec<Point>, FluidityError> {
        self.choose_order(points)?.apply(points)
    }
}

/// How a Composition reorders its lines before fitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Keep generation order.
    None,
    /// Compute a fresh order for every line.
    #[default]
    PerLine,
    /// Apply one order to every line: the order held by an [`OrderHandle`]
    /// if one is supplied and filled, otherwise one computed from the first
    /// line of this Composition. The handle is never written.
    Shared,
    /// Like `Shared`, but an empty [`OrderHandle`] is filled from the first
    /// line encountered and reused by every later Composition holding it.
    FirstLineOnly,
}

/// All recognized sort policy names.
const POLICY_NAMES: &[&str] = &["none", "per_line", "shared", "first_line_only"];

impl SortPolicy {
    pub fn from_name(name: &str) -> Result<Self, FluidityError> {
        match name {
            "none" => Ok(SortPolicy::None),
            "per_line" => Ok(SortPolicy::PerLine),
            "shared" => Ok(SortPolicy::Shared),
            "first_line_only" => Ok(SortPolicy::FirstLineOnly),
            _ => Err(FluidityError::UnknownVariant {
                kind: "sort policy",
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SortPolicy::None => "none",
            SortPolicy::PerLine => "per_line",
            SortPolicy::Shared => "shared",
            SortPolicy::FirstLineOnly => "first_line_only",
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        POLICY_NAMES
    }
}

/// An externally owned permutation slot shared between Compositions.
///
/// Written at most once, read-only afterwards. The owner creates it, passes
/// it by reference to each Composition in a sequence, and must keep it alive
/// for as long as that sequence is being generated.
#[derive(Debug, Default)]
pub struct OrderHandle {
    order: OnceLock<Arc<Permutation>>,
}

impl OrderHandle {
    /// An empty handle, filled by the first `FirstLineOnly` Composition.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle holding a known order.
    pub fn fixed(order: Permutation) -> Self {
        Self {
            order: OnceLock::from(Arc::new(order)),
        }
    }

    pub fn get(&self) -> Option<&Permutation> {
        self.order.get().map(Arc::as_ref)
    }

    /// The stored order itself, shared rather than copied.
    pub fn shared(&self) -> Option<Arc<Permutation>> {
        self.order.get().cloned()
    }

    /// Returns the stored order, computing and storing it with `init` if
    /// the handle is still empty. A failed `init` leaves the handle empty.
    pub fn get_or_try_init(
        &self,
        init: impl FnOnce() -> Result<Permutation, FluidityError>,
    ) -> Result<Arc<Permutation>, FluidityError> {
        if let Some(order) = self.order.get() {
            return Ok(Arc::clone(order));
        }
        let order = Arc::new(init()?);
        Ok(Arc::clone(self.order.get_or_init(|| order)))
    }
}
