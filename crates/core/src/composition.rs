//! The line-field pipeline: noise -> lines -> ordering -> curves -> display lists.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::{ConfigOverrides, FluidityConfig};
use crate::curve::Curve;
use crate::display::DisplayList;
use crate::error::FluidityError;
use crate::field::NoiseField;
use crate::point::{Bounds, Point};
use crate::sort::{HilbertSorter, OrderHandle, Permutation, SortPolicy};

/// One generated field of closed curves.
///
/// Built once from a [`FluidityConfig`] and immutable afterwards. Variants
/// are produced with [`Composition::derive`], never by mutation.
#[derive(Debug, Clone)]
pub struct Composition {
    config: FluidityConfig,
    /// Lines in generation order, before any reordering.
    generated: Vec<Vec<Point>>,
    lines: Vec<Vec<Point>>,
    curves: Vec<Curve>,
    display_lists: Vec<DisplayList>,
    order: Option<Arc<Permutation>>,
}

impl Composition {
    /// Generates every line, orders and fits it.
    ///
    /// `Shared` and `FirstLineOnly` compute their order from line 0 of
    /// this Composition.
    pub fn new(config: FluidityConfig) -> Result<Self, FluidityError> {
        Self::build(config, None)
    }

    /// Like [`Composition::new`], with an externally owned order for the
    /// `Shared` and `FirstLineOnly` policies. `FirstLineOnly` fills an empty
    /// handle; `Shared` only reads it. Other policies ignore the handle.
    pub fn with_order(config: FluidityConfig, handle: &OrderHandle) -> Result<Self, FluidityError> {
        Self::build(config, Some(handle))
    }

    fn build(config: FluidityConfig, handle: Option<&OrderHandle>) -> Result<Self, FluidityError> {
        config.validate()?;
        let field = NoiseField::new(config.noise)?;
        let sorter = HilbertSorter::new(config.resolution)?;
        debug!(
            nlines = config.nlines,
            npoints = config.npoints,
            noise = config.noise.name(),
            sort = config.sort.name(),
            curve = config.curve.name(),
            "building composition"
        );

        let generated: Vec<Vec<Point>> = (0..config.nlines)
            .map(|i| field.line(i as i64, config.npoints))
            .collect();

        let order = shared_order(config.sort, &sorter, &generated[0], handle)?;

        let lines = generated
            .iter()
            .map(|line| match (&order, config.sort) {
                (Some(order), _) => order.apply(line),
                (None, SortPolicy::PerLine) => sorter.sort(line),
                (None, _) => Ok(line.clone()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let curves = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let curve = config.curve.fit(line)?;
                trace!(line = i, segments = curve.len(), "fitted line");
                Ok(curve)
            })
            .collect::<Result<Vec<_>, FluidityError>>()?;

        let display_lists = curves.iter().map(DisplayList::from_curve).collect();

        Ok(Self {
            config,
            generated,
            lines,
            curves,
            display_lists,
            order,
        })
    }

    pub fn config(&self) -> &FluidityConfig {
        &self.config
    }

    /// Lines after reordering, one per curve.
    pub fn lines(&self) -> &[Vec<Point>] {
        &self.lines
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// One `[MoveTo, CurveTo.., ClosePath]` list per curve.
    pub fn display_lists(&self) -> &[DisplayList] {
        &self.display_lists
    }

    /// The single order applied to every line, for `Shared` and
    /// `FirstLineOnly`. `None` for the other policies.
    ///
    /// An order taken from an [`OrderHandle`] is the handle's own
    /// allocation, not a copy.
    pub fn order(&self) -> Option<&Permutation> {
        self.order.as_deref()
    }

    /// For each point index `j`, the path of point `j` across all lines in
    /// generation order. Unaffected by the sort policy.
    pub fn point_tracks(&self) -> Vec<Vec<Point>> {
        (0..self.config.npoints)
            .map(|j| self.generated.iter().map(|line| line[j]).collect())
            .collect()
    }

    /// Closed polylines through the ordered lines, for point overlays.
    pub fn line_display_lists(&self) -> Vec<DisplayList> {
        self.lines
            .iter()
            .map(|line| DisplayList::polyline(line, true))
            .collect()
    }

    /// Union of every curve's control-hull bounds.
    pub fn bounds(&self) -> Option<Bounds> {
        self.curves
            .iter()
            .filter_map(Curve::bounds)
            .reduce(Bounds::union)
    }

    /// A new Composition from this one's config with `overrides` applied.
    pub fn derive(&self, overrides: &ConfigOverrides) -> Result<Self, FluidityError> {
        Self::new(self.config.derive(overrides))
    }

    pub fn derive_with_order(
        &self,
        overrides: &ConfigOverrides,
        handle: &OrderHandle,
    ) -> Result<Self, FluidityError> {
        Self::with_order(self.config.derive(overrides), handle)
    }
}

/// Resolves the one order used for every line, if the policy has one.
fn shared_order(
    policy: SortPolicy,
    sorter: &HilbertSorter,
    reference: &[Point],
    handle: Option<&OrderHandle>,
) -> Result<Option<Arc<Permutation>>, FluidityError> {
    let order = match (policy, handle) {
        (SortPolicy::None | SortPolicy::PerLine, _) => return Ok(None),
        (SortPolicy::FirstLineOnly, Some(handle)) => {
            if handle.get().is_some() {
                debug!("reusing stored line order");
            }
            handle.get_or_try_init(|| sorter.choose_order(reference))?
        }
        (SortPolicy::Shared, Some(handle)) => match handle.shared() {
            Some(order) => {
                debug!(len = order.len(), "reusing stored line order");
                order
            }
            None => Arc::new(sorter.choose_order(reference)?),
        },
        (SortPolicy::Shared | SortPolicy::FirstLineOnly, None) => {
            Arc::new(sorter.choose_order(reference)?)
        }
    };
    Ok(Some(order))
}
