#![deny(unsafe_code)]
//! Core of the fluidity generative-art pipeline.
//!
//! A seeded [`NoiseField`] produces lines of points, a [`HilbertSorter`]
//! optionally reorders them, a [`CurveKind`] fits each line with a closed
//! cubic curve, and every curve becomes a renderer-agnostic
//! [`DisplayList`]. [`Composition`] runs the whole pipeline from a
//! [`FluidityConfig`].
//!
//! Output is bit-for-bit reproducible for a given config.

pub mod composition;
pub mod config;
pub mod curve;
pub mod display;
pub mod error;
pub mod field;
pub mod hilbert;
pub mod params;
pub mod point;
pub mod solver;
pub mod sort;

pub use composition::Composition;
pub use config::{ConfigOverrides, FluidityConfig, NoiseKindName};
pub use curve::{Curve, CurveKind, Segment};
pub use display::{DisplayList, OpKind, Opcode};
pub use error::FluidityError;
pub use field::{CircularNoise, LinearNoise, NoiseConfig, NoiseField};
pub use point::{Bounds, Point};
pub use sort::{HilbertSorter, OrderHandle, Permutation, SortPolicy};
