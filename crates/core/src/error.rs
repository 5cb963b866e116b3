//! Error types for the fluidity core.

use thiserror::Error;

/// Errors produced by point generation, ordering and curve fitting.
///
/// Every variant is a configuration or precondition failure. The pipeline
/// is a pure computation, so nothing here is retried.
#[derive(Debug, Error)]
pub enum FluidityError {
    /// A point set had zero (or non-finite) extent on one axis and could
    /// not be mapped onto the Hilbert grid.
    #[error("degenerate input: point set has no extent on the {axis} axis")]
    DegenerateInput { axis: &'static str },

    /// A curve fit was requested for too few points.
    #[error("insufficient points: got {got}, need at least {min}")]
    InsufficientPoints { got: usize, min: usize },

    /// A cached permutation was applied to a point set of another size.
    #[error("permutation size mismatch: computed for {expected} points, applied to {got}")]
    PermutationSizeMismatch { expected: usize, got: usize },

    /// A configuration value was out of range (zero counts, zero period, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A name lookup for an enumerated option failed.
    #[error("unknown {kind}: '{name}'")]
    UnknownVariant { kind: &'static str, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_input_names_axis() {
        let err = FluidityError::DegenerateInput { axis: "x" };
        let msg = format!("{err}");
        assert!(
            msg.contains("x axis"),
            "expected message naming the axis, got: {msg}"
        );
    }

    #[test]
    fn insufficient_points_includes_counts() {
        let err = FluidityError::InsufficientPoints { got: 2, min: 3 };
        let msg = format!("{err}");
        assert!(msg.contains('2'), "missing got in: {msg}");
        assert!(msg.contains('3'), "missing min in: {msg}");
    }

    #[test]
    fn permutation_size_mismatch_includes_both_sizes() {
        let err = FluidityError::PermutationSizeMismatch {
            expected: 10,
            got: 12,
        };
        let msg = format!("{err}");
        assert!(msg.contains("10"), "missing expected in: {msg}");
        assert!(msg.contains("12"), "missing got in: {msg}");
    }

    #[test]
    fn invalid_configuration_includes_message() {
        let err = FluidityError::InvalidConfiguration("npoints must be positive".into());
        let msg = format!("{err}");
        assert!(msg.contains("npoints"), "missing message in: {msg}");
    }

    #[test]
    fn unknown_variant_includes_kind_and_name() {
        let err = FluidityError::UnknownVariant {
            kind: "curve kind",
            name: "bspline".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("curve kind"), "missing kind in: {msg}");
        assert!(msg.contains("bspline"), "missing name in: {msg}");
    }

    #[test]
    fn fluidity_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FluidityError>();
    }

    #[test]
    fn fluidity_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<FluidityError>();
    }
}
