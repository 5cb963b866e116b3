//! Lenient readers for a flat JSON params object.
//!
//! Numeric readers return `None` when a key is missing or carries the
//! wrong JSON type; they never fail. Counts are the exception: a count
//! key that is present must hold a non-negative integer, read with
//! [`param_count`]. Enumerated options are
//! read with [`param_name`], which leaves validation of the name to the
//! caller so that unknown names can be reported instead of ignored.

use serde_json::Value;

use crate::error::FluidityError;

/// Reads an `f64`, accepting JSON integers as well as floats.
pub fn opt_f64(params: &Value, name: &str) -> Option<f64> {
    params.get(name).and_then(Value::as_f64)
}

/// Reads a non-negative integer that fits in `u32` (noise seeds, exponents).
pub fn opt_u32(params: &Value, name: &str) -> Option<u32> {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

/// Reads a count. Absent (or `null`) is `Ok(None)`; anything other than a
/// non-negative integer is `FluidityError::InvalidConfiguration`.
pub fn param_count(params: &Value, name: &str) -> Result<Option<usize>, FluidityError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                FluidityError::InvalidConfiguration(format!(
                    "{name} must be a non-negative integer, got {v}"
                ))
            }),
    }
}

/// Returns the string under `name`, or `None` when absent or not a string.
pub fn param_name<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(Value::as_str)
}
