//! Two-dimensional Hilbert curve indexing on a `2^order` square grid.
//!
//! Walks the coordinate bits from most to least significant, tracking the
//! entry corner and direction of the current sub-square. Each step
//! contributes one base-4 digit to the index.

/// Largest supported order: `2 * order` index bits must fit in `u32`.
pub const MAX_ORDER: u32 = 16;

fn graycode(x: u32) -> u32 {
    (x ^ (x >> 1)) & 3
}

/// Swaps the two low bits of a quadrant label.
fn rotate(label: u32) -> u32 {
    match label & 3 {
        1 => 2,
        2 => 1,
        other => other,
    }
}

/// Distance of cell `(x, y)` along the Hilbert curve of the given order.
///
/// Coordinates must lie in `[0, 2^order)`; higher bits are ignored.
pub fn hilbert_index(order: u32, x: u32, y: u32) -> u32 {
    let mut index = 0;
    let mut entry = 0;
    let mut direction = 0;
    for step in 0..order {
        let bit = order - step - 1;
        let label = (((y >> bit) & 1) | (((x >> bit) & 1) << 1)) ^ entry;
        let digit = match direction {
            0 => graycode(rotate(label)),
            _ => graycode(label),
        };
        if digit == 3 {
            entry = 3 - entry;
        }
        index = (index << 2) | digit;
        if digit == 0 || digit == 3 {
            direction ^= 1;
        }
    }
    index
}

/// Cell at distance `index` along the Hilbert curve; inverse of [`hilbert_index`].
pub fn hilbert_point(order: u32, index: u32) -> (u32, u32) {
    let mut entry = 0;
    let mut direction = 0;
    let mut x = 0;
    let mut y = 0;
    for step in 0..order {
        let digit = (index >> (2 * (order - step - 1))) & 3;
        let label = match direction {
            0 => rotate(graycode(digit)) ^ entry,
            _ => graycode(digit) ^ entry,
        };
        let mask = 1 << (order - step - 1);
        if label & 2 != 0 {
            x |= mask;
        }
        if label & 1 != 0 {
            y |= mask;
        }
        if digit == 3 {
            entry = 3 - entry;
        }
        if digit == 0 || digit == 3 {
            direction ^= 1;
        }
    }
    (x, y)
}
