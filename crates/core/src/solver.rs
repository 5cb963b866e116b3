//! Cyclic tridiagonal linear systems.
//!
//! Both curve fitters reduce to one unknown per knot coupled only to its two
//! cyclic neighbours. Row `i` reads
//! `sub[i] * x[i-1] + diag[i] * x[i] + sup[i] * x[i+1] = rhs[i]`
//! with indices taken modulo `n`.

use crate::error::FluidityError;

/// Pivots smaller than this are treated as singular.
const PIVOT_EPS: f64 = 1e-300;

/// Solves a cyclic tridiagonal system with the Thomas algorithm and a
/// Sherman-Morrison correction for the two corner entries.
///
/// Requires `n >= 3` and four slices of equal length. Returns
/// `FluidityError::InvalidConfiguration` for mismatched lengths or a
/// singular system.
pub fn solve_cyclic_tridiagonal(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    rhs: &[f64],
) -> Result<Vec<f64>, FluidityError> {
    let n = diag.len();
    if sub.len() != n || sup.len() != n || rhs.len() != n {
        return Err(FluidityError::InvalidConfiguration(
            "cyclic system rows have mismatched lengths".into(),
        ));
    }
    if n < 3 {
        return Err(FluidityError::InsufficientPoints { got: n, min: 3 });
    }

    // Corners: row 0 couples to x[n-1], row n-1 couples to x[0].
    let top_right = sub[0];
    let bottom_left = sup[n - 1];
    let gamma = -diag[0];
    if gamma.abs() < PIVOT_EPS {
        return Err(singular());
    }

    let mut reduced = diag.to_vec();
    reduced[0] -= gamma;
    reduced[n - 1] -= bottom_left * top_right / gamma;

    let mut x = solve_tridiagonal(sub, &reduced, sup, rhs)?;

    let mut u = vec![0.0; n];
    u[0] = gamma;
    u[n - 1] = bottom_left;
    let z = solve_tridiagonal(sub, &reduced, sup, &u)?;

    let denom = 1.0 + z[0] + top_right * z[n - 1] / gamma;
    if denom.abs() < PIVOT_EPS {
        return Err(singular());
    }
    let fact = (x[0] + top_right * x[n - 1] / gamma) / denom;
    x.iter_mut().zip(&z).for_each(|(xi, zi)| *xi -= fact * zi);
    Ok(x)
}

/// Thomas algorithm; `sub[0]` and `sup[n-1]` are ignored.
fn solve_tridiagonal(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    rhs: &[f64],
) -> Result<Vec<f64>, FluidityError> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    let mut pivot = diag[0];
    if pivot.abs() < PIVOT_EPS {
        return Err(singular());
    }
    c[0] = sup[0] / pivot;
    d[0] = rhs[0] / pivot;
    for i in 1..n {
        pivot = diag[i] - sub[i] * c[i - 1];
        if pivot.abs() < PIVOT_EPS {
            return Err(singular());
        }
        c[i] = sup[i] / pivot;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / pivot;
    }

    let mut x = d;
    for i in (0..n - 1).rev() {
        x[i] -= c[i] * x[i + 1];
    }
    Ok(x)
}

fn singular() -> FluidityError {
    FluidityError::InvalidConfiguration("singular cyclic tridiagonal system".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Multiplies the cyclic tridiagonal matrix by `x`.
    fn multiply(sub: &[f64], diag: &[f64], sup: &[f64], x: &[f64]) -> Vec<f64> {
        let n = x.len();
        (0..n)
            .map(|i| sub[i] * x[(i + n - 1) % n] + diag[i] * x[i] + sup[i] * x[(i + 1) % n])
            .collect()
    }

    #[test]
    fn solves_periodic_spline_system() {
        let n = 6;
        let sub = vec![1.0; n];
        let diag = vec![4.0; n];
        let sup = vec![1.0; n];
        let expected = [0.5, -1.0, 2.0, 0.25, -0.75, 1.5];
        let rhs = multiply(&sub, &diag, &sup, &expected);
        let x = solve_cyclic_tridiagonal(&sub, &diag, &sup, &rhs).unwrap();
        for (a, b) in x.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }
    }

    #[test]
    fn solves_three_by_three_with_asymmetric_corners() {
        let sub = [0.5, 1.0, 2.0];
        let diag = [5.0, 6.0, 7.0];
        let sup = [1.5, 0.25, 3.0];
        let expected = [1.0, 2.0, 3.0];
        let rhs = multiply(&sub, &diag, &sup, &expected);
        let x = solve_cyclic_tridiagonal(&sub, &diag, &sup, &rhs).unwrap();
        for (a, b) in x.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12, "{a} vs {b}");
        }
    }

    #[test]
    fn rejects_two_unknowns() {
        let r = solve_cyclic_tridiagonal(&[1.0; 2], &[4.0; 2], &[1.0; 2], &[0.0; 2]);
        assert!(matches!(
            r,
            Err(FluidityError::InsufficientPoints { got: 2, min: 3 })
        ));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let r = solve_cyclic_tridiagonal(&[1.0; 3], &[4.0; 4], &[1.0; 4], &[0.0; 4]);
        assert!(matches!(r, Err(FluidityError::InvalidConfiguration(_))));
    }

    #[test]
    fn rejects_zero_diagonal() {
        let r = solve_cyclic_tridiagonal(&[1.0; 3], &[0.0; 3], &[1.0; 3], &[1.0; 3]);
        assert!(r.is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn diagonally_dominant_systems_round_trip(
                rows in prop::collection::vec(
                    (0.1f64..1.0, 0.1f64..1.0, -5.0f64..5.0),
                    3..40,
                ),
            ) {
                let sub: Vec<f64> = rows.iter().map(|r| r.0).collect();
                let sup: Vec<f64> = rows.iter().map(|r| r.1).collect();
                let diag: Vec<f64> = rows.iter().map(|r| 2.0 + r.0 + r.1).collect();
                let expected: Vec<f64> = rows.iter().map(|r| r.2).collect();
                let rhs = multiply(&sub, &diag, &sup, &expected);
                let x = solve_cyclic_tridiagonal(&sub, &diag, &sup, &rhs).unwrap();
                for (a, b) in x.iter().zip(expected.iter()) {
                    prop_assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
                }
            }
        }
    }
}
