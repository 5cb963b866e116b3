//! Closed cubic curves fitted through an ordered point sequence.
//!
//! A [`Curve`] is always closed: segment `i` ends exactly where segment
//! `i + 1` starts, and the last segment ends at the first knot. Open curves
//! cannot be represented.
//!
//! Two fitting strategies share one entry point, [`CurveKind::fit`]:
//!
//! - [`CurveKind::TangentContinuous`]: Hobby's algorithm with unit tension.
//!   Solves for the tangent angle at every knot so that mock curvature is
//!   continuous, then places control points with Hobby's velocity
//!   function. Produces round, flowing loops.
//! - [`CurveKind::CubicSpline`]: periodic interpolating cubic spline with
//!   uniform parameter spacing, continuous through the second derivative.
//!   Produces tighter, more geometric loops.
//!
//! Both treat the input as cyclic and keep no state between calls.

use serde::{Deserialize, Serialize};

use crate::error::FluidityError;
use crate::point::{Bounds, Point};
use crate::solver::solve_cyclic_tridiagonal;

/// Fewest knots that define a closed loop.
pub const MIN_POINTS: usize = 3;

/// Chords shorter than this are treated as zero length.
const CHORD_EPS: f64 = 1e-12;

/// Upper bound on Hobby's velocity, as in MetaPost.
const MAX_VELOCITY: f64 = 4.0;

/// One cubic Bezier piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub end: Point,
}

impl Segment {
    /// Evaluates the segment at `t` in `[0, 1]`.
    pub fn eval(&self, t: f64) -> Point {
        let u = 1.0 - t;
        self.start * (u * u * u)
            + self.ctrl1 * (3.0 * u * u * t)
            + self.ctrl2 * (3.0 * u * t * t)
            + self.end * (t * t * t)
    }

    /// Bounds of the control polygon, which contain the segment.
    pub fn hull_bounds(&self) -> Bounds {
        Bounds::from_point(self.start)
            .include(self.ctrl1)
            .include(self.ctrl2)
            .include(self.end)
    }
}

/// A closed loop of cubic segments, one per knot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    segments: Vec<Segment>,
}

impl Curve {
    /// Assembles segment `i` from knot `i` to knot `i + 1` (cyclically)
    /// using `controls[i]`. Endpoints are copied from `knots`, so closure
    /// holds exactly.
    fn from_controls(knots: &[Point], controls: impl Iterator<Item = (Point, Point)>) -> Self {
        let n = knots.len();
        let segments = controls
            .enumerate()
            .map(|(i, (ctrl1, ctrl2))| Segment {
                start: knots[i],
                ctrl1,
                ctrl2,
                end: knots[(i + 1) % n],
            })
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments, equal to the number of knots fitted.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when every segment ends exactly where the next one starts.
    pub fn is_closed(&self) -> bool {
        let n = self.segments.len();
        n > 0
            && (0..n).all(|i| self.segments[i].end == self.segments[(i + 1) % n].start)
    }

    /// The on-curve points, in traversal order.
    pub fn knots(&self) -> Vec<Point> {
        self.segments.iter().map(|s| s.start).collect()
    }

    /// Point at parameter `t` of segment `segment`, or `None` if out of range.
    pub fn point_at(&self, segment: usize, t: f64) -> Option<Point> {
        self.segments.get(segment).map(|s| s.eval(t))
    }

    /// Union of all control-polygon bounds.
    pub fn bounds(&self) -> Option<Bounds> {
        self.segments
            .iter()
            .map(Segment::hull_bounds)
            .reduce(Bounds::union)
    }
}

/// Curve fitting strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    /// Hobby-style tangent-continuous fit.
    #[default]
    #[serde(rename = "hobby")]
    TangentContinuous,
    /// Periodic interpolating cubic spline.
    #[serde(rename = "cubic")]
    CubicSpline,
}

/// All recognized curve kind names.
const CURVE_NAMES: &[&str] = &["hobby", "cubic"];

impl CurveKind {
    pub fn from_name(name: &str) -> Result<Self, FluidityError> {
        match name {
            "hobby" => Ok(CurveKind::TangentContinuous),
            "cubic" => Ok(CurveKind::CubicSpline),
            _ => Err(FluidityError::UnknownVariant {
                kind: "curve kind",
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurveKind::TangentContinuous => "hobby",
            CurveKind::CubicSpline => "cubic",
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        CURVE_NAMES
    }

    /// Fits a closed curve through `points`, treated as a cycle.
    ///
    /// Returns `FluidityError::InsufficientPoints` for fewer than three
    /// points.
    pub fn fit(&self, points: &[Point]) -> Result<Curve, FluidityError> {
        if points.len() < MIN_POINTS {
            return Err(FluidityError::InsufficientPoints {
                got: points.len(),
                min: MIN_POINTS,
            });
        }
        match self {
            CurveKind::TangentContinuous => fit_hobby(points),
            CurveKind::CubicSpline => fit_cubic(points),
        }
    }
}

// ---------------------------------------------------------------------------
// Hobby
// ---------------------------------------------------------------------------

fn fit_hobby(points: &[Point]) -> Result<Curve, FluidityError> {
    let n = points.len();
    let chords: Vec<Point> = (0..n).map(|k| points[(k + 1) % n] - points[k]).collect();
    let lengths: Vec<f64> = chords.iter().map(|c| c.length().max(CHORD_EPS)).collect();

    // psi[k]: turning angle at knot k, from the incoming to the outgoing chord.
    let psi: Vec<f64> = (0..n)
        .map(|k| {
            let prev = chords[(k + n - 1) % n];
            let next = chords[k];
            prev.perp_dot(next).atan2(prev.dot(next))
        })
        .collect();

    // With unit tension, curvature continuity at knot k gives
    //   theta[k-1]/d[k-1] + (2/d[k-1] + 2/d[k]) theta[k] + theta[k+1]/d[k]
    //     = -2 psi[k]/d[k-1] - psi[k+1]/d[k]
    let mut sub = Vec::with_capacity(n);
    let mut diag = Vec::with_capacity(n);
    let mut sup = Vec::with_capacity(n);
    let mut rhs = Vec::with_capacity(n);
    for k in 0..n {
        let d_prev = lengths[(k + n - 1) % n];
        let d = lengths[k];
        sub.push(1.0 / d_prev);
        diag.push(2.0 / d_prev + 2.0 / d);
        sup.push(1.0 / d);
        rhs.push(-2.0 * psi[k] / d_prev - psi[(k + 1) % n] / d);
    }
    let theta = solve_cyclic_tridiagonal(&sub, &diag, &sup, &rhs)?;

    let controls = (0..n).map(|k| {
        let next = (k + 1) % n;
        let chord = chords[k];
        if chord.length() < CHORD_EPS {
            return (points[k], points[k]);
        }
        let t = theta[k];
        let f = -psi[next] - theta[next];
        let rho = velocity(t, f);
        let sigma = velocity(f, t);
        (
            points[k] + Point::from_angle(t).rotate(chord) * rho,
            points[next] - Point::from_angle(-f).rotate(chord) * sigma,
        )
    });
    Ok(Curve::from_controls(points, controls))
}

/// Hobby's velocity: control distance as a fraction of the chord, for
/// departure angle `theta` and arrival angle `phi`.
fn velocity(theta: f64, phi: f64) -> f64 {
    let (st, ct) = theta.sin_cos();
    let (sf, cf) = phi.sin_cos();
    let sqrt5 = 5.0_f64.sqrt();
    let num = 2.0 + std::f64::consts::SQRT_2 * (st - sf / 16.0) * (sf - st / 16.0) * (ct - cf);
    let denom = 3.0 * (1.0 + 0.5 * (sqrt5 - 1.0) * ct + 0.5 * (3.0 - sqrt5) * cf);
    if denom <= num / MAX_VELOCITY {
        return MAX_VELOCITY;
    }
    (num / denom).clamp(0.0, MAX_VELOCITY)
}

// ---------------------------------------------------------------------------
// Periodic cubic spline
// ---------------------------------------------------------------------------

fn fit_cubic(points: &[Point]) -> Result<Curve, FluidityError> {
    let n = points.len();
    let ones = vec![1.0; n];
    let fours = vec![4.0; n];

    // First derivatives D satisfy D[i-1] + 4 D[i] + D[i+1] = 3 (P[i+1] - P[i-1]).
    let rhs: Vec<Point> = (0..n)
        .map(|i| (points[(i + 1) % n] - points[(i + n - 1) % n]) * 3.0)
        .collect();
    let rhs_x: Vec<f64> = rhs.iter().map(|p| p.x).collect();
    let rhs_y: Vec<f64> = rhs.iter().map(|p| p.y).collect();
    let dx = solve_cyclic_tridiagonal(&ones, &fours, &ones, &rhs_x)?;
    let dy = solve_cyclic_tridiagonal(&ones, &fours, &ones, &rhs_y)?;
    let derivs: Vec<Point> = dx.into_iter().zip(dy).map(|(x, y)| Point::new(x, y)).collect();

    let controls = (0..n).map(|i| {
        let next = (i + 1) % n;
        (
            points[i] + derivs[i] / 3.0,
            points[next] - derivs[next] / 3.0,
        )
    });
    Ok(Curve::from_controls(points, controls))
}
