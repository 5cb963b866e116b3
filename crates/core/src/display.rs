//! Renderer-agnostic path descriptions.
//!
//! A [`DisplayList`] is what an external backend (vector surface, raster
//! canvas, animation frame) replays to draw a path. The core never touches
//! pixels or files.

use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::point::{Bounds, Point};

/// One drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Opcode {
    MoveTo {
        x: f64,
        y: f64,
    },
    /// Only emitted by [`DisplayList::polyline`].
    LineTo {
        x: f64,
        y: f64,
    },
    CurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    },
    ClosePath,
}

/// Opcode kind without coordinates, for counting and shape checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    MoveTo,
    LineTo,
    CurveTo,
    ClosePath,
}

impl Opcode {
    pub fn kind(&self) -> OpKind {
        match self {
            Opcode::MoveTo { .. } => OpKind::MoveTo,
            Opcode::LineTo { .. } => OpKind::LineTo,
            Opcode::CurveTo { .. } => OpKind::CurveTo,
            Opcode::ClosePath => OpKind::ClosePath,
        }
    }

    /// Applies `f` to every coordinate pair.
    fn map_points(self, f: impl Fn(Point) -> Point) -> Self {
        match self {
            Opcode::MoveTo { x, y } => {
                let p = f(Point::new(x, y));
                Opcode::MoveTo { x: p.x, y: p.y }
            }
            Opcode::LineTo { x, y } => {
                let p = f(Point::new(x, y));
                Opcode::LineTo { x: p.x, y: p.y }
            }
            Opcode::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            } => {
                let (a, b, c) = (
                    f(Point::new(x1, y1)),
                    f(Point::new(x2, y2)),
                    f(Point::new(x3, y3)),
                );
                Opcode::CurveTo {
                    x1: a.x,
                    y1: a.y,
                    x2: b.x,
                    y2: b.y,
                    x3: c.x,
                    y3: c.y,
                }
            }
            Opcode::ClosePath => Opcode::ClosePath,
        }
    }

    fn points(&self) -> Vec<Point> {
        match *self {
            Opcode::MoveTo { x, y } | Opcode::LineTo { x, y } => vec![Point::new(x, y)],
            Opcode::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            } => vec![Point::new(x1, y1), Point::new(x2, y2), Point::new(x3, y3)],
            Opcode::ClosePath => Vec::new(),
        }
    }
}

/// An ordered opcode sequence describing one path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayList {
    ops: Vec<Opcode>,
}

impl DisplayList {
    /// `MoveTo` the first knot, one `CurveTo` per segment, `ClosePath`.
    pub fn from_curve(curve: &Curve) -> Self {
        let mut ops = Vec::with_capacity(curve.len() + 2);
        if let Some(first) = curve.segments().first() {
            ops.push(Opcode::MoveTo {
                x: first.start.x,
                y: first.start.y,
            });
        }
        ops.extend(curve.segments().iter().map(|s| Opcode::CurveTo {
            x1: s.ctrl1.x,
            y1: s.ctrl1.y,
            x2: s.ctrl2.x,
            y2: s.ctrl2.y,
            x3: s.end.x,
            y3: s.end.y,
        }));
        ops.push(Opcode::ClosePath);
        Self { ops }
    }

    /// Straight segments through `points`, for raw point overlays.
    ///
    /// Empty input gives an empty list.
    pub fn polyline(points: &[Point], closed: bool) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::default();
        };
        let mut ops = Vec::with_capacity(points.len() + 1);
        ops.push(Opcode::MoveTo {
            x: first.x,
            y: first.y,
        });
        ops.extend(rest.iter().map(|p| Opcode::LineTo { x: p.x, y: p.y }));
        if closed {
            ops.push(Opcode::ClosePath);
        }
        Self { ops }
    }

    pub fn ops(&self) -> &[Opcode] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of opcodes of the given kind.
    pub fn count(&self, kind: OpKind) -> usize {
        self.ops.iter().filter(|op| op.kind() == kind).count()
    }

    /// Bounds of every coordinate mentioned, control points included.
    pub fn bounds(&self) -> Option<Bounds> {
        self.ops
            .iter()
            .flat_map(Opcode::points)
            .map(Bounds::from_point)
            .reduce(Bounds::union)
    }

    /// A copy with every coordinate shifted by `offset`.
    pub fn translated(&self, offset: Point) -> Self {
        Self {
            ops: self.ops.iter().map(|op| op.map_points(|p| p + offset)).collect(),
        }
    }

    /// A copy with every coordinate multiplied by `factor` about the origin.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            ops: self.ops.iter().map(|op| op.map_points(|p| p * factor)).collect(),
        }
    }
}
