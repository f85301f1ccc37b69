use std::cmp::Ordering;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::error::{NodingError, Result};

/// A two-dimensional coordinate, with an optional (and ignored) `z` value.
///
/// The derived `Eq` and `Ord` compare every field, including `z`. Noding only
/// ever cares about the plane, so most of this crate uses [`Point::eq_2d`] and
/// [`Point::cmp_2d`] instead: intersection computations can produce points
/// that differ from the inputs only in their `z` noise.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: NotNan<f64>,
    pub y: NotNan<f64>,
    pub z: Option<NotNan<f64>>,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (x, y) = self.xy();
        match self.z {
            Some(z) => write!(f, "({x:?}, {y:?}, {:?})", z.into_inner()),
            None => write!(f, "({x:?}, {y:?})"),
        }
    }
}

pub(crate) fn finite(x: f64) -> Result<NotNan<f64>> {
    if x.is_infinite() {
        return Err(NodingError::Infinity);
    }
    NotNan::new(x).map_err(|_| NodingError::NaN)
}

impl Point {
    /// Creates a point without a `z` value, rejecting NaNs and infinities.
    pub fn try_new(x: f64, y: f64) -> Result<Self> {
        Ok(Point {
            x: finite(x)?,
            y: finite(y)?,
            z: None,
        })
    }

    /// Returns a copy of this point carrying the given `z` value.
    pub fn with_z(self, z: f64) -> Result<Self> {
        Ok(Point {
            z: Some(finite(z)?),
            ..self
        })
    }

    pub fn xy(&self) -> (f64, f64) {
        (self.x.into_inner(), self.y.into_inner())
    }

    /// Equality in the plane, ignoring `z`.
    pub fn eq_2d(&self, other: &Point) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Lexicographic order in the plane: by `x`, then by `y`. Ignores `z`.
    pub fn cmp_2d(&self, other: &Point) -> Ordering {
        self.x.cmp(&other.x).then(self.y.cmp(&other.y))
    }

    /// The point a fraction `t` of the way from `self` to `other`.
    pub fn affine(&self, other: &Point, t: f64) -> Result<Point> {
        let (x0, y0) = self.xy();
        let (x1, y1) = other.xy();
        Point::try_new((1.0 - t) * x0 + t * x1, (1.0 - t) * y0 + t * y1)
    }
}

impl From<(NotNan<f64>, NotNan<f64>)> for Point {
    fn from((x, y): (NotNan<f64>, NotNan<f64>)) -> Self {
        Self { x, y, z: None }
    }
}

impl TryFrom<(f64, f64)> for Point {
    type Error = NodingError;

    fn try_from((x, y): (f64, f64)) -> Result<Self> {
        Point::try_new(x, y)
    }
}

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    /// The smallest envelope containing both points.
    pub fn from_points(p: &Point, q: &Point) -> Self {
        let (px, py) = p.xy();
        let (qx, qy) = q.xy();
        Envelope {
            min_x: px.min(qx),
            min_y: py.min(qy),
            max_x: px.max(qx),
            max_y: py.max(qy),
        }
    }

    /// The smallest envelope containing all the points, or `None` if there
    /// aren't any.
    pub fn of(pts: &[Point]) -> Option<Self> {
        let (first, rest) = pts.split_first()?;
        let mut env = Envelope::from_points(first, first);
        for p in rest {
            env.expand_to_include(p);
        }
        Some(env)
    }

    pub fn expand_to_include(&mut self, p: &Point) {
        let (x, y) = p.xy();
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Grows the envelope by `distance` on every side.
    pub fn expanded_by(&self, distance: f64) -> Self {
        Envelope {
            min_x: self.min_x - distance,
            min_y: self.min_y - distance,
            max_x: self.max_x + distance,
            max_y: self.max_y + distance,
        }
    }

    /// Do the envelopes share at least one point? (Touching boundaries count.)
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    pub fn contains(&self, p: &Point) -> bool {
        let (x, y) = p.xy();
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}
