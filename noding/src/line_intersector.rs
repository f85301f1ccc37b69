//! Segment-segment intersection.
//!
//! Orientation tests use Shewchuk's adaptive predicates (via the `robust` crate), so
//! the classification of a pair of segments as crossing, touching, collinear or
//! disjoint is exact. When two segments cross properly, the crossing point is
//! computed in exact rational arithmetic and then rounded to the nearest
//! representable point, which is guaranteed to stay inside both segments' envelopes.

use smallvec::SmallVec;

use crate::error::Result;
use crate::geom::{Envelope, Point};
use crate::num::ExactPoint;

/// The outcome of intersecting two segments `p0 -- p1` and `q0 -- q1`.
#[derive(Clone, Debug, PartialEq)]
pub struct LineIntersection {
    points: SmallVec<[Point; 2]>,
    collinear: bool,
    proper: bool,
    // Whether some intersection point is strictly inside segment p (resp. q),
    // as opposed to at one of its endpoints.
    interior: [bool; 2],
}

impl LineIntersection {
    fn none() -> Self {
        LineIntersection {
            points: SmallVec::new(),
            collinear: false,
            proper: false,
            interior: [false, false],
        }
    }

    fn new(points: SmallVec<[Point; 2]>, collinear: bool, proper: bool, segs: [[&Point; 2]; 2]) -> Self {
        let interior_to =
            |[a, b]: [&Point; 2]| points.iter().any(|pt| !pt.eq_2d(a) && !pt.eq_2d(b));
        let interior = [interior_to(segs[0]), interior_to(segs[1])];
        LineIntersection {
            points,
            collinear,
            proper,
            interior,
        }
    }

    pub fn has_intersection(&self) -> bool {
        !self.points.is_empty()
    }

    /// The number of intersection points: zero, one, or two (for a collinear
    /// overlap, the two ends of the shared part).
    pub fn count(&self) -> usize {
        self.points.len()
    }

    /// The `i`th intersection point.
    ///
    /// # Panics
    /// Panics if `i >= self.count()`.
    pub fn point(&self, i: usize) -> &Point {
        &self.points[i]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Are the segments collinear and overlapping?
    pub fn is_collinear(&self) -> bool {
        self.collinear
    }

    /// A proper intersection is a single point that lies strictly inside
    /// both segments.
    pub fn is_proper(&self) -> bool {
        self.proper
    }

    /// Does some intersection point lie strictly inside at least one of the segments?
    pub fn is_interior(&self) -> bool {
        self.interior[0] || self.interior[1]
    }

    /// Does some intersection point lie strictly inside the given input segment
    /// (0 for `p0 -- p1`, 1 for `q0 -- q1`)?
    pub fn is_interior_to(&self, input: usize) -> bool {
        self.interior[input]
    }
}

/// Computes intersections between pairs of segments.
pub trait LineIntersector {
    /// Intersects the segment `p0 -- p1` with the segment `q0 -- q1`.
    fn compute_intersection(
        &self,
        p0: &Point,
        p1: &Point,
        q0: &Point,
        q1: &Point,
    ) -> Result<LineIntersection>;
}

/// A [`LineIntersector`] with exact predicates.
#[derive(Clone, Copy, Debug, Default)]
pub struct RobustLineIntersector;

/// The sign of the orientation of `c` relative to the directed line `a -> b`:
/// positive if `c` is to the left.
fn orientation(a: &Point, b: &Point, c: &Point) -> i8 {
    let coord = |p: &Point| {
        let (x, y) = p.xy();
        robust::Coord { x, y }
    };
    let det = robust::orient2d(coord(a), coord(b), coord(c));
    if det > 0.0 {
        1
    } else if det < 0.0 {
        -1
    } else {
        0
    }
}

fn same_side(a: i8, b: i8) -> bool {
    (a > 0 && b > 0) || (a < 0 && b < 0)
}

impl RobustLineIntersector {
    pub fn new() -> Self {
        RobustLineIntersector
    }

    fn collinear(p0: &Point, p1: &Point, q0: &Point, q1: &Point) -> LineIntersection {
        let env_p = Envelope::from_points(p0, p1);
        let env_q = Envelope::from_points(q0, q1);
        let q0_in_p = env_p.contains(q0);
        let q1_in_p = env_p.contains(q1);
        let p0_in_q = env_q.contains(p0);
        let p1_in_q = env_q.contains(p1);

        let pair = if q0_in_p && q1_in_p {
            Some((q0, q1))
        } else if p0_in_q && p1_in_q {
            Some((p0, p1))
        } else if q0_in_p && p0_in_q {
            Some((q0, p0))
        } else if q0_in_p && p1_in_q {
            Some((q0, p1))
        } else if q1_in_p && p0_in_q {
            Some((q1, p0))
        } else if q1_in_p && p1_in_q {
            Some((q1, p1))
        } else {
            None
        };

        let segs = [[p0, p1], [q0, q1]];
        match pair {
            None => LineIntersection::none(),
            // The segments only touch at a shared endpoint (or one of them is
            // degenerate).
            Some((a, b)) if a.eq_2d(b) => {
                LineIntersection::new(SmallVec::from_buf_and_len([*a, *a], 1), false, false, segs)
            }
            Some((a, b)) => LineIntersection::new(SmallVec::from_buf([*a, *b]), true, false, segs),
        }
    }

    fn proper_point(p0: &Point, p1: &Point, q0: &Point, q1: &Point) -> Result<Point> {
        let a0 = ExactPoint::new(p0)?;
        let a1 = ExactPoint::new(p1)?;
        let b0 = ExactPoint::new(q0)?;
        let b1 = ExactPoint::new(q1)?;

        let u = &a1 - &a0;
        let v = &b1 - &b0;
        let w = &b0 - &a0;
        // Non-zero, because the caller checked that the segments cross properly.
        let det = u.cross(&v);
        let t = w.cross(&v) / det;
        a0.affine(&a1, &t).round()
    }
}

impl LineIntersector for RobustLineIntersector {
    fn compute_intersection(
        &self,
        p0: &Point,
        p1: &Point,
        q0: &Point,
        q1: &Point,
    ) -> Result<LineIntersection> {
        if !Envelope::from_points(p0, p1).intersects(&Envelope::from_points(q0, q1)) {
            return Ok(LineIntersection::none());
        }

        let pq0 = orientation(p0, p1, q0);
        let pq1 = orientation(p0, p1, q1);
        if same_side(pq0, pq1) {
            return Ok(LineIntersection::none());
        }

        let qp0 = orientation(q0, q1, p0);
        let qp1 = orientation(q0, q1, p1);
        if same_side(qp0, qp1) {
            return Ok(LineIntersection::none());
        }

        if pq0 == 0 && pq1 == 0 && qp0 == 0 && qp1 == 0 {
            return Ok(Self::collinear(p0, p1, q0, q1));
        }

        let segs = [[p0, p1], [q0, q1]];
        if pq0 == 0 || pq1 == 0 || qp0 == 0 || qp1 == 0 {
            // An endpoint of one segment lies on the other. Prefer shared
            // endpoints, so that the result is exactly an input vertex.
            let pt = if p0.eq_2d(q0) || p0.eq_2d(q1) {
                p0
            } else if p1.eq_2d(q0) || p1.eq_2d(q1) {
                p1
            } else if pq0 == 0 {
                q0
            } else if pq1 == 0 {
                q1
            } else if qp0 == 0 {
                p0
            } else {
                p1
            };
            return Ok(LineIntersection::new(
                SmallVec::from_buf_and_len([*pt, *pt], 1),
                false,
                false,
                segs,
            ));
        }

        let pt = Self::proper_point(p0, p1, q0, q1)?;
        Ok(LineIntersection::new(
            SmallVec::from_buf_and_len([pt, pt], 1),
            false,
            true,
            segs,
        ))
    }
}
