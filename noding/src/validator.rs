use crate::error::{NodingError, Result};
use crate::geom::Point;
use crate::line_intersector::{LineIntersector, RobustLineIntersector};
use crate::segment_string::SegmentString;

/// Checks, by brute force, that a collection of segment strings is fully noded.
///
/// The strings are fully noded if
/// - no string goes out to a vertex and straight back,
/// - no two segments intersect except at their endpoints, and
/// - no string ends in the middle of another string.
///
/// This looks at every pair of segments, so it's slow. It's meant for testing
/// the output of noders.
#[derive(Debug)]
pub struct NodingValidator<'a, D> {
    strings: &'a [SegmentString<D>],
    li: RobustLineIntersector,
}

impl<'a, D> NodingValidator<'a, D> {
    pub fn new(strings: &'a [SegmentString<D>]) -> Self {
        NodingValidator {
            strings,
            li: RobustLineIntersector::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.check_valid().is_ok()
    }

    /// Returns [`NodingError::NotNoded`] describing the first problem found.
    pub fn check_valid(&self) -> Result<()> {
        self.check_end_point_vertices()?;
        self.check_interior_intersections()?;
        self.check_collapses()
    }

    fn check_collapses(&self) -> Result<()> {
        for s in self.strings {
            if let Some(w) = s.coordinates().windows(3).find(|w| w[0].eq_2d(&w[2])) {
                return Err(not_noded(w[1], "collapse"));
            }
        }
        Ok(())
    }

    fn check_interior_intersections(&self) -> Result<()> {
        for (i, s0) in self.strings.iter().enumerate() {
            for (j, s1) in self.strings.iter().enumerate().skip(i) {
                for (k, seg0) in s0.coordinates().windows(2).enumerate() {
                    for (l, seg1) in s1.coordinates().windows(2).enumerate() {
                        if i == j && k >= l {
                            continue;
                        }
                        let li = self
                            .li
                            .compute_intersection(&seg0[0], &seg0[1], &seg1[0], &seg1[1])?;
                        if li.has_intersection() && li.is_interior() {
                            return Err(not_noded(*li.point(0), "interior intersection"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn check_end_point_vertices(&self) -> Result<()> {
        for s in self.strings {
            let pts = s.coordinates();
            for end in [&pts[0], &pts[pts.len() - 1]] {
                self.check_end_point_vertex(end)?;
            }
        }
        Ok(())
    }

    fn check_end_point_vertex(&self, end: &Point) -> Result<()> {
        for s in self.strings {
            let pts = s.coordinates();
            if pts[1..pts.len() - 1].iter().any(|p| p.eq_2d(end)) {
                return Err(not_noded(*end, "endpoint/interior vertex intersection"));
            }
        }
        Ok(())
    }
}

fn not_noded(point: Point, reason: &'static str) -> NodingError {
    NodingError::NotNoded { point, reason }
}
