//! Strategies for handling a candidate pair of segments during noding.

use serde::Serialize;

use crate::error::Result;
use crate::geom::Point;
use crate::line_intersector::{LineIntersection, LineIntersector, RobustLineIntersector};
use crate::segment_string::SegmentString;

/// Identifies a segment: the segment starting at vertex `segment` of the
/// string at index `string` of the collection being noded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SegmentRef {
    pub string: usize,
    pub segment: usize,
}

impl SegmentRef {
    pub fn new(string: usize, segment: usize) -> Self {
        SegmentRef { string, segment }
    }
}

fn intersect<D, L: LineIntersector>(
    li: &L,
    strings: &[SegmentString<D>],
    a: SegmentRef,
    b: SegmentRef,
) -> Result<LineIntersection> {
    let pa = strings[a.string].coordinates();
    let pb = strings[b.string].coordinates();
    li.compute_intersection(
        &pa[a.segment],
        &pa[a.segment + 1],
        &pb[b.segment],
        &pb[b.segment + 1],
    )
}

/// Something that a [`Noder`](crate::Noder) calls for every pair of segments
/// that might intersect.
///
/// Noders may call this with the two segments in either order, and may call it
/// with a segment paired with itself (which implementations should ignore).
pub trait SegmentIntersector {
    fn process_intersections<D>(
        &mut self,
        strings: &mut [SegmentString<D>],
        a: SegmentRef,
        b: SegmentRef,
    ) -> Result<()>;

    /// If this returns true, the noder may stop early without looking at the
    /// remaining pairs.
    fn is_done(&self) -> bool {
        false
    }
}

/// Counters describing what an [`IntersectionAdder`] saw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IntersectionStats {
    /// How many segment pairs were tested.
    pub num_tests: usize,
    /// How many tested pairs intersected at all, including trivially.
    pub num_intersections: usize,
    /// How many intersections were strictly inside at least one of their segments.
    pub num_interior_intersections: usize,
    /// How many intersections were strictly inside both of their segments.
    pub num_proper_intersections: usize,
    /// Whether any non-trivial intersection was recorded.
    pub has_intersection: bool,
    pub has_interior: bool,
    pub has_proper: bool,
    pub has_proper_interior: bool,
}

/// Records every non-trivial intersection as a node on both of the strings involved.
///
/// This is the intersector to use for actually noding strings. It also keeps
/// some statistics, which can be used to tell whether the input was already
/// noded (no interior intersections) or simple (no intersections at all).
#[derive(Clone, Debug, Default)]
pub struct IntersectionAdder<L = RobustLineIntersector> {
    li: L,
    stats: IntersectionStats,
}

impl IntersectionAdder<RobustLineIntersector> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: LineIntersector> IntersectionAdder<L> {
    pub fn with_line_intersector(li: L) -> Self {
        IntersectionAdder {
            li,
            stats: IntersectionStats::default(),
        }
    }

    pub fn line_intersector(&self) -> &L {
        &self.li
    }

    pub fn stats(&self) -> IntersectionStats {
        self.stats
    }

    pub fn has_intersection(&self) -> bool {
        self.stats.has_intersection
    }

    pub fn has_proper_intersection(&self) -> bool {
        self.stats.has_proper
    }

    pub fn has_proper_interior_intersection(&self) -> bool {
        self.stats.has_proper_interior
    }

    pub fn has_interior_intersection(&self) -> bool {
        self.stats.has_interior
    }

    pub fn num_interior_intersections(&self) -> usize {
        self.stats.num_interior_intersections
    }

    /// Adjacent segments of a string always meet at their shared vertex, and so
    /// do the first and last segments of a closed string. That vertex is
    /// already a node, so if it's the only intersection there's nothing to record.
    ///
    /// Adjacent segments that overlap (because the string doubles back on
    /// itself) have two intersection points, and are *not* trivial.
    fn is_trivial<D>(
        strings: &[SegmentString<D>],
        a: SegmentRef,
        b: SegmentRef,
        li: &LineIntersection,
    ) -> bool {
        if a.string != b.string || li.count() != 1 {
            return false;
        }
        if a.segment.abs_diff(b.segment) == 1 {
            return true;
        }
        let s = &strings[a.string];
        let last = s.num_segments() - 1;
        s.is_closed()
            && ((a.segment == 0 && b.segment == last) || (b.segment == 0 && a.segment == last))
    }
}

impl<L: LineIntersector> SegmentIntersector for IntersectionAdder<L> {
    fn process_intersections<D>(
        &mut self,
        strings: &mut [SegmentString<D>],
        a: SegmentRef,
        b: SegmentRef,
    ) -> Result<()> {
        if a == b {
            return Ok(());
        }

        self.stats.num_tests += 1;
        let li = intersect(&self.li, strings, a, b)?;
        if !li.has_intersection() {
            return Ok(());
        }

        self.stats.num_intersections += 1;
        if li.is_interior() {
            self.stats.num_interior_intersections += 1;
            self.stats.has_interior = true;
        }

        if Self::is_trivial(strings, a, b, &li) {
            return Ok(());
        }

        tracing::trace!(?a, ?b, points = ?li.points(), "recording intersection");
        self.stats.has_intersection = true;
        strings[a.string].add_intersections(&li, a.segment)?;
        strings[b.string].add_intersections(&li, b.segment)?;
        if li.is_proper() {
            self.stats.num_proper_intersections += 1;
            self.stats.has_proper = true;
            self.stats.has_proper_interior = true;
        }
        Ok(())
    }
}

/// Looks for intersections that are interior to at least one segment, without
/// recording any nodes.
///
/// Strings are fully noded exactly when there are no such intersections, so
/// this is a cheap way to check whether noding is needed. By default the
/// finder stops at the first interior intersection; see [`Self::find_all`].
#[derive(Clone, Debug, Default)]
pub struct InteriorIntersectionFinder<L = RobustLineIntersector> {
    li: L,
    find_all: bool,
    intersections: Vec<Point>,
    first_segments: Option<[SegmentRef; 2]>,
    num_tests: usize,
}

impl InteriorIntersectionFinder<RobustLineIntersector> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A finder that keeps going and collects every interior intersection.
    pub fn find_all() -> Self {
        InteriorIntersectionFinder {
            find_all: true,
            ..Self::default()
        }
    }
}

impl<L: LineIntersector> InteriorIntersectionFinder<L> {
    pub fn with_line_intersector(li: L) -> Self {
        InteriorIntersectionFinder {
            li,
            find_all: false,
            intersections: Vec::new(),
            first_segments: None,
            num_tests: 0,
        }
    }

    pub fn has_intersection(&self) -> bool {
        !self.intersections.is_empty()
    }

    /// The first interior intersection point found.
    pub fn interior_point(&self) -> Option<&Point> {
        self.intersections.first()
    }

    /// The segments involved in the first interior intersection found.
    pub fn intersection_segments(&self) -> Option<[SegmentRef; 2]> {
        self.first_segments
    }

    pub fn intersections(&self) -> &[Point] {
        &self.intersections
    }

    pub fn num_tests(&self) -> usize {
        self.num_tests
    }
}

impl<L: LineIntersector> SegmentIntersector for InteriorIntersectionFinder<L> {
    fn process_intersections<D>(
        &mut self,
        strings: &mut [SegmentString<D>],
        a: SegmentRef,
        b: SegmentRef,
    ) -> Result<()> {
        if a == b || self.is_done() {
            return Ok(());
        }

        self.num_tests += 1;
        let li = intersect(&self.li, strings, a, b)?;
        if li.has_intersection() && li.is_interior() {
            if self.first_segments.is_none() {
                self.first_segments = Some([a, b]);
            }
            self.intersections.extend_from_slice(li.points());
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        !self.find_all && !self.intersections.is_empty()
    }
}
