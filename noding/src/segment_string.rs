use crate::error::{NodingError, Result};
use crate::geom::{Envelope, Point};
use crate::line_intersector::LineIntersection;
use crate::node_list::SegmentNodeList;
use crate::octant::Octant;

/// The octant of the segment starting at vertex `idx`, or `None` for the last
/// vertex (which doesn't start a segment).
pub(crate) fn segment_octant(pts: &[Point], idx: usize) -> Result<Option<Octant>> {
    match (pts.get(idx), pts.get(idx + 1)) {
        (Some(p0), Some(p1)) => Octant::between(p0, p1).map(Some),
        _ => Ok(None),
    }
}

/// A polyline to be noded, together with some data belonging to the caller.
///
/// The coordinates are fixed when the string is created. Intersections found
/// during noding are recorded in the string's [`SegmentNodeList`], and the
/// string is finally replaced by the pieces between its nodes (see
/// [`SegmentString::into_noded_substrings`]). Every piece carries a clone of the
/// original `data`, which is how callers keep track of where the pieces came from.
#[derive(Clone, Debug)]
pub struct SegmentString<D> {
    pts: Vec<Point>,
    data: D,
    nodes: SegmentNodeList,
}

impl<D> SegmentString<D> {
    /// Creates a segment string. There must be at least two points.
    pub fn new(pts: Vec<Point>, data: D) -> Result<Self> {
        if pts.len() < 2 {
            return Err(NodingError::TooFewPoints(pts.len()));
        }
        Ok(SegmentString {
            pts,
            data,
            nodes: SegmentNodeList::new(),
        })
    }

    /// Creates a segment string from raw coordinates, rejecting NaNs and infinities.
    pub fn from_xy(xys: impl IntoIterator<Item = (f64, f64)>, data: D) -> Result<Self> {
        let pts = xys
            .into_iter()
            .map(Point::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(pts, data)
    }

    pub fn coordinates(&self) -> &[Point] {
        &self.pts
    }

    /// # Panics
    /// Panics if `idx` is out of bounds.
    pub fn coordinate_at(&self, idx: usize) -> &Point {
        &self.pts[idx]
    }

    pub fn num_points(&self) -> usize {
        self.pts.len()
    }

    pub fn num_segments(&self) -> usize {
        self.pts.len() - 1
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    /// Takes the string apart, discarding any nodes.
    pub fn into_parts(self) -> (Vec<Point>, D) {
        (self.pts, self.data)
    }

    /// Does the string end where it starts?
    pub fn is_closed(&self) -> bool {
        self.pts[0].eq_2d(&self.pts[self.pts.len() - 1])
    }

    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::from_points(&self.pts[0], &self.pts[0]);
        for p in &self.pts[1..] {
            env.expand_to_include(p);
        }
        env
    }

    /// The direction of the segment starting at vertex `idx`.
    ///
    /// Returns `None` for the last vertex, and an error if the segment has zero length.
    pub fn segment_octant(&self, idx: usize) -> Result<Option<Octant>> {
        segment_octant(&self.pts, idx)
    }

    pub fn node_list(&self) -> &SegmentNodeList {
        &self.nodes
    }

    /// Records a node at `point`, which lies on the segment starting at vertex
    /// `segment_index`.
    pub fn add_intersection(&mut self, point: Point, segment_index: usize) -> Result<()> {
        self.nodes.add(&self.pts, point, segment_index)
    }

    /// Records all the points of an intersection as nodes on the segment starting
    /// at vertex `segment_index`.
    pub fn add_intersections(&mut self, li: &LineIntersection, segment_index: usize) -> Result<()> {
        for pt in li.points() {
            self.add_intersection(*pt, segment_index)?;
        }
        Ok(())
    }

    /// The coordinates of this string with all of its nodes inserted.
    pub fn noded_coordinates(&mut self) -> Result<Vec<Point>> {
        self.nodes.split_coordinates(&self.pts)
    }
}

impl<D: Clone> SegmentString<D> {
    /// Splits this string at its nodes (and its endpoints).
    pub fn into_noded_substrings(mut self, out: &mut Vec<SegmentString<D>>) -> Result<()> {
        self.nodes.add_split_edges(&self.pts, &self.data, out)
    }
}

/// Splits every string at its nodes.
pub fn noded_substrings<D: Clone>(
    strings: impl IntoIterator<Item = SegmentString<D>>,
) -> Result<Vec<SegmentString<D>>> {
    let mut out = Vec::new();
    for s in strings {
        s.into_noded_substrings(&mut out)?;
    }
    Ok(out)
}

/// Formats the string as a `LINESTRING`, ignoring `z`.
impl<D> std::fmt::Display for SegmentString<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LINESTRING (")?;
        for (i, p) in self.pts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", p.x, p.y)?;
        }
        write!(f, ")")
    }
}
