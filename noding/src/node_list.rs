//! The nodes of a single segment string, and the splitting of that string at its nodes.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::error::{NodingError, Result};
use crate::geom::Point;
use crate::octant::Octant;
use crate::segment_string::{segment_octant, SegmentString};

/// A point at which a segment string will be split.
///
/// A node lives on the segment `pts[segment_index] -- pts[segment_index + 1]`
/// of its string. It is *interior* if it isn't the segment's start vertex.
/// A node that coincides with the segment's end vertex is moved onto the next
/// segment, so there's only ever one way to describe a given node. The two
/// endpoint nodes are the exception: they stay on the first and last vertex
/// even if a zero-length segment makes them equal to a neighbor.
#[derive(Clone, Copy, Debug)]
pub struct SegmentNode {
    pub point: Point,
    pub segment_index: usize,
    // The direction of the segment, for ordering several interior nodes
    // on the same segment. Only interior nodes need (or have) one.
    octant: Option<Octant>,
}

impl SegmentNode {
    pub fn is_interior(&self) -> bool {
        self.octant.is_some()
    }

    pub fn octant(&self) -> Option<Octant> {
        self.octant
    }
}

// Nodes are ordered by their position along the string.
impl Ord for SegmentNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segment_index
            .cmp(&other.segment_index)
            .then_with(|| {
                if self.point.eq_2d(&other.point) {
                    return Ordering::Equal;
                }
                match (self.octant, other.octant) {
                    (None, _) => Ordering::Less,
                    (_, None) => Ordering::Greater,
                    (Some(oct), Some(_)) => oct.compare_along(&self.point, &other.point),
                }
            })
    }
}

impl PartialOrd for SegmentNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SegmentNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SegmentNode {}

/// If `n0` and `n1` are at the same place with exactly one vertex of the string
/// between them, returns the index of that vertex.
fn collapse_index(n0: &SegmentNode, n1: &SegmentNode) -> Option<usize> {
    if !n0.point.eq_2d(&n1.point) {
        return None;
    }
    let mut between = n1.segment_index.saturating_sub(n0.segment_index);
    if !n1.is_interior() {
        between = between.saturating_sub(1);
    }
    (between == 1).then_some(n0.segment_index + 1)
}

/// The coordinates of the part of the string between two consecutive nodes.
fn split_edge_points(pts: &[Point], n0: &SegmentNode, n1: &SegmentNode) -> Vec<Point> {
    let mut ret = Vec::with_capacity(n1.segment_index - n0.segment_index + 2);
    // Vertex nodes take the original vertex, so that any `z` value survives.
    ret.push(if n0.is_interior() {
        n0.point
    } else {
        pts[n0.segment_index]
    });
    ret.extend_from_slice(&pts[n0.segment_index + 1..=n1.segment_index]);
    if n1.is_interior() {
        ret.push(n1.point);
    }
    ret
}

/// The sorted, de-duplicated nodes of one segment string.
///
/// The node list doesn't keep a reference to its string; the methods that need
/// the string's coordinates take them as an argument, and they must always be
/// passed the same coordinates.
#[derive(Clone, Debug, Default)]
pub struct SegmentNodeList {
    nodes: BTreeSet<SegmentNode>,
}

impl SegmentNodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The nodes, in order along the string.
    pub fn iter(&self) -> impl Iterator<Item = &SegmentNode> + '_ {
        self.nodes.iter()
    }

    /// Adds a node at `point`, which must lie on the segment starting at vertex
    /// `segment_index`.
    ///
    /// Adding a node that's already present does nothing.
    pub fn add(&mut self, pts: &[Point], point: Point, segment_index: usize) -> Result<()> {
        let mut segment_index = segment_index;
        if pts
            .get(segment_index + 1)
            .is_some_and(|next| point.eq_2d(next))
        {
            segment_index += 1;
        }
        let Some(start) = pts.get(segment_index) else {
            return Err(NodingError::InvariantViolation(format!(
                "node at {point:?} on segment {segment_index} of a string with {} points",
                pts.len()
            )));
        };

        let octant = if point.eq_2d(start) {
            None
        } else {
            match segment_octant(pts, segment_index)? {
                Some(oct) => Some(oct),
                None => {
                    return Err(NodingError::InvariantViolation(format!(
                        "interior node at {point:?} after the last vertex"
                    )))
                }
            }
        };

        let node = SegmentNode {
            point,
            segment_index,
            octant,
        };
        if self.nodes.insert(node) {
            tracing::trace!(?point, segment_index, "added node");
        }
        Ok(())
    }

    /// Makes sure that both ends of the string are nodes.
    ///
    /// The endpoints are inserted as they are, without moving them forward, so
    /// a string always has two distinct end nodes even if its first segment has
    /// zero length.
    pub fn add_endpoints(&mut self, pts: &[Point]) -> Result<()> {
        if pts.len() < 2 {
            return Err(NodingError::TooFewPoints(pts.len()));
        }
        let last = pts.len() - 1;
        for (point, segment_index) in [(pts[0], 0), (pts[last], last)] {
            self.nodes.insert(SegmentNode {
                point,
                segment_index,
                octant: None,
            });
        }
        Ok(())
    }

    /// Adds nodes at the tips of "collapses": places where the string goes out to
    /// a vertex and comes straight back.
    ///
    /// A collapse can either be present in the input (vertices `i` and `i + 2`
    /// are equal) or be created by noding (two nodes at the same place, with a
    /// single vertex between them). Either way, the vertex in the middle must
    /// become a node, or else the split edge around it would overlap itself.
    pub fn add_collapsed_nodes(&mut self, pts: &[Point]) -> Result<()> {
        let mut collapsed: Vec<usize> = self
            .nodes
            .iter()
            .zip(self.nodes.iter().skip(1))
            .filter_map(|(n0, n1)| collapse_index(n0, n1))
            .collect();

        collapsed.extend(
            pts.windows(3)
                .enumerate()
                .filter(|(_, w)| w[0].eq_2d(&w[2]))
                .map(|(i, _)| i + 1),
        );

        for idx in collapsed {
            tracing::trace!(idx, point = ?pts[idx], "adding collapse node");
            self.add(pts, pts[idx], idx)?;
        }
        Ok(())
    }

    /// Splits the string at its nodes, pushing the pieces onto `out`.
    ///
    /// Each piece runs from one node to the next, and carries a clone of `data`.
    pub fn add_split_edges<D: Clone>(
        &mut self,
        pts: &[Point],
        data: &D,
        out: &mut Vec<SegmentString<D>>,
    ) -> Result<()> {
        self.add_endpoints(pts)?;
        self.add_collapsed_nodes(pts)?;

        if self.nodes.len() < 2 {
            return Err(NodingError::InvariantViolation(format!(
                "a string needs at least 2 nodes to be split, found {}",
                self.nodes.len()
            )));
        }

        for (n0, n1) in self.nodes.iter().zip(self.nodes.iter().skip(1)) {
            out.push(SegmentString::new(
                split_edge_points(pts, n0, n1),
                data.clone(),
            )?);
        }
        Ok(())
    }

    /// The string's coordinates with every node inserted in its place.
    pub fn split_coordinates(&mut self, pts: &[Point]) -> Result<Vec<Point>> {
        self.add_endpoints(pts)?;

        let mut ret: Vec<Point> = Vec::with_capacity(pts.len() + self.nodes.len());
        for (n0, n1) in self.nodes.iter().zip(self.nodes.iter().skip(1)) {
            for p in split_edge_points(pts, n0, n1) {
                if ret.last().map_or(true, |last| !last.eq_2d(&p)) {
                    ret.push(p);
                }
            }
        }
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::tests::p;
    use assert_matches::assert_matches;

    fn pts(xys: &[(f64, f64)]) -> Vec<Point> {
        xys.iter().map(|&(x, y)| p(x, y)).collect()
    }

    fn split(pts: &[Point], nodes: &mut SegmentNodeList) -> Vec<Vec<Point>> {
        let mut out = Vec::new();
        nodes.add_split_edges(pts, &(), &mut out).unwrap();
        out.into_iter().map(|s| s.coordinates().to_vec()).collect()
    }

    #[test]
    fn nodes_at_segment_ends_are_normalized() {
        let line = pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        let mut nodes = SegmentNodeList::new();
        nodes.add(&line, p(5.0, 0.0), 0).unwrap();
        nodes.add(&line, p(5.0, 0.0), 1).unwrap();
        assert_eq!(nodes.len(), 1);

        let node = nodes.iter().next().unwrap();
        assert_eq!(node.segment_index, 1);
        assert!(!node.is_interior());
    }

    #[test]
    fn adding_is_idempotent() {
        let line = pts(&[(0.0, 0.0), (10.0, 0.0)]);
        let mut nodes = SegmentNodeList::new();
        for _ in 0..3 {
            nodes.add(&line, p(4.0, 0.0), 0).unwrap();
        }
        nodes.add(&line, p(4.0, 0.0).with_z(3.0).unwrap(), 0).unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn nodes_are_ordered_along_the_segment() {
        // Heading in the negative x direction, so the order of the nodes is the
        // reverse of their x order.
        let line = pts(&[(10.0, 1.0), (0.0, 0.0)]);
        let mut nodes = SegmentNodeList::new();
        nodes.add(&line, p(2.0, 0.2), 0).unwrap();
        nodes.add(&line, p(7.0, 0.7), 0).unwrap();
        nodes.add(&line, p(5.0, 0.5), 0).unwrap();
        nodes.add_endpoints(&line).unwrap();
        let xs: Vec<_> = nodes.iter().map(|n| n.point.xy().0).collect();
        assert_eq!(xs, vec![10.0, 7.0, 5.0, 2.0, 0.0]);
    }

    #[test]
    fn split_at_interior_node() {
        let line = pts(&[(0.0, 0.0), (10.0, 10.0)]);
        let mut nodes = SegmentNodeList::new();
        nodes.add(&line, p(5.0, 5.0), 0).unwrap();
        assert_eq!(
            split(&line, &mut nodes),
            vec![
                pts(&[(0.0, 0.0), (5.0, 5.0)]),
                pts(&[(5.0, 5.0), (10.0, 10.0)])
            ]
        );
    }

    #[test]
    fn split_keeps_intermediate_vertices() {
        let line = pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (4.0, 2.0), (4.0, 4.0)]);
        let mut nodes = SegmentNodeList::new();
        nodes.add(&line, p(2.0, 1.0), 1).unwrap();
        nodes.add(&line, p(4.0, 2.0), 2).unwrap();
        assert_eq!(
            split(&line, &mut nodes),
            vec![
                pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0)]),
                pts(&[(2.0, 1.0), (2.0, 2.0), (4.0, 2.0)]),
                pts(&[(4.0, 2.0), (4.0, 4.0)]),
            ]
        );
    }

    #[test]
    fn vertex_nodes_keep_z() {
        let line = vec![
            p(0.0, 0.0).with_z(1.0).unwrap(),
            p(1.0, 0.0).with_z(2.0).unwrap(),
            p(2.0, 0.0).with_z(3.0).unwrap(),
        ];
        let mut nodes = SegmentNodeList::new();
        nodes.add(&line, p(1.0, 0.0), 0).unwrap();
        let pieces = split(&line, &mut nodes);
        assert_eq!(pieces[0], line[..2].to_vec());
        assert_eq!(pieces[1], line[1..].to_vec());
    }

    #[test]
    fn spike_in_the_input_is_noded() {
        let spike = pts(&[(0.0, 0.0), (5.0, 0.0), (0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        let mut nodes = SegmentNodeList::new();
        nodes.add_endpoints(&spike).unwrap();
        nodes.add_collapsed_nodes(&spike).unwrap();

        let indices: Vec<_> = nodes.iter().map(|n| n.segment_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 4]);
        assert!(nodes.iter().all(|n| !n.is_interior()));
        assert!(nodes.iter().any(|n| n.segment_index == 2 && n.point.eq_2d(&p(0.0, 0.0))));

        assert_eq!(
            split(&spike, &mut nodes),
            vec![
                pts(&[(0.0, 0.0), (5.0, 0.0)]),
                pts(&[(5.0, 0.0), (0.0, 0.0)]),
                pts(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]),
            ]
        );
    }

    #[test]
    fn collapse_created_by_nodes() {
        // The string goes out to (4, 0) and comes back along the same line. The
        // node at (2, 0) on the way out and the one on the way back have the
        // single vertex (4, 0) between them.
        let line = pts(&[(0.0, 0.0), (4.0, 0.0), (0.0, 1.0)]);
        let mut nodes = SegmentNodeList::new();
        let back = p(2.0, 0.5);
        nodes.add(&line, p(2.0, 0.0), 0).unwrap();
        nodes.add(&line, back, 1).unwrap();
        nodes.add_collapsed_nodes(&line).unwrap();
        // Different points, so no collapse.
        assert_eq!(nodes.len(), 2);

        let line = pts(&[(0.0, 0.0), (4.0, 0.0), (0.0, 0.0), (0.0, 3.0)]);
        let mut nodes = SegmentNodeList::new();
        nodes.add(&line, p(2.0, 0.0), 0).unwrap();
        nodes.add(&line, p(2.0, 0.0), 1).unwrap();
        nodes.add_collapsed_nodes(&line).unwrap();
        assert!(nodes
            .iter()
            .any(|n| n.segment_index == 1 && !n.is_interior()));
    }

    #[test]
    fn split_coordinates_include_every_node() {
        let line = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]);
        let mut nodes = SegmentNodeList::new();
        nodes.add(&line, p(1.0, 0.0), 0).unwrap();
        nodes.add(&line, p(4.0, 0.0), 0).unwrap();
        nodes.add(&line, p(4.0, 3.0), 1).unwrap();
        assert_eq!(
            nodes.split_coordinates(&line).unwrap(),
            pts(&[(0.0, 0.0), (1.0, 0.0), (4.0, 0.0), (4.0, 3.0), (4.0, 4.0)])
        );
    }

    #[test]
    fn out_of_range_segment() {
        let line = pts(&[(0.0, 0.0), (4.0, 0.0)]);
        let mut nodes = SegmentNodeList::new();
        assert_matches!(
            nodes.add(&line, p(9.0, 9.0), 5),
            Err(NodingError::InvariantViolation(_))
        );
        assert_matches!(
            nodes.add(&line, p(9.0, 9.0), 1),
            Err(NodingError::InvariantViolation(_))
        );
    }

    #[test]
    fn zero_length_string_is_split_into_itself() {
        let line = pts(&[(1.0, 1.0), (1.0, 1.0)]);
        let mut nodes = SegmentNodeList::new();
        assert_eq!(split(&line, &mut nodes), vec![line.clone()]);
    }

    #[test]
    fn leading_zero_length_segment_is_kept() {
        let line = pts(&[(0.0, 0.0), (0.0, 0.0), (5.0, 0.0)]);
        let mut nodes = SegmentNodeList::new();
        assert_eq!(split(&line, &mut nodes), vec![line.clone()]);

        // A node at the repeated vertex lands after the zero-length segment.
        let mut nodes = SegmentNodeList::new();
        nodes.add(&line, p(0.0, 0.0), 0).unwrap();
        assert_eq!(
            split(&line, &mut nodes),
            vec![
                pts(&[(0.0, 0.0), (0.0, 0.0)]),
                pts(&[(0.0, 0.0), (5.0, 0.0)]),
            ]
        );
    }

    #[test]
    fn endpoints_need_two_points() {
        let mut nodes = SegmentNodeList::new();
        assert_matches!(
            nodes.add_endpoints(&pts(&[(1.0, 1.0)])),
            Err(NodingError::TooFewPoints(1))
        );
    }
}
