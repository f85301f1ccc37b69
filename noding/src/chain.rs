//! Monotone chains: maximal runs of a string's segments that all head into the same
//! quadrant.
//!
//! Since a monotone chain can't turn back on itself, the envelope of any sub-run
//! is just the envelope of its two end vertices. That makes it cheap to
//! narrow down which segments of two chains can possibly meet, by bisecting
//! both chains and discarding halves whose envelopes don't overlap.

use crate::geom::{Envelope, Point};

/// The quadrant of the direction from `p0` to `p1`, numbered counter-clockwise
/// from the positive `x` axis. Only meaningful for distinct points.
fn quadrant(p0: &Point, p1: &Point) -> u8 {
    let east = p1.x >= p0.x;
    let north = p1.y >= p0.y;
    match (east, north) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

/// Finds the last vertex of the chain starting at vertex `start`.
///
/// Zero-length segments can't be assigned a quadrant, so they are skipped when
/// deciding the chain's direction but still included in the chain.
fn find_chain_end(pts: &[Point], start: usize) -> usize {
    let last_idx = pts.len() - 1;
    let mut safe_start = start;
    while safe_start < last_idx && pts[safe_start].eq_2d(&pts[safe_start + 1]) {
        safe_start += 1;
    }
    if safe_start >= last_idx {
        return last_idx;
    }

    let chain_quad = quadrant(&pts[safe_start], &pts[safe_start + 1]);
    let mut last = start + 1;
    while last < pts.len() {
        let [p, q] = [&pts[last - 1], &pts[last]];
        if !p.eq_2d(q) && quadrant(p, q) != chain_quad {
            break;
        }
        last += 1;
    }
    last - 1
}

/// A monotone run of segments of one segment string.
#[derive(Clone, Debug)]
pub struct MonotoneChain {
    /// The index of the owning string, in whatever collection of strings is being noded.
    pub string: usize,
    /// The first vertex of the chain.
    pub start: usize,
    /// The last vertex of the chain (inclusive).
    pub end: usize,
    pub envelope: Envelope,
    /// An identifier, unique among the chains being compared against one another.
    pub id: usize,
}

impl MonotoneChain {
    /// Splits a string's coordinates into monotone chains.
    ///
    /// The chains get consecutive ids starting from `first_id`.
    pub fn build(string: usize, pts: &[Point], first_id: usize) -> Vec<MonotoneChain> {
        let mut chains = Vec::new();
        if pts.len() < 2 {
            return chains;
        }

        let mut start = 0;
        loop {
            let end = find_chain_end(pts, start);
            chains.push(MonotoneChain {
                string,
                start,
                end,
                envelope: Envelope::from_points(&pts[start], &pts[end]),
                id: first_id + chains.len(),
            });
            start = end;
            if start >= pts.len() - 1 {
                break;
            }
        }
        chains
    }

    pub fn num_segments(&self) -> usize {
        self.end - self.start
    }

    /// Finds the pairs of segments (one from each chain) whose envelopes overlap,
    /// after expanding them by `tolerance`.
    ///
    /// `pts` must be the coordinates of this chain's string, and `other_pts` those of
    /// `other`'s string. Segments are identified by the index of their first vertex.
    /// Every pair of segments is reported at most once.
    pub fn overlapping_segments(
        &self,
        pts: &[Point],
        other: &MonotoneChain,
        other_pts: &[Point],
        tolerance: f64,
    ) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut search = OverlapSearch {
            pts0: pts,
            pts1: other_pts,
            tolerance,
            out: &mut out,
        };
        search.compute(self.start, self.end, other.start, other.end);
        out
    }
}

struct OverlapSearch<'a> {
    pts0: &'a [Point],
    pts1: &'a [Point],
    tolerance: f64,
    out: &'a mut Vec<(usize, usize)>,
}

impl OverlapSearch<'_> {
    fn overlaps(&self, start0: usize, end0: usize, start1: usize, end1: usize) -> bool {
        let env0 = Envelope::from_points(&self.pts0[start0], &self.pts0[end0]);
        let env1 = Envelope::from_points(&self.pts1[start1], &self.pts1[end1]);
        env0.expanded_by(self.tolerance).intersects(&env1)
    }

    fn compute(&mut self, start0: usize, end0: usize, start1: usize, end1: usize) {
        if !self.overlaps(start0, end0, start1, end1) {
            return;
        }

        if end0 - start0 == 1 && end1 - start1 == 1 {
            self.out.push((start0, start1));
            return;
        }

        let mid0 = (start0 + end0) / 2;
        let mid1 = (start1 + end1) / 2;

        if start0 < mid0 {
            if start1 < mid1 {
                self.compute(start0, mid0, start1, mid1);
            }
            if mid1 < end1 {
                self.compute(start0, mid0, mid1, end1);
            }
        }
        if mid0 < end0 {
            if start1 < mid1 {
                self.compute(mid0, end0, start1, mid1);
            }
            if mid1 < end1 {
                self.compute(mid0, end0, mid1, end1);
            }
        }
    }
}
