use std::cmp::Ordering;

use crate::geom::Point;

/// A coordinate sequence that compares equal to its own reversal.
///
/// Each sequence has a canonical direction: forwards if reading it forwards
/// is lexicographically no bigger than reading it backwards, and backwards
/// otherwise. Comparisons read both sequences in their canonical directions,
/// so a sequence and its reverse are interchangeable as keys.
///
/// Comparisons only look at `x` and `y`.
#[derive(Clone, Debug)]
pub struct OrientedCoordinateArray {
    pts: Vec<Point>,
    forward: bool,
}

/// Is reading `pts` forwards no bigger than reading it backwards?
fn orientation(pts: &[Point]) -> bool {
    pts.iter()
        .zip(pts.iter().rev())
        .take(pts.len() / 2)
        .map(|(p, q)| p.cmp_2d(q))
        .find(|ord| ord.is_ne())
        .map_or(true, Ordering::is_lt)
}

impl OrientedCoordinateArray {
    pub fn new(pts: Vec<Point>) -> Self {
        let forward = orientation(&pts);
        OrientedCoordinateArray { pts, forward }
    }

    pub fn coordinates(&self) -> &[Point] {
        &self.pts
    }

    pub fn into_coordinates(self) -> Vec<Point> {
        self.pts
    }

    /// Is the canonical direction the same as the stored direction?
    pub fn is_forward(&self) -> bool {
        self.forward
    }

    fn canonical(&self, i: usize) -> &Point {
        if self.forward {
            &self.pts[i]
        } else {
            &self.pts[self.pts.len() - 1 - i]
        }
    }
}

impl Ord for OrientedCoordinateArray {
    fn cmp(&self, other: &Self) -> Ordering {
        let common = self.pts.len().min(other.pts.len());
        (0..common)
            .map(|i| self.canonical(i).cmp_2d(other.canonical(i)))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| self.pts.len().cmp(&other.pts.len()))
    }
}

impl PartialOrd for OrientedCoordinateArray {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrientedCoordinateArray {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrientedCoordinateArray {}
