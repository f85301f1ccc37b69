use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{NodingError, Result};
use crate::geom::Point;

/// One of the eight 45° sectors that a direction vector can point into.
///
/// Sectors are numbered counter-clockwise starting from the positive `x`
/// axis. Every boundary direction belongs to exactly one sector:
///
/// ```text
///  0: [  0°,  45°]    4: [180°, 225°]
///  1: ( 45°,  90°]    5: (225°, 270°]
///  2: ( 90°, 135°]    6: (270°, 315°]
///  3: (135°, 180°)    7: (315°, 360°)
/// ```
///
/// so a diagonal always goes to the lower-numbered of its two neighbors, and
/// a vector and its negation are always exactly four sectors apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Octant(u8);

impl Octant {
    /// Classifies the direction of the vector `(dx, dy)`.
    pub fn classify(dx: f64, dy: f64) -> Result<Octant> {
        if dx == 0.0 && dy == 0.0 {
            return Err(NodingError::DegenerateVector);
        }
        if dx.is_nan() || dy.is_nan() {
            return Err(NodingError::NaN);
        }

        let adx = dx.abs();
        let ady = dy.abs();
        // Quadrants are half-open, so that negating the vector always moves
        // it into the opposite quadrant.
        let sector = if dx > 0.0 && dy >= 0.0 {
            if adx >= ady {
                0
            } else {
                1
            }
        } else if dx <= 0.0 && dy > 0.0 {
            if dx == 0.0 {
                1
            } else if adx > ady {
                3
            } else {
                2
            }
        } else if dx < 0.0 && dy <= 0.0 {
            if adx >= ady {
                4
            } else {
                5
            }
        } else if dx == 0.0 {
            5
        } else if adx > ady {
            7
        } else {
            6
        };
        Ok(Octant(sector))
    }

    /// Classifies the direction from `p0` to `p1`.
    pub fn between(p0: &Point, p1: &Point) -> Result<Octant> {
        let (x0, y0) = p0.xy();
        let (x1, y1) = p1.xy();
        Octant::classify(x1 - x0, y1 - y0)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Compares two points lying on a segment whose direction is in this
    /// octant, according to how far along the segment they are.
    ///
    /// The dominant axis of the octant decides; the other axis only matters
    /// for points that agree on the dominant one.
    pub fn compare_along(self, p0: &Point, p1: &Point) -> Ordering {
        if p0.eq_2d(p1) {
            return Ordering::Equal;
        }

        let x = p0.x.cmp(&p1.x);
        let y = p0.y.cmp(&p1.y);
        let (first, second) = match self.0 {
            0 => (x, y),
            1 => (y, x),
            2 => (y, x.reverse()),
            3 => (x.reverse(), y),
            4 => (x.reverse(), y.reverse()),
            5 => (y.reverse(), x.reverse()),
            6 => (y.reverse(), x),
            _ => (x, y.reverse()),
        };
        first.then(second)
    }
}

impl std::fmt::Display for Octant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
