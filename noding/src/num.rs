//! Exact rational arithmetic, for the places where floating point isn't good enough.

use malachite::num::conversion::traits::RoundingFrom;
use malachite::rounding_modes::RoundingMode;
use malachite::Rational;

use crate::error::{NodingError, Result};
use crate::geom::Point;

/// A point with rational coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExactPoint {
    pub x: Rational,
    pub y: Rational,
}

impl ExactPoint {
    // Rational::try_from(f64) fails on NaN (impossible because we use NotNan)
    // and infinity (impossible because `Point` rejects them, but we check anyway).
    pub fn new(p: &Point) -> Result<Self> {
        let (x, y) = p.xy();
        Ok(ExactPoint {
            x: Rational::try_from(x).map_err(|_| NodingError::Infinity)?,
            y: Rational::try_from(y).map_err(|_| NodingError::Infinity)?,
        })
    }

    pub fn affine(&self, other: &ExactPoint, t: &Rational) -> ExactPoint {
        let one = Rational::from(1);
        ExactPoint {
            x: (&one - t) * &self.x + t * &other.x,
            y: (&one - t) * &self.y + t * &other.y,
        }
    }

    /// Rounds to the nearest representable point.
    pub fn round(&self) -> Result<Point> {
        Point::try_new(nearest_f64(&self.x), nearest_f64(&self.y))
    }
}

impl<'a> std::ops::Sub<&'a ExactPoint> for &'a ExactPoint {
    type Output = ExactVector;

    fn sub(self, rhs: &'a ExactPoint) -> ExactVector {
        ExactVector {
            x: &self.x - &rhs.x,
            y: &self.y - &rhs.y,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExactVector {
    pub x: Rational,
    pub y: Rational,
}

impl ExactVector {
    pub fn cross(&self, other: &ExactVector) -> Rational {
        &self.x * &other.y - &self.y * &other.x
    }
}

/// Rounds a rational to the nearest `f64`, ties to even.
pub fn nearest_f64(x: &Rational) -> f64 {
    f64::rounding_from(x, RoundingMode::Nearest).0
}
