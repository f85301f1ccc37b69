use thiserror::Error;

use crate::geom::Point;

/// Everything that can go wrong while noding.
///
/// None of these are recoverable mid-computation: a partially-noded set of
/// strings is not a useful intermediate result, so noders bail out on the
/// first error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NodingError {
    /// At least one of the input coordinates was not a number.
    #[error("coordinate is NaN")]
    NaN,

    /// At least one of the input coordinates was infinite.
    #[error("coordinate is infinite")]
    Infinity,

    /// An octant was requested for a zero-length displacement.
    ///
    /// This usually means that a string has two equal consecutive
    /// coordinates and something needed the direction of the segment
    /// between them.
    #[error("cannot classify the direction of a zero-length vector")]
    DegenerateVector,

    /// Segment strings need at least two points.
    #[error("segment string needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    /// A scaled noder was given a scale factor it can't work with.
    #[error("scale factor must be finite and positive, got {0}")]
    InvalidScale(f64),

    /// `compute_nodes` was called twice on the same noder.
    #[error("noder has already computed nodes; use a fresh instance")]
    NoderReused,

    /// Some internal invariant of the node list didn't hold.
    #[error("noding invariant violated: {0}")]
    InvariantViolation(String),

    /// A validator found two strings that aren't properly noded.
    #[error("found non-noded {reason} at {point:?}")]
    NotNoded {
        /// Where the problem is.
        point: Point,
        /// What kind of problem it is.
        reason: &'static str,
    },
}

/// Convenience type alias for results using [`NodingError`].
pub type Result<T> = std::result::Result<T, NodingError>;
