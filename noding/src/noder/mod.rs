//! Noders: the strategies that decide which pairs of segments get tested for
//! intersection.
//!
//! Every noder hands its candidate pairs to a [`SegmentIntersector`](crate::SegmentIntersector),
//! which does the actual work of computing intersections and recording nodes.
//! Noders differ only in how many pairs they bother testing.

mod mc_index;
mod scaled;
mod simple;

pub use mc_index::McIndexNoder;
pub use scaled::ScaledNoder;
pub use simple::SimpleNoder;

use crate::error::{NodingError, Result};
use crate::segment_string::SegmentString;

/// Computes the nodes of a collection of segment strings, and splits the strings at them.
///
/// A noder is single-use: it takes ownership of its input in
/// [`compute_nodes`](Noder::compute_nodes) and gives back the pieces in
/// [`noded_substrings`](Noder::noded_substrings).
pub trait Noder<D> {
    /// Finds the intersections between the strings (and within each string).
    ///
    /// Returns [`NodingError::NoderReused`] if called more than once.
    fn compute_nodes(&mut self, strings: Vec<SegmentString<D>>) -> Result<()>;

    /// The strings from the last call to `compute_nodes`, split at their nodes.
    ///
    /// The strings are moved out of the noder, so a second call returns nothing.
    fn noded_substrings(&mut self) -> Result<Vec<SegmentString<D>>>;

    /// Computes nodes and splits in one go.
    fn node(&mut self, strings: Vec<SegmentString<D>>) -> Result<Vec<SegmentString<D>>> {
        self.compute_nodes(strings)?;
        self.noded_substrings()
    }
}

impl<D, N: Noder<D> + ?Sized> Noder<D> for Box<N> {
    fn compute_nodes(&mut self, strings: Vec<SegmentString<D>>) -> Result<()> {
        (**self).compute_nodes(strings)
    }

    fn noded_substrings(&mut self) -> Result<Vec<SegmentString<D>>> {
        (**self).noded_substrings()
    }
}

fn mark_used(used: &mut bool) -> Result<()> {
    if std::mem::replace(used, true) {
        Err(NodingError::NoderReused)
    } else {
        Ok(())
    }
}
