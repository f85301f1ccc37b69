//! Computing the full set of intersections ("nodes") between polylines, and
//! splitting the polylines at those nodes.
//!
//! The input is a collection of [`SegmentString`]s, each carrying some data of
//! the caller's choosing. A [`Noder`] finds pairs of segments that might
//! intersect and hands them to a [`SegmentIntersector`], which records the
//! intersections in each string's [`SegmentNodeList`]. Finally the strings are
//! split at their nodes, so that no two of the resulting pieces cross, overlap
//! partially, or touch except at their endpoints.
//!
//! ```
//! use noding::{IntersectionAdder, McIndexNoder, Noder, SegmentString};
//!
//! let strings = vec![
//!     SegmentString::from_xy([(0.0, 0.0), (10.0, 10.0)], "a")?,
//!     SegmentString::from_xy([(0.0, 10.0), (10.0, 0.0)], "b")?,
//! ];
//! let mut noder = McIndexNoder::new(IntersectionAdder::new());
//! let pieces = noder.node(strings)?;
//! assert_eq!(pieces.len(), 4);
//! # Ok::<(), noding::NodingError>(())
//! ```

mod chain;
mod config;
mod dissolver;
mod error;
mod geom;
mod index;
mod intersector;
mod line_intersector;
mod node_list;
mod noder;
mod num;
mod octant;
mod oriented;
mod segment_string;
mod validator;

pub use chain::MonotoneChain;
pub use config::NoderConfig;
pub use dissolver::SegmentStringDissolver;
pub use error::{NodingError, Result};
pub use geom::{Envelope, Point};
pub use index::SpatialIndex;
pub use intersector::{
    InteriorIntersectionFinder, IntersectionAdder, IntersectionStats, SegmentIntersector,
    SegmentRef,
};
pub use line_intersector::{LineIntersection, LineIntersector, RobustLineIntersector};
pub use node_list::{SegmentNode, SegmentNodeList};
pub use noder::{McIndexNoder, Noder, ScaledNoder, SimpleNoder};
pub use octant::Octant;
pub use oriented::OrientedCoordinateArray;
pub use segment_string::{noded_substrings, SegmentString};
pub use validator::NodingValidator;
