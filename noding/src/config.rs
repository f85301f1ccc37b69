use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::intersector::IntersectionAdder;
use crate::noder::{McIndexNoder, Noder, ScaledNoder, SimpleNoder};

/// A description of a noding strategy, for choosing one at runtime.
///
/// Every strategy built from a config records intersections with an
/// [`IntersectionAdder`] using exact predicates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum NoderConfig {
    /// See [`SimpleNoder`].
    Simple,
    /// See [`McIndexNoder`].
    McIndex {
        #[serde(default)]
        overlap_tolerance: f64,
    },
    /// See [`ScaledNoder`].
    Scaled {
        scale: f64,
        #[serde(default)]
        offset_x: f64,
        #[serde(default)]
        offset_y: f64,
        inner: Box<NoderConfig>,
    },
}

impl Default for NoderConfig {
    fn default() -> Self {
        NoderConfig::McIndex {
            overlap_tolerance: 0.0,
        }
    }
}

impl NoderConfig {
    pub fn build<D: Clone + 'static>(&self) -> Result<Box<dyn Noder<D>>> {
        Ok(match self {
            NoderConfig::Simple => Box::new(SimpleNoder::<D, _>::new(IntersectionAdder::new())),
            NoderConfig::McIndex { overlap_tolerance } => Box::new(
                McIndexNoder::<D, _>::new(IntersectionAdder::new())
                    .with_overlap_tolerance(*overlap_tolerance),
            ),
            NoderConfig::Scaled {
                scale,
                offset_x,
                offset_y,
                inner,
            } => Box::new(
                ScaledNoder::new(inner.build::<D>()?, *scale)?.with_offset(*offset_x, *offset_y),
            ),
        })
    }
}
