use crate::error::Result;
use crate::intersector::{IntersectionAdder, SegmentIntersector, SegmentRef};
use crate::segment_string::{noded_substrings, SegmentString};

use super::{mark_used, Noder};

/// Tests every segment against every other segment.
///
/// This is quadratic in the total number of segments, so it's only suitable for
/// small inputs. It's mainly useful as a reference for checking the faster noders.
#[derive(Clone, Debug)]
pub struct SimpleNoder<D, I = IntersectionAdder> {
    intersector: I,
    strings: Vec<SegmentString<D>>,
    used: bool,
}

impl<D, I: SegmentIntersector> SimpleNoder<D, I> {
    pub fn new(intersector: I) -> Self {
        SimpleNoder {
            intersector,
            strings: Vec::new(),
            used: false,
        }
    }

    pub fn intersector(&self) -> &I {
        &self.intersector
    }

    pub fn into_intersector(self) -> I {
        self.intersector
    }
}

impl<D, I: SegmentIntersector + Default> Default for SimpleNoder<D, I> {
    fn default() -> Self {
        Self::new(I::default())
    }
}

impl<D: Clone, I: SegmentIntersector> Noder<D> for SimpleNoder<D, I> {
    fn compute_nodes(&mut self, strings: Vec<SegmentString<D>>) -> Result<()> {
        mark_used(&mut self.used)?;
        self.strings = strings;

        let strings = &mut self.strings;
        'outer: for i in 0..strings.len() {
            for j in 0..strings.len() {
                for seg0 in 0..strings[i].num_segments() {
                    for seg1 in 0..strings[j].num_segments() {
                        self.intersector.process_intersections(
                            strings,
                            SegmentRef::new(i, seg0),
                            SegmentRef::new(j, seg1),
                        )?;
                        if self.intersector.is_done() {
                            break 'outer;
                        }
                    }
                }
            }
        }

        tracing::debug!(strings = strings.len(), "simple noding finished");
        Ok(())
    }

    fn noded_substrings(&mut self) -> Result<Vec<SegmentString<D>>> {
        noded_substrings(std::mem::take(&mut self.strings))
    }
}
