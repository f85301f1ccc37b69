//! Merging segment strings that have the same coordinates.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::oriented::OrientedCoordinateArray;
use crate::segment_string::SegmentString;

type Merger<'a, D> = Box<dyn FnMut(&mut SegmentString<D>, &SegmentString<D>, bool) + 'a>;

/// Removes duplicate segment strings.
///
/// Two strings are duplicates if they have the same coordinates, in either
/// direction. Noding typically produces lots of duplicates: wherever two
/// inputs overlap, each of them contributes a copy of the shared piece.
///
/// The first string seen with a given set of coordinates is kept. When a
/// duplicate turns up, it is passed to the merger (if there is one) together
/// with the kept string, so that the caller can combine their data. The third
/// argument to the merger says whether the two strings run in the same direction.
pub struct SegmentStringDissolver<'a, D> {
    merger: Option<Merger<'a, D>>,
    strings: BTreeMap<OrientedCoordinateArray, SegmentString<D>>,
}

impl<D> Default for SegmentStringDissolver<'_, D> {
    fn default() -> Self {
        SegmentStringDissolver {
            merger: None,
            strings: BTreeMap::new(),
        }
    }
}

impl<'a, D> SegmentStringDissolver<'a, D> {
    /// A dissolver that throws duplicates away.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_merger(
        merger: impl FnMut(&mut SegmentString<D>, &SegmentString<D>, bool) + 'a,
    ) -> Self {
        SegmentStringDissolver {
            merger: Some(Box::new(merger)),
            strings: BTreeMap::new(),
        }
    }

    pub fn dissolve_one(&mut self, string: SegmentString<D>) {
        let key = OrientedCoordinateArray::new(string.coordinates().to_vec());
        match self.strings.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(string);
            }
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                let same_orientation = existing.num_points() == string.num_points()
                    && existing
                        .coordinates()
                        .iter()
                        .zip(string.coordinates())
                        .all(|(p, q)| p.eq_2d(q));
                tracing::trace!(%string, same_orientation, "merging duplicate string");
                if let Some(merge) = &mut self.merger {
                    merge(existing, &string, same_orientation);
                }
            }
        }
    }

    pub fn dissolve(&mut self, strings: impl IntoIterator<Item = SegmentString<D>>) {
        for s in strings {
            self.dissolve_one(s);
        }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// The distinct strings seen so far, in a canonical order.
    pub fn result(&self) -> impl Iterator<Item = &SegmentString<D>> + '_ {
        self.strings.values()
    }

    pub fn into_result(self) -> Vec<SegmentString<D>> {
        self.strings.into_values().collect()
    }
}
