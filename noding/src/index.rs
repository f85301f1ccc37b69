//! An envelope-keyed spatial index, backed by an R-tree.

use rstar::{RTree, RTreeObject, AABB};

use crate::geom::Envelope;

#[derive(Clone, Debug)]
struct IndexedEnvelope<T> {
    envelope: AABB<[f64; 2]>,
    item: T,
}

impl<T> RTreeObject for IndexedEnvelope<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn aabb(env: &Envelope) -> AABB<[f64; 2]> {
    AABB::from_corners([env.min_x, env.min_y], [env.max_x, env.max_y])
}

/// Stores items by their envelopes, and finds the ones whose envelopes
/// intersect a query envelope.
#[derive(Clone, Debug)]
pub struct SpatialIndex<T> {
    tree: RTree<IndexedEnvelope<T>>,
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl<T> SpatialIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a balanced index from all the items at once.
    ///
    /// This is faster than repeated insertion, and gives a better tree.
    pub fn bulk_load(items: impl IntoIterator<Item = (Envelope, T)>) -> Self {
        let items = items
            .into_iter()
            .map(|(env, item)| IndexedEnvelope {
                envelope: aabb(&env),
                item,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    pub fn insert(&mut self, env: Envelope, item: T) {
        self.tree.insert(IndexedEnvelope {
            envelope: aabb(&env),
            item,
        });
    }

    /// All items whose envelopes intersect (or touch) `env`, in no particular order.
    pub fn query(&self, env: &Envelope) -> impl Iterator<Item = &T> + '_ {
        self.tree
            .locate_in_envelope_intersecting(&aabb(env))
            .map(|indexed| &indexed.item)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
