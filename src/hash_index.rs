//! The allocated-segment hash index, component D: recovers a segment
//! record from its base address in O(1) during `free`.

use hashbrown::HashMap;

use crate::segment::SegmentId;

/// Keyed by `base`. Backed directly by `hashbrown::HashMap` with its
/// default `ahash` hasher. Resizes automatically.
pub(crate) struct AllocatedIndex {
    table: HashMap<usize, SegmentId>,
}

impl AllocatedIndex {
    pub fn new() -> Self {
        AllocatedIndex {
            table: HashMap::new(),
        }
    }

    pub fn insert(&mut self, base: usize, id: SegmentId) {
        let previous = self.table.insert(base, id);
        debug_assert!(
            previous.is_none(),
            "base {base:#x} was already present in the allocated index"
        );
    }

    /// Removes and returns the segment previously allocated at `base`, or
    /// `None` if `base` names no live allocation (a caller-bug condition the
    /// engine turns into a panic).
    pub fn remove(&mut self, base: usize) -> Option<SegmentId> {
        self.table.remove(&base)
    }

    pub fn get(&self, base: usize) -> Option<SegmentId> {
        self.table.get(&base).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, SegmentId)> + '_ {
        self.table.iter().map(|(&base, &id)| (base, id))
    }
}

impl Default for AllocatedIndex {
    fn default() -> Self {
        Self::new()
    }
}
