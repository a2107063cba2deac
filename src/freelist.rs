//! The free-list index, component C: 64 buckets, one per bit of a machine
//! word, `bucket_of(size) = floor(log2(size))`.

use crate::collections::slab_list::SlabList;
use crate::fit::{seg_fit, FitRequest};
use crate::segment::{FreeLinks, SegmentId, SegmentSlab};

pub(crate) const BUCKET_COUNT: usize = usize::BITS as usize;

pub(crate) fn bucket_of(size: usize) -> usize {
    debug_assert!(size > 0);
    let bucket = usize::BITS - 1 - size.leading_zeros();
    (bucket as usize).min(BUCKET_COUNT - 1)
}

pub(crate) struct FreeListIndex {
    buckets: Vec<SlabList<FreeLinks>>,
}

impl FreeListIndex {
    pub fn new() -> Self {
        FreeListIndex {
            buckets: (0..BUCKET_COUNT).map(|_| SlabList::new()).collect(),
        }
    }

    pub fn insert(&mut self, slab: &mut SegmentSlab, id: SegmentId) {
        let bucket = bucket_of(slab.get(id).size);
        self.buckets[bucket].push_front(slab, id);
    }

    pub fn remove(&mut self, slab: &mut SegmentSlab, id: SegmentId) {
        let bucket = bucket_of(slab.get(id).size);
        self.buckets[bucket].remove(slab, id);
    }

    /// Instant-fit: every member of bucket `i` is only guaranteed to be
    /// `>= 2^i`, not necessarily `>= size`, unless `size` is itself an exact
    /// power of two. Only bucket `bucket_of(size) + 1` guarantees every
    /// member is large enough on its own, so this scans upward from there
    /// first, taking the first candidate that survives `seg_fit`, and only
    /// falls back to a linear scan of the exact class `bucket_of(size)` if
    /// nothing upstream fit.
    pub fn find_instant_fit(
        &mut self,
        slab: &mut SegmentSlab,
        req: FitRequest,
    ) -> Option<(SegmentId, usize)> {
        let exact_bucket = bucket_of(req.size);
        let guaranteed_start = (exact_bucket + 1).min(BUCKET_COUNT);
        for bucket in &self.buckets[guaranteed_start..] {
            if bucket.is_empty() {
                continue;
            }
            for id in bucket.iter(slab) {
                let seg = slab.get(id);
                if let Some(start) = seg_fit(seg.base, seg.size, req) {
                    return Some((id, start));
                }
            }
        }
        for id in self.buckets[exact_bucket].iter(slab) {
            let seg = slab.get(id);
            if let Some(start) = seg_fit(seg.base, seg.size, req) {
                return Some((id, start));
            }
        }
        None
    }

    /// Best-fit: within each bucket from lowest to highest, scan every
    /// segment and keep the smallest that admits a fit; stop at the first
    /// bucket that yields one.
    pub fn find_best_fit(
        &mut self,
        slab: &mut SegmentSlab,
        req: FitRequest,
    ) -> Option<(SegmentId, usize)> {
        let start_bucket = bucket_of(req.size);
        for bucket in &self.buckets[start_bucket..] {
            if bucket.is_empty() {
                continue;
            }
            let mut best: Option<(SegmentId, usize, usize)> = None; // (id, start, size)
            for id in bucket.iter(slab) {
                let seg = slab.get(id);
                if let Some(start) = seg_fit(seg.base, seg.size, req) {
                    if best.map_or(true, |(_, _, best_size)| seg.size < best_size) {
                        best = Some((id, start, seg.size));
                    }
                }
            }
            if let Some((id, start, _)) = best {
                return Some((id, start));
            }
        }
        None
    }
}

impl Default for FreeListIndex {
    fn default() -> Self {
        Self::new()
    }
}
