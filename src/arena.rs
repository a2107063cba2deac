//! The allocator engine, component E: `create`/`add`/`alloc`/`xalloc`/`free`/
//! `destroy`, the fit search, split, and coalesce steps.
//!
//! An [`Arena`] aggregates the other four components behind one
//! [`spin::Mutex`], the same `Locked<T>` style used elsewhere in this crate's
//! allocator family. Operations are non-cancellable and never suspend while
//! holding the lock. Keeps the crate buildable `no_std` against a kernel
//! source if one is ever layered underneath it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use spin::Mutex;

use crate::error::{AllocError, Result};
use crate::fit::{seg_fit, FitRequest};
use crate::flags::{FitPolicy, Flags};
use crate::freelist::FreeListIndex;
use crate::hash_index::AllocatedIndex;
use crate::pool::{HostedPool, SegmentPool};
use crate::segment::{Segment, SegmentId, SegmentKind, SegmentSlab};
use crate::source::SegmentSource;

/// Identifies an [`Arena`] for the sole purpose of detecting cyclic source
/// graphs at construction time. Ids are assigned
/// once, monotonically, and never reused, so an id can only reappear in its
/// own source chain through genuine caller misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaId(u64);

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

fn next_arena_id() -> ArenaId {
    ArenaId(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed))
}

fn round_up(value: usize, quantum: usize) -> usize {
    (value + quantum - 1) / quantum * quantum
}

struct ArenaInner {
    slab: SegmentSlab,
    address_list: crate::collections::slab_list::SlabList<crate::segment::AddressLinks>,
    free_list: FreeListIndex,
    allocated: AllocatedIndex,
}

impl ArenaInner {
    fn new() -> Self {
        ArenaInner {
            slab: SegmentSlab::new(),
            address_list: crate::collections::slab_list::SlabList::new(),
            free_list: FreeListIndex::new(),
            allocated: AllocatedIndex::new(),
        }
    }
}

/// A bounded universe of integer-addressed resources. See the
/// crate root docs for the overall design; this type is component E, the
/// engine that ties components A–D together.
pub struct Arena {
    id: ArenaId,
    name: String,
    quantum: usize,
    source: Option<Arc<dyn SegmentSource>>,
    pool: Arc<dyn SegmentPool>,
    /// Stored but not interpreted: the per-CPU quantum-cache layer is out of
    /// scope for this crate.
    qcache_max: usize,
    inner: Mutex<ArenaInner>,
}

/// Builder for [`Arena`].
pub struct ArenaBuilder {
    name: String,
    quantum: usize,
    source: Option<Arc<dyn SegmentSource>>,
    pool: Arc<dyn SegmentPool>,
    qcache_max: usize,
    initial_span: Option<(usize, usize)>,
}

impl ArenaBuilder {
    pub fn new(name: impl Into<String>, quantum: usize) -> Self {
        assert!(
            quantum.is_power_of_two(),
            "arena quantum must be a power of two"
        );
        ArenaBuilder {
            name: name.into(),
            quantum,
            source: None,
            pool: Arc::new(HostedPool),
            qcache_max: 0,
            initial_span: None,
        }
    }

    /// Install an initial span of `size` bytes starting at `base`, the way
    /// `create(name, base, size, ...)` does when `source` is null and
    /// `size > 0`.
    pub fn initial_span(mut self, base: usize, size: usize) -> Self {
        self.initial_span = Some((base, size));
        self
    }

    /// Supplies an upstream arena (or other extent provider) this arena
    /// imports from when its own free space is exhausted.
    pub fn source(mut self, source: Arc<dyn SegmentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Overrides the default [`HostedPool`] segment-record supplier, e.g.
    /// with a shared [`crate::pool::FreestandingPool`].
    pub fn pool(mut self, pool: Arc<dyn SegmentPool>) -> Self {
        self.pool = pool;
        self
    }

    /// Stored verbatim; the per-CPU quantum cache this would gate is out of
    /// scope for this crate.
    pub fn qcache_max(mut self, qcache_max: usize) -> Self {
        self.qcache_max = qcache_max;
        self
    }

    pub fn build(self) -> Arc<Arena> {
        let id = next_arena_id();
        if let Some(source) = &self.source {
            let chain = source.source_chain_ids();
            assert!(
                !chain.contains(&id),
                "arena {:?}: source graph would contain a cycle",
                self.name
            );
        }
        let arena = Arc::new(Arena {
            id,
            name: self.name,
            quantum: self.quantum,
            source: self.source,
            pool: self.pool,
            qcache_max: self.qcache_max,
            inner: Mutex::new(ArenaInner::new()),
        });
        if let Some((base, size)) = self.initial_span {
            if size > 0 {
                arena.add_span(base, size, false);
            }
        }
        arena
    }
}

impl Arena {
    pub fn builder(name: impl Into<String>, quantum: usize) -> ArenaBuilder {
        ArenaBuilder::new(name, quantum)
    }

    /// Convenience constructor matching the `create(name, base, size,
    /// quantum, ...)` shape for the common case of no source arena.
    pub fn create(name: impl Into<String>, base: usize, size: usize, quantum: usize) -> Arc<Arena> {
        Arena::builder(name, quantum).initial_span(base, size).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantum(&self) -> usize {
        self.quantum
    }

    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// This arena's id followed by the ids of every arena reachable through
    /// `source` links, used by [`ArenaBuilder::build`] to reject cycles.
    pub fn source_chain_ids(&self) -> Vec<ArenaId> {
        let mut chain = vec![self.id];
        if let Some(source) = &self.source {
            chain.extend(source.source_chain_ids());
        }
        chain
    }

    /// Installs a new span. **Precondition:** `[base, base
    /// + size)` must not overlap any existing span in this arena; violation
    /// is a caller bug, asserted rather than returned as an error.
    pub fn add(&self, base: usize, size: usize, _flags: Flags) {
        self.add_span(base, size, false);
    }

    fn add_span(&self, base: usize, size: usize, imported: bool) {
        assert!(size > 0, "arena {:?}: add: span size must be positive", self.name);
        let end = base
            .checked_add(size)
            .unwrap_or_else(|| panic!("arena {:?}: add: span overflows address space", self.name));

        let mut inner = self.inner.lock();

        let span_ids: Vec<SegmentId> = inner
            .address_list
            .iter(&inner.slab)
            .filter(|&id| inner.slab.get(id).kind == SegmentKind::Span)
            .collect();

        let mut anchor = None;
        for &id in &span_ids {
            let span = inner.slab.get(id);
            assert!(
                end <= span.base || base >= span.end(),
                "arena {:?}: add: span [{base:#x}, {end:#x}) overlaps existing span [{:#x}, {:#x})",
                self.name,
                span.base,
                span.end()
            );
            if span.base > base && anchor.is_none() {
                anchor = Some(id);
            }
        }

        self.pool.acquire();
        self.pool.acquire();

        let span_id = inner.slab.insert(Segment::new(base, size, SegmentKind::Span, imported));
        match anchor {
            Some(a) => inner.address_list.insert_before(&mut inner.slab, a, span_id),
            None => inner.address_list.push_back(&mut inner.slab, span_id),
        }

        let mut free_seg = Segment::new(base, size, SegmentKind::Free, false);
        free_seg.owner_span = Some(span_id);
        let free_id = inner.slab.insert(free_seg);
        inner.address_list.insert_after(&mut inner.slab, span_id, free_id);
        inner.free_list.insert(&mut inner.slab, free_id);

        log::debug!("arena {:?}: add span [{base:#x}, {end:#x}) imported={imported}", self.name);
    }

    /// Shorthand for `xalloc(size, 0, 0, 0, 0, 0, flags)`.
    pub fn alloc(&self, size: usize, flags: Flags) -> Result<usize> {
        self.xalloc(size, 0, 0, 0, 0, 0, flags)
    }

    /// The central operation. `align == 0` means `quantum`;
    /// `minaddr == 0 && maxaddr == 0` means unconstrained.
    #[allow(clippy::too_many_arguments)]
    pub fn xalloc(
        &self,
        size: usize,
        align: usize,
        phase: usize,
        nocross: usize,
        minaddr: usize,
        maxaddr: usize,
        flags: Flags,
    ) -> Result<usize> {
        assert!(size > 0, "arena {:?}: xalloc: size must be positive", self.name);
        let size = round_up(size, self.quantum);
        let align = if align == 0 { self.quantum } else { align };
        assert!(
            align.is_power_of_two() && align % self.quantum == 0,
            "arena {:?}: xalloc: align must be a power-of-two multiple of quantum",
            self.name
        );
        let policy = flags.fit_policy();

        if flags.contains(Flags::BOOTSTRAP) {
            self.pool.bootstrap();
        }

        let req = FitRequest {
            size,
            align,
            phase,
            nocross,
            minaddr,
            maxaddr,
        };

        {
            let mut inner = self.inner.lock();
            if let Some(addr) = self.try_alloc_locked(&mut inner, req, policy) {
                log::trace!("arena {:?}: xalloc({size:#x}) -> {addr:#x}", self.name);
                return Ok(addr);
            }
        }

        let Some(source) = &self.source else {
            log::warn!("arena {:?}: xalloc({size:#x}) exhausted, no source", self.name);
            return Err(AllocError);
        };

        let (base, imported_size) = source.import(size)?;
        log::debug!(
            "arena {:?}: imported [{base:#x}, {:#x}) from source",
            self.name,
            base + imported_size
        );
        self.add_span(base, imported_size, true);

        let mut inner = self.inner.lock();
        self.try_alloc_locked(&mut inner, req, policy).ok_or_else(|| {
            log::warn!(
                "arena {:?}: xalloc({size:#x}) exhausted even after import",
                self.name
            );
            AllocError
        })
    }

    /// Finds a fitting free segment and splits it, or returns `None` if
    /// nothing in the free-list index currently satisfies `req`. Does not
    /// touch the source arena; that retry lives in `xalloc`.
    fn try_alloc_locked(&self, inner: &mut ArenaInner, req: FitRequest, policy: FitPolicy) -> Option<usize> {
        let (seg_id, start) = match policy {
            FitPolicy::InstantFit => inner.free_list.find_instant_fit(&mut inner.slab, req),
            FitPolicy::BestFit => inner.free_list.find_best_fit(&mut inner.slab, req),
        }?;

        // Pre-acquire the worst case of two segment records (leading and
        // trailing split leftovers) before any arena state is mutated, so
        // `acquire` can never fail partway through a state transition.
        self.pool.acquire();
        self.pool.acquire();
        let mut consumed = 0usize;

        inner.free_list.remove(&mut inner.slab, seg_id);
        let owner_span = inner.slab.get(seg_id).owner_span;
        let seg_base = inner.slab.get(seg_id).base;

        if start > seg_base {
            let mut lead = Segment::new(seg_base, start - seg_base, SegmentKind::Free, false);
            lead.owner_span = owner_span;
            let lead_id = inner.slab.insert(lead);
            inner.address_list.insert_before(&mut inner.slab, seg_id, lead_id);
            inner.free_list.insert(&mut inner.slab, lead_id);
            consumed += 1;

            let seg = inner.slab.get_mut(seg_id);
            seg.size -= start - seg.base;
            seg.base = start;
        }

        let remaining = inner.slab.get(seg_id).size - req.size;
        if remaining >= self.quantum {
            let tail_base = start + req.size;
            let mut tail = Segment::new(tail_base, remaining, SegmentKind::Free, false);
            tail.owner_span = owner_span;
            let tail_id = inner.slab.insert(tail);
            inner.slab.get_mut(seg_id).size = req.size;
            inner.address_list.insert_after(&mut inner.slab, seg_id, tail_id);
            inner.free_list.insert(&mut inner.slab, tail_id);
            consumed += 1;
        }

        inner.slab.get_mut(seg_id).kind = SegmentKind::Allocated;
        inner.allocated.insert(start, seg_id);

        for _ in consumed..2 {
            self.pool.release();
        }

        log::trace!(
            "arena {:?}: split segment for [{start:#x}, {:#x}) ({consumed} leftover(s) carved)",
            self.name,
            start + req.size
        );

        Some(start)
    }

    /// Returns a previously allocated extent. Asserts
    /// `address` names a live allocation of `size` bytes (within quantum
    /// rounding); a caller passing an unknown address or mismatched size
    /// has a bug, not a recoverable error.
    pub fn free(&self, address: usize, size: usize) {
        let size = round_up(size, self.quantum);
        let mut inner = self.inner.lock();

        let seg_id = inner.allocated.remove(address).unwrap_or_else(|| {
            panic!(
                "arena {:?}: free: address {address:#x} is not allocated in this arena",
                self.name
            )
        });
        {
            let seg = inner.slab.get(seg_id);
            assert_eq!(
                seg.size, size,
                "arena {:?}: free: size mismatch at {address:#x} (allocated {}, freed {})",
                self.name, seg.size, size
            );
        }
        inner.slab.get_mut(seg_id).kind = SegmentKind::Free;

        let mut current = seg_id;

        if let Some(pred) = inner.address_list.predecessor(&inner.slab, current) {
            let mergeable = {
                let p = inner.slab.get(pred);
                let c = inner.slab.get(current);
                p.is_free() && p.owner_span == c.owner_span
            };
            if mergeable {
                let cur_size = inner.slab.get(current).size;
                inner.free_list.remove(&mut inner.slab, pred);
                inner.address_list.remove(&mut inner.slab, current);
                inner.slab.remove(current);
                self.pool.release();
                inner.slab.get_mut(pred).size += cur_size;
                current = pred;
            }
        }

        if let Some(succ) = inner.address_list.successor(&inner.slab, current) {
            let mergeable = {
                let s = inner.slab.get(succ);
                let c = inner.slab.get(current);
                s.is_free() && s.owner_span == c.owner_span
            };
            if mergeable {
                let succ_size = inner.slab.get(succ).size;
                inner.free_list.remove(&mut inner.slab, succ);
                inner.address_list.remove(&mut inner.slab, succ);
                inner.slab.remove(succ);
                self.pool.release();
                inner.slab.get_mut(current).size += succ_size;
            }
        }

        let owner_span = inner
            .slab
            .get(current)
            .owner_span
            .expect("non-span segment must carry an owner span");
        let (span_base, span_size, span_imported) = {
            let span = inner.slab.get(owner_span);
            (span.base, span.size, span.imported)
        };
        let cur = inner.slab.get(current);
        let covers_whole_span = cur.base == span_base && cur.size == span_size;

        if span_imported && covers_whole_span {
            inner.address_list.remove(&mut inner.slab, current);
            inner.slab.remove(current);
            self.pool.release();
            inner.address_list.remove(&mut inner.slab, owner_span);
            inner.slab.remove(owner_span);
            self.pool.release();

            if let Some(source) = &self.source {
                log::debug!(
                    "arena {:?}: releasing imported span [{span_base:#x}, {:#x}) to source",
                    self.name,
                    span_base + span_size
                );
                source.release(span_base, span_size);
            }
        } else {
            inner.free_list.insert(&mut inner.slab, current);
        }
    }

    /// Releases every imported span back to `source`, verifying there are
    /// no outstanding allocations first. Leaking live allocations into
    /// `destroy` is a caller bug, asserted here rather than
    /// silently leaked or turned into an error return.
    pub fn destroy(&self) {
        let mut inner = self.inner.lock();
        assert_eq!(
            inner.allocated.len(),
            0,
            "arena {:?}: destroy: {} allocation(s) still outstanding",
            self.name,
            inner.allocated.len()
        );

        let span_ids: Vec<SegmentId> = inner
            .address_list
            .iter(&inner.slab)
            .filter(|&id| inner.slab.get(id).kind == SegmentKind::Span)
            .collect();

        for span_id in span_ids {
            let span = inner.slab.get(span_id).clone();
            if span.imported {
                if let Some(source) = &self.source {
                    source.release(span.base, span.size);
                }
            }
        }
        log::debug!("arena {:?}: destroyed", self.name);
    }

    /// Diagnostic dump: one line per non-span segment (FREE or
    /// ALLOCATED) in address order, `[base, end] (kind)`, with an
    /// `(imported)` suffix when the segment's owning span was imported from
    /// `source`, followed by a listing of the allocated hash index. Spans
    /// are bookkeeping and are not dumped as their own line. Not bit-exact,
    /// for humans and tests, not a wire format.
    pub fn dump(&self) -> String {
        let inner = self.inner.lock();
        let segments: Vec<crate::dump::DumpSegment> = inner
            .address_list
            .iter(&inner.slab)
            .filter(|&id| inner.slab.get(id).kind != SegmentKind::Span)
            .map(|id| {
                let seg = inner.slab.get(id);
                let imported = seg
                    .owner_span
                    .map(|span_id| inner.slab.get(span_id).imported)
                    .unwrap_or(false);
                crate::dump::DumpSegment {
                    base: seg.base,
                    end: seg.end(),
                    kind: seg.kind,
                    imported,
                }
            })
            .collect();
        let mut bases: Vec<usize> = inner.allocated.iter().map(|(base, _)| base).collect();
        bases.sort_unstable();
        crate::dump::format(&self.name, self.quantum, &segments, &bases)
    }
}

/// Implemented on `Arena` itself, not `Arc<Arena>`, so that an `Arc<Arena>`
/// coerces to `Arc<dyn SegmentSource>` the same way any `Arc<T: Trait>`
/// does. Realizes the layered-arena pattern: a child arena's source is
/// simply another arena, with no hand-rolled adapter type.
impl SegmentSource for Arena {
    fn import(&self, size: usize) -> Result<(usize, usize)> {
        let base = self.alloc(size, Flags::INSTANT_FIT)?;
        Ok((base, round_up(size, self.quantum)))
    }

    fn release(&self, base: usize, size: usize) {
        self.free(base, size);
    }

    fn source_chain_ids(&self) -> Vec<ArenaId> {
        // Delegates to the inherent method of the same name.
        self.source_chain_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fit_no_split() {
        // Boundary scenario 1: arena [0x1000, 0x2000], quantum
        // 0x1000, alloc(0x1000) -> 0x1000; one ALLOCATED segment, zero FREE.
        let arena = Arena::create("exact", 0x1000, 0x1000, 0x1000);
        let addr = arena.alloc(0x1000, Flags::INSTANT_FIT).unwrap();
        assert_eq!(addr, 0x1000);
        let inner = arena.inner.lock();
        assert_eq!(inner.allocated.len(), 1);
        let free_count = inner
            .address_list
            .iter(&inner.slab)
            .filter(|&id| inner.slab.get(id).is_free())
            .count();
        assert_eq!(free_count, 0);
    }

    #[test]
    fn head_split() {
        // Boundary scenario 2: arena [0, 0x10000), quantum 0x100,
        // xalloc(size=0x1000, align=0x1000, phase=0x100) -> 0x100.
        let arena = Arena::create("head-split", 0, 0x10000, 0x100);
        let addr = arena
            .xalloc(0x1000, 0x1000, 0x100, 0, 0, 0, Flags::INSTANT_FIT)
            .unwrap();
        assert_eq!(addr, 0x100);

        let inner = arena.inner.lock();
        let mut segs: Vec<(usize, usize, bool)> = inner
            .address_list
            .iter(&inner.slab)
            .map(|id| {
                let s = inner.slab.get(id);
                (s.base, s.end(), s.is_free())
            })
            .collect();
        segs.sort();
        assert_eq!(segs, vec![(0, 0x100, true), (0x100, 0x1100, false), (0x1100, 0x10000, true)]);
    }

    #[test]
    fn tail_split() {
        // Boundary scenario 3: arena [0, 0x10000), quantum 0x1000,
        // alloc(0x1000) -> 0x0. ALLOCATED [0, 0x1000), FREE [0x1000, 0x10000).
        let arena = Arena::create("tail-split", 0, 0x10000, 0x1000);
        let addr = arena.alloc(0x1000, Flags::INSTANT_FIT).unwrap();
        assert_eq!(addr, 0);

        let inner = arena.inner.lock();
        assert!(inner.allocated.get(0).is_some());
        let mut segs: Vec<(usize, usize, bool)> = inner
            .address_list
            .iter(&inner.slab)
            .map(|id| {
                let s = inner.slab.get(id);
                (s.base, s.end(), s.is_free())
            })
            .collect();
        segs.sort();
        assert_eq!(segs, vec![(0, 0x1000, false), (0x1000, 0x10000, true)]);
    }

    #[test]
    fn coalesce_on_free() {
        // Boundary scenario 4: continues scenario 2, free(0x100, 0x1000) ->
        // single FREE segment [0x0, 0x10000); no ALLOCATED segments.
        let arena = Arena::create("coalesce", 0, 0x10000, 0x100);
        arena
            .xalloc(0x1000, 0x1000, 0x100, 0, 0, 0, Flags::INSTANT_FIT)
            .unwrap();
        arena.free(0x100, 0x1000);

        let inner = arena.inner.lock();
        assert_eq!(inner.allocated.len(), 0);
        let frees: Vec<(usize, usize)> = inner
            .address_list
            .iter(&inner.slab)
            .filter(|&id| inner.slab.get(id).is_free())
            .map(|id| {
                let s = inner.slab.get(id);
                (s.base, s.end())
            })
            .collect();
        assert_eq!(frees, vec![(0, 0x10000)]);
    }

    #[test]
    fn exhaustion_returns_err() {
        // Boundary scenario 5: arena [0, 0x1000), quantum 0x1000;
        // alloc(0x1000) succeeds, a second alloc(0x1000) fails with
        // AllocError.
        let arena = Arena::create("exhaust", 0, 0x1000, 0x1000);
        assert!(arena.alloc(0x1000, Flags::INSTANT_FIT).is_ok());
        assert_eq!(arena.alloc(0x1000, Flags::INSTANT_FIT), Err(AllocError));
    }

    #[test]
    fn alloc_then_free_restores_initial_layout() {
        let arena = Arena::create("round-trip", 0, 0x10000, 0x1000);
        let a = arena.alloc(0x1000, Flags::BEST_FIT).unwrap();
        let b = arena.alloc(0x2000, Flags::BEST_FIT).unwrap();
        let c = arena.alloc(0x1000, Flags::BEST_FIT).unwrap();
        arena.free(b, 0x2000);
        arena.free(a, 0x1000);
        arena.free(c, 0x1000);

        let inner = arena.inner.lock();
        assert_eq!(inner.allocated.len(), 0);
        let frees: Vec<(usize, usize)> = inner
            .address_list
            .iter(&inner.slab)
            .filter(|&id| inner.slab.get(id).is_free())
            .map(|id| {
                let s = inner.slab.get(id);
                (s.base, s.end())
            })
            .collect();
        assert_eq!(frees, vec![(0, 0x10000)]);
    }

    #[test]
    #[should_panic(expected = "overlaps existing span")]
    fn add_rejects_overlap() {
        let arena = Arena::create("overlap", 0, 0x1000, 0x100);
        arena.add(0x800, 0x1000, Flags::empty());
    }

    #[test]
    #[should_panic(expected = "is not allocated")]
    fn free_unknown_address_panics() {
        let arena = Arena::create("bad-free", 0, 0x1000, 0x100);
        arena.free(0x9999, 0x100);
    }

    #[test]
    fn layered_arena_imports_from_source() {
        let parent = Arena::create("parent", 0, 0x10000, 0x1000);
        let child = Arena::builder("child", 0x1000).source(parent.clone()).build();

        let addr = child.alloc(0x2000, Flags::INSTANT_FIT).unwrap();
        assert!(addr < 0x10000);

        child.free(addr, 0x2000);
        // The child released its only span fully back to the parent; no
        // outstanding allocations remain anywhere.
        child.destroy();
        parent.destroy();
    }

    #[test]
    #[should_panic(expected = "cycle")]
    fn cyclic_source_graph_rejected() {
        // A source graph can only cycle back to an id assigned before the
        // new arena exists, so simulate this with a source whose
        // `source_chain_ids` happens to already contain the id about to be
        // minted by racing two builds is not representable directly;
        // instead exercise the assertion path via a self-referential stub.
        struct SelfReferential(std::sync::OnceLock<ArenaId>);
        impl SegmentSource for SelfReferential {
            fn import(&self, _size: usize) -> Result<(usize, usize)> {
                Err(AllocError)
            }
            fn release(&self, _base: usize, _size: usize) {}
            fn source_chain_ids(&self) -> Vec<ArenaId> {
                vec![*self.0.get().unwrap()]
            }
        }

        let stub = Arc::new(SelfReferential(std::sync::OnceLock::new()));
        // Peek the id the next arena will be assigned without constructing
        // it, purely to make the stub's chain contain it.
        let next = NEXT_ARENA_ID.load(Ordering::Relaxed);
        stub.0.set(ArenaId(next)).unwrap();
        let _ = Arena::builder("cycle", 0x1000).source(stub).build();
    }
}
