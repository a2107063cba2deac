//! The segment pool, component A: supplies and recycles the budget of
//! segment records an arena is allowed to mutate into existence, so that
//! `xalloc`'s split step can never fail partway through having already
//! published part of its new state.
//!
//! The actual `Segment` storage always lives in each arena's own
//! [`crate::segment::SegmentSlab`], which grows by asking the host
//! allocator for more `Vec` capacity. This crate is hosted, not `no_std`, so
//! there is no separate raw-page arena to carve typed records out of.
//! What the two [`SegmentPool`] realizations differ on is *admission*: do we
//! treat the host heap as unconditionally able to supply one more record
//! (`HostedPool`), or do we account against a shared, low-water-marked
//! budget before admitting the mutation (`FreestandingPool`), gating on an
//! explicit reserve count rather than trusting the host heap from the very
//! first allocation.

use spin::Mutex;

/// A source of segment-record budget. `acquire` must never fail once
/// `bootstrap` (if required) has run; `release` never fails.
pub trait SegmentPool: Send + Sync {
    /// Reserve budget for one more segment record.
    fn acquire(&self);
    /// Return budget for one segment record.
    fn release(&self);
    /// One-time, idempotent setup. Hosted pools ignore this.
    fn bootstrap(&self);
    /// Records currently held in reserve, or `None` if this pool doesn't
    /// track a bounded reserve (the hosted pool trusts the host heap).
    fn reserve_len(&self) -> Option<usize>;
}

/// Treats the host heap as the record supply: `acquire`/`release` are
/// no-ops, since `SegmentSlab` already grows and recycles its own `Vec`
/// storage directly against the global allocator. This is the default pool
/// `Arena::create` uses.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostedPool;

impl SegmentPool for HostedPool {
    fn acquire(&self) {}
    fn release(&self) {}
    fn bootstrap(&self) {}
    fn reserve_len(&self) -> Option<usize> {
        None
    }
}

/// Supplies a source of freshly allocated storage to a [`FreestandingPool`]
/// when its reserve runs low. Implementations may hand back
/// however many bytes they like; `FreestandingPool` only inspects the
/// length to decide how many records' worth of budget it bought.
pub trait PageSource: Send + Sync {
    fn alloc_pages(&self, n: usize) -> Vec<u8>;
}

/// Below this many records in reserve, the next `acquire` triggers a refill.
pub const NFREESEGS_MIN: usize = 8;

/// Bootstrap installs this many records before any arena using this pool
/// may operate.
pub const BOOTSTRAP_RESERVE: usize = 128;

/// Each refill asks the page source for one page and treats it as good for
/// this many records.
pub const REFILL_RECORDS: usize = 64;

struct FreestandingState {
    free_count: usize,
    bootstrapped: bool,
}

impl FreestandingState {
    const fn new() -> Self {
        FreestandingState {
            free_count: 0,
            bootstrapped: false,
        }
    }
}

/// Process-global accounting for the freestanding realization of component
/// A. Guarded by its own lock, never the arena's, so that a refill
/// triggered while a `BOOTSTRAP`-flagged arena operation is in flight cannot
/// deadlock against that arena's own lock.
///
/// Cloning shares the same underlying reserve: construct one
/// `FreestandingPool` and pass clones to every arena that should draw from
/// the same budget, giving a process-wide reserve without requiring a
/// literal `static` singleton that every process can only ever have one of.
pub struct FreestandingPool {
    state: std::sync::Arc<Mutex<FreestandingState>>,
    page_source: std::sync::Arc<dyn PageSource>,
}

impl Clone for FreestandingPool {
    fn clone(&self) -> Self {
        FreestandingPool {
            state: self.state.clone(),
            page_source: self.page_source.clone(),
        }
    }
}

impl FreestandingPool {
    pub fn new(page_source: impl PageSource + 'static) -> Self {
        FreestandingPool {
            state: std::sync::Arc::new(Mutex::new(FreestandingState::new())),
            page_source: std::sync::Arc::new(page_source),
        }
    }

    /// Contacts the page source for `pages` pages, each treated as good for
    /// `REFILL_RECORDS` records, and credits the reserve. The actual byte
    /// contents are never inspected.
    fn refill(&self, state: &mut FreestandingState, pages: usize) {
        let _ = self.page_source.alloc_pages(pages);
        let gained = pages * REFILL_RECORDS;
        state.free_count += gained;
        log::debug!(
            "freestanding segment pool refilled by {gained} records ({} now in reserve)",
            state.free_count
        );
    }
}

impl SegmentPool for FreestandingPool {
    fn acquire(&self) {
        let mut state = self.state.lock();
        if state.free_count <= NFREESEGS_MIN {
            self.refill(&mut state, 1);
        }
        debug_assert!(
            state.free_count > 0,
            "freestanding segment pool exhausted after refill"
        );
        state.free_count -= 1;
    }

    fn release(&self) {
        self.state.lock().free_count += 1;
    }

    fn bootstrap(&self) {
        let mut state = self.state.lock();
        if state.bootstrapped {
            return;
        }
        self.refill(&mut state, BOOTSTRAP_RESERVE / REFILL_RECORDS);
        state.bootstrapped = true;
    }

    fn reserve_len(&self) -> Option<usize> {
        Some(self.state.lock().free_count)
    }
}
