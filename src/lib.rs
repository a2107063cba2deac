//! `vmem_arena`: a Bonwick & Adams-style *vmem* resource arena.
//!
//! Apportions an arbitrary integer-addressed universe (virtual address
//! ranges, process ids, device minor numbers, block numbers, anything
//! measurable in a fixed quantum) over boundary-tag segments with eager
//! coalescing and two fit policies: [`Flags::INSTANT_FIT`] (O(1), the head
//! of the first sufficiently large size-class bucket) and
//! [`Flags::BEST_FIT`] (tight-packing, the smallest segment that satisfies
//! the requested constraints).
//!
//! The arena is the whole of this crate's scope. No per-CPU magazine/quantum
//! cache, no kernel bootstrap glue, no defragmentation pass. An arena may
//! import extents on demand from an upstream [`SegmentSource`], in practice
//! usually another [`Arena`], realizing the layered-arena pattern the
//! original paper describes.
//!
//! ```
//! use vmem_arena::{Arena, Flags};
//!
//! let arena = Arena::create("example", 0x1000, 0x1000, 0x1000);
//! let addr = arena.alloc(0x1000, Flags::INSTANT_FIT).unwrap();
//! assert_eq!(addr, 0x1000);
//! arena.free(addr, 0x1000);
//! ```

mod arena;
mod collections;
mod dump;
mod error;
mod fit;
mod flags;
mod freelist;
mod hash_index;
mod pool;
mod segment;
mod source;

pub use arena::{Arena, ArenaBuilder, ArenaId};
pub use error::{AllocError, Result};
pub use flags::{FitPolicy, Flags};
pub use pool::{
    FreestandingPool, HostedPool, PageSource, SegmentPool, BOOTSTRAP_RESERVE, NFREESEGS_MIN,
    REFILL_RECORDS,
};
pub use segment::SegmentKind;
pub use source::SegmentSource;
