use bitflags::bitflags;

bitflags! {
    /// Flag bits accepted by [`crate::Arena::xalloc`] and friends.
    ///
    /// Exactly one of `INSTANT_FIT` / `BEST_FIT` must be set for any call
    /// that performs a fit search. `SLEEP`/`NOSLEEP` are accepted for
    /// API compatibility with hosted implementations that may block on an
    /// upstream source; this crate's engine never blocks, so it does not
    /// interpret them.
    pub struct Flags: u32 {
        /// O(1) fit policy: take the head of the first sufficiently large bucket.
        const INSTANT_FIT = 1 << 0;
        /// Tight-packing fit policy: smallest segment that satisfies constraints.
        const BEST_FIT     = 1 << 1;
        /// Refill the segment pool before allocating (used when the caller
        /// is itself the backing store for some upstream pool).
        const BOOTSTRAP    = 1 << 2;
        /// Reserved: hosted implementations may block on the source arena.
        const SLEEP        = 1 << 3;
        /// Reserved: the inverse of `SLEEP`.
        const NOSLEEP      = 1 << 4;
    }
}

impl Flags {
    /// The fit policy requested by these flags.
    ///
    /// # Panics
    ///
    /// Panics if neither or both of `INSTANT_FIT`/`BEST_FIT` are set.
    pub fn fit_policy(self) -> FitPolicy {
        match (
            self.contains(Flags::INSTANT_FIT),
            self.contains(Flags::BEST_FIT),
        ) {
            (true, false) => FitPolicy::InstantFit,
            (false, true) => FitPolicy::BestFit,
            (false, false) => panic!("Flags must set exactly one of INSTANT_FIT or BEST_FIT"),
            (true, true) => panic!("Flags must not set both INSTANT_FIT and BEST_FIT"),
        }
    }
}

/// The fit policy in effect for a single `xalloc` call, parameterizing the
/// shared split/coalesce path rather than branching inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPolicy {
    InstantFit,
    BestFit,
}
