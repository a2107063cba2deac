use std::fmt;

/// Resource exhaustion: the only runtime-recoverable failure this crate
/// produces. Caller-bug preconditions (overlapping
/// spans, double frees, bad alignment, cyclic sources) are asserted instead,
/// since no recovery would leave the arena in a consistent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vmem arena: no segment satisfies the requested constraints")
    }
}

impl std::error::Error for AllocError {}

pub type Result<T> = core::result::Result<T, AllocError>;
