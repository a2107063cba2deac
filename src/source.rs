//! External collaborator interfaces: the segment-source callback pair an
//! arena may use to import spans from an upstream arena.

use crate::arena::ArenaId;
use crate::error::Result;

/// Caller-supplied when an arena has a parent arena to import spans from.
/// A child arena's source is usually just another [`crate::Arena`]; see
/// the `SegmentSource` impl on `Arena` in `arena.rs`, which lets an
/// `Arc<Arena>` coerce straight to `Arc<dyn SegmentSource>`. This trait
/// also lets a caller supply any other extent provider.
pub trait SegmentSource: Send + Sync {
    /// Obtain a new extent of at least `size` bytes.
    fn import(&self, size: usize) -> Result<(usize, usize)>;
    /// Return an extent previously obtained from `import`.
    fn release(&self, base: usize, size: usize);

    /// The chain of arena ids reachable by following `source` links,
    /// starting with this source's own id if it is an arena. Non-arena
    /// sources carry no cycle risk and use the empty default.
    fn source_chain_ids(&self) -> Vec<ArenaId> {
        Vec::new()
    }
}
