//! An intrusive doubly linked list over an externally owned [`SegmentSlab`].
//!
//! Unlike a boxed-node list generic over an allocator, this is a
//! slab-external, allocator-free shape: the list itself owns no storage
//! at all, just a head/tail pair of [`SegmentId`]s, and every operation takes
//! the slab that actually holds the segments. That externalization is what
//! lets one `Segment` sit in two different lists at once (the address-ordered
//! list B and a free-list bucket C) through two different [`LinkAccessor`]
//! implementations over the same storage.

use std::marker::PhantomData;

use crate::segment::{Segment, SegmentId, SegmentSlab};

/// Selects which pair of linkage fields on [`Segment`] a [`SlabList`]
/// threads through. `crate::segment::AddressLinks` and `FreeLinks` are the
/// two implementations in this crate.
pub(crate) trait LinkAccessor {
    fn links(seg: &Segment) -> (Option<SegmentId>, Option<SegmentId>);
    fn set_links(seg: &mut Segment, prev: Option<SegmentId>, next: Option<SegmentId>);
}

fn get_prev<A: LinkAccessor>(slab: &SegmentSlab, id: SegmentId) -> Option<SegmentId> {
    A::links(slab.get(id)).0
}

fn get_next<A: LinkAccessor>(slab: &SegmentSlab, id: SegmentId) -> Option<SegmentId> {
    A::links(slab.get(id)).1
}

fn set_prev<A: LinkAccessor>(slab: &mut SegmentSlab, id: SegmentId, prev: Option<SegmentId>) {
    let (_, next) = A::links(slab.get(id));
    A::set_links(slab.get_mut(id), prev, next);
}

fn set_next<A: LinkAccessor>(slab: &mut SegmentSlab, id: SegmentId, next: Option<SegmentId>) {
    let (prev, _) = A::links(slab.get(id));
    A::set_links(slab.get_mut(id), prev, next);
}

/// Address-ordered (or, for C, insertion-ordered) doubly linked sequence of
/// segment ids. Holds no segments itself; see module docs.
pub(crate) struct SlabList<A> {
    head: Option<SegmentId>,
    tail: Option<SegmentId>,
    _accessor: PhantomData<A>,
}

impl<A: LinkAccessor> SlabList<A> {
    pub fn new() -> Self {
        SlabList {
            head: None,
            tail: None,
            _accessor: PhantomData,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<SegmentId> {
        self.head
    }

    pub fn tail(&self) -> Option<SegmentId> {
        self.tail
    }

    pub fn predecessor(&self, slab: &SegmentSlab, id: SegmentId) -> Option<SegmentId> {
        get_prev::<A>(slab, id)
    }

    pub fn successor(&self, slab: &SegmentSlab, id: SegmentId) -> Option<SegmentId> {
        get_next::<A>(slab, id)
    }

    /// Appends `id` at the tail. Used when installing a new span at the end
    /// of the address-ordered list.
    pub fn push_back(&mut self, slab: &mut SegmentSlab, id: SegmentId) {
        A::set_links(slab.get_mut(id), self.tail, None);
        match self.tail {
            Some(tail) => set_next::<A>(slab, tail, Some(id)),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    /// Inserts `id` at the head. Free-list buckets insert new entries here.
    pub fn push_front(&mut self, slab: &mut SegmentSlab, id: SegmentId) {
        A::set_links(slab.get_mut(id), None, self.head);
        match self.head {
            Some(head) => set_prev::<A>(slab, head, Some(id)),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    /// Inserts `id` immediately before `anchor`, which must already be a
    /// member of this list.
    pub fn insert_before(&mut self, slab: &mut SegmentSlab, anchor: SegmentId, id: SegmentId) {
        let prev = get_prev::<A>(slab, anchor);
        A::set_links(slab.get_mut(id), prev, Some(anchor));
        match prev {
            Some(p) => set_next::<A>(slab, p, Some(id)),
            None => self.head = Some(id),
        }
        set_prev::<A>(slab, anchor, Some(id));
    }

    /// Inserts `id` immediately after `anchor`, which must already be a
    /// member of this list.
    pub fn insert_after(&mut self, slab: &mut SegmentSlab, anchor: SegmentId, id: SegmentId) {
        let next = get_next::<A>(slab, anchor);
        A::set_links(slab.get_mut(id), Some(anchor), next);
        match next {
            Some(n) => set_prev::<A>(slab, n, Some(id)),
            None => self.tail = Some(id),
        }
        set_next::<A>(slab, anchor, Some(id));
    }

    /// Removes `id` from this list. Does not touch the slab's storage for
    /// `id` itself; callers decide whether to recycle the slot.
    pub fn remove(&mut self, slab: &mut SegmentSlab, id: SegmentId) {
        let (prev, next) = A::links(slab.get(id));
        match prev {
            Some(p) => set_next::<A>(slab, p, next),
            None => self.head = next,
        }
        match next {
            Some(n) => set_prev::<A>(slab, n, prev),
            None => self.tail = prev,
        }
        A::set_links(slab.get_mut(id), None, None);
    }

    pub fn iter<'a>(&self, slab: &'a SegmentSlab) -> Iter<'a, A> {
        Iter {
            slab,
            next: self.head,
            _accessor: PhantomData,
        }
    }
}

impl<A: LinkAccessor> Default for SlabList<A> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Iter<'a, A> {
    slab: &'a SegmentSlab,
    next: Option<SegmentId>,
    _accessor: PhantomData<A>,
}

impl<'a, A: LinkAccessor> Iterator for Iter<'a, A> {
    type Item = SegmentId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = get_next::<A>(self.slab, current);
        Some(current)
    }
}
