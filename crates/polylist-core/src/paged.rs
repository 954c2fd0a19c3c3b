//! Externally-owned, seekable, countable datasets.
//!
//! A [`PagedRange`] is the list-side view of a database cursor: it knows how
//! many rows it has and can be positioned on any of them. Once spliced into a
//! sequence, the sequence owns the handle and is responsible for closing it.

use std::fmt;

use crate::record::AsAny;

/// Store-assigned identifier of an admitted paged range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeId(pub u64);

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "range#{}", self.0)
    }
}

/// Capability set of an external paged dataset.
///
/// Seeking is expected to be a cheap, synchronous in-memory positioning on an
/// already open resource. Opening the resource is the caller's concern;
/// closing it belongs to whoever owns the handle.
pub trait PagedRange: AsAny + fmt::Debug + 'static {
    /// Number of rows currently available.
    fn count(&self) -> usize;

    /// Positions the range on `local_offset` (0-based row within the range).
    fn seek(&mut self, local_offset: usize);

    fn is_open(&self) -> bool;

    /// Releases the underlying resource. Called at most once by the owner.
    fn close(&mut self);
}

impl dyn PagedRange {
    /// Returns the range as `T` if that is its concrete type.
    pub fn downcast_ref<T: PagedRange>(&self) -> Option<&T> {
        <dyn PagedRange as AsAny>::as_any(self).downcast_ref::<T>()
    }
}
