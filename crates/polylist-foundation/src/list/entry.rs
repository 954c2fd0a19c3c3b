//! Backing entries of a [`SequenceStore`](super::SequenceStore).

use std::fmt;
use std::rc::Rc;

use polylist_core::{PagedRange, RangeId, Record};

/// A paged range owned by the store.
///
/// Dropping the entry closes the range if it is still open, so a range is
/// released exactly once no matter which path removes it from the sequence.
pub struct PagedEntry {
    id: RangeId,
    handle: Box<dyn PagedRange>,
}

impl PagedEntry {
    pub(crate) fn new(id: RangeId, handle: Box<dyn PagedRange>) -> Self {
        Self { id, handle }
    }

    pub fn id(&self) -> RangeId {
        self.id
    }

    /// Live row count, re-read from the external resource on every call.
    pub fn count(&self) -> usize {
        self.handle.count()
    }

    pub fn range(&self) -> &dyn PagedRange {
        self.handle.as_ref()
    }

    pub(crate) fn seek(&mut self, local_offset: usize) {
        self.handle.seek(local_offset);
    }
}

impl Drop for PagedEntry {
    fn drop(&mut self) {
        if self.handle.is_open() {
            log::debug!(target: super::LOG_TARGET, "closing {}", self.id);
            self.handle.close();
        }
    }
}

impl fmt::Debug for PagedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedEntry")
            .field("id", &self.id)
            .field("count", &self.count())
            .finish()
    }
}

/// One physical slot of the backing sequence.
///
/// A `Plain` entry occupies one logical position; a `Paged` entry expands into
/// as many positions as its range currently has rows.
#[derive(Debug)]
pub enum Entry {
    Plain(Rc<dyn Record>),
    Paged(PagedEntry),
}

impl Entry {
    /// Number of logical positions this entry occupies.
    pub fn logical_len(&self) -> usize {
        match self {
            Entry::Plain(_) => 1,
            Entry::Paged(paged) => paged.count(),
        }
    }

    pub fn as_record(&self) -> Option<&Rc<dyn Record>> {
        match self {
            Entry::Plain(record) => Some(record),
            Entry::Paged(_) => None,
        }
    }

    pub fn as_paged(&self) -> Option<&PagedEntry> {
        match self {
            Entry::Plain(_) => None,
            Entry::Paged(paged) => Some(paged),
        }
    }

    pub(crate) fn view(&self, local_offset: usize) -> EntryView<'_> {
        match self {
            Entry::Plain(record) => EntryView::Plain(record),
            Entry::Paged(paged) => EntryView::Paged {
                id: paged.id,
                range: paged.range(),
                local_offset,
            },
        }
    }
}

/// What sits at one logical position.
///
/// For a paged position the range has already been positioned on
/// `local_offset` when the view comes out of
/// [`SequenceStore::get`](super::SequenceStore::get).
#[derive(Clone, Copy, Debug)]
pub enum EntryView<'a> {
    Plain(&'a Rc<dyn Record>),
    Paged {
        id: RangeId,
        range: &'a dyn PagedRange,
        local_offset: usize,
    },
}

impl<'a> EntryView<'a> {
    pub fn as_record(&self) -> Option<&'a Rc<dyn Record>> {
        match *self {
            EntryView::Plain(record) => Some(record),
            EntryView::Paged { .. } => None,
        }
    }

    pub fn as_range(&self) -> Option<&'a dyn PagedRange> {
        match *self {
            EntryView::Plain(_) => None,
            EntryView::Paged { range, .. } => Some(range),
        }
    }

    pub fn is_paged(&self) -> bool {
        matches!(self, EntryView::Paged { .. })
    }

    /// Row offset inside the paged range, `None` for plain records.
    pub fn local_offset(&self) -> Option<usize> {
        match *self {
            EntryView::Plain(_) => None,
            EntryView::Paged { local_offset, .. } => Some(local_offset),
        }
    }

    /// Human-readable shape name for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            EntryView::Plain(record) => record.shape().short_name().to_string(),
            EntryView::Paged { id, .. } => format!("paged {}", id),
        }
    }
}
