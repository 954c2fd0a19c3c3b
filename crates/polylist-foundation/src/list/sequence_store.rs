//! Position-virtualizing sequence of plain records and paged ranges.
//!
//! The store keeps a physical `Vec<Entry>` plus the ascending physical
//! indices of its paged entries. A logical position is resolved by walking
//! that paged index: plain runs between ranges map one-to-one, a range maps
//! to `count()` consecutive positions. Walking costs O(k) in the number of
//! live paged ranges, which is expected to stay in the single digits.
//!
//! Range counts are re-read on every walk, so no logical position survives a
//! mutation or a change in an external range's row count.

use std::rc::Rc;

use polylist_core::{PagedRange, Payload, RangeId, Record};
use smallvec::SmallVec;

use super::change::Change;
use super::diagnostics::{Diagnostics, LOG_TARGET};
use super::entry::{Entry, EntryView, PagedEntry};
use super::error::{ListError, Result};
use super::type_registry::KeyResolver;

/// Where a logical position lives in the backing sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Plain {
        physical: usize,
    },
    Paged {
        physical: usize,
        start: usize,
        local_offset: usize,
    },
}

/// Ordered logical sequence of plain records and paged ranges.
///
/// Every mutation validates its arguments first. Invalid requests are
/// reported through [`Diagnostics`] and return no [`Change`]; the one
/// exception is [`remove_range`](Self::remove_range), which always reports a
/// removal.
#[derive(Debug, Default)]
pub struct SequenceStore {
    entries: Vec<Entry>,
    /// Physical indices of `Entry::Paged` slots, ascending.
    paged_slots: SmallVec<[usize; 4]>,
    next_range_id: u64,
    diagnostics: Diagnostics,
}

impl SequenceStore {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            entries: Vec::new(),
            paged_slots: SmallVec::new(),
            next_range_id: 0,
            diagnostics,
        }
    }

    /// Logical size: plain entries plus the current row count of every range.
    pub fn size(&self) -> usize {
        let ranges: usize = self
            .paged_slots
            .iter()
            .map(|&physical| self.entries[physical].logical_len())
            .sum();
        self.entries.len() - self.paged_slots.len() + ranges
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Physical backing sequence.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn paged_range_count(&self) -> usize {
        self.paged_slots.len()
    }

    /// Returns what sits at `position`, seeking paged ranges to the local row.
    pub fn get(&mut self, position: usize) -> Result<EntryView<'_>> {
        let slot = self.locate(position).ok_or_else(|| ListError::OutOfRange {
            position,
            size: self.size(),
        })?;
        match slot {
            Slot::Plain { physical } => Ok(self.entries[physical].view(0)),
            Slot::Paged {
                physical,
                local_offset,
                ..
            } => {
                if let Entry::Paged(paged) = &mut self.entries[physical] {
                    paged.seek(local_offset);
                }
                Ok(self.entries[physical].view(local_offset))
            }
        }
    }

    /// Like [`get`](Self::get) but without seeking; the caller positions the
    /// range itself if it needs row data.
    pub fn peek(&self, position: usize) -> Result<EntryView<'_>> {
        match self.locate(position) {
            Some(Slot::Plain { physical }) => Ok(self.entries[physical].view(0)),
            Some(Slot::Paged {
                physical,
                local_offset,
                ..
            }) => Ok(self.entries[physical].view(local_offset)),
            None => Err(ListError::OutOfRange {
                position,
                size: self.size(),
            }),
        }
    }

    /// Logical start and current count of the range with `id`.
    pub fn range_extent(&self, id: RangeId) -> Option<(usize, usize)> {
        let mut logical = 0;
        for entry in &self.entries {
            match entry {
                Entry::Paged(paged) if paged.id() == id => return Some((logical, paged.count())),
                other => logical += other.logical_len(),
            }
        }
        None
    }

    /// Inserts the registered subset of `records` at logical `index`.
    ///
    /// Unregistered records are dropped one by one with a diagnostic; the
    /// rest are inserted as one contiguous batch.
    pub fn insert_plain(
        &mut self,
        index: usize,
        records: Vec<Rc<dyn Record>>,
        resolver: &impl KeyResolver,
    ) -> Option<Change> {
        let Some(physical) = self.insertion_point(index) else {
            self.reject_index("insert_plain", index);
            return None;
        };
        let accepted: Vec<Rc<dyn Record>> = records
            .into_iter()
            .filter(|record| {
                let registered = resolver.is_registered(&EntryView::Plain(record), None);
                if !registered {
                    self.diagnostics.reject(
                        "insert_plain",
                        format_args!("{} is not registered", record.shape().short_name()),
                    );
                }
                registered
            })
            .collect();
        if accepted.is_empty() {
            self.diagnostics
                .reject("insert_plain", format_args!("no registered records to insert"));
            return None;
        }

        let count = accepted.len();
        self.entries
            .splice(physical..physical, accepted.into_iter().map(Entry::Plain));
        for slot in self.paged_slots.iter_mut().filter(|slot| **slot >= physical) {
            *slot += count;
        }
        Some(Change::Inserted { index, count })
    }

    /// Splices a paged range in at logical `index`.
    ///
    /// On success the store owns the handle and will close it. A rejected
    /// handle (no rows, unregistered, bad index) is returned unclosed.
    pub fn insert_paged_range(
        &mut self,
        index: usize,
        handle: Box<dyn PagedRange>,
        resolver: &impl KeyResolver,
    ) -> std::result::Result<Change, Box<dyn PagedRange>> {
        let count = handle.count();
        if count == 0 {
            self.diagnostics
                .reject("insert_paged_range", format_args!("range has no rows"));
            return Err(handle);
        }
        let id = RangeId(self.next_range_id);
        let candidate = EntryView::Paged {
            id,
            range: handle.as_ref(),
            local_offset: 0,
        };
        if !resolver.is_registered(&candidate, None) {
            self.diagnostics
                .reject("insert_paged_range", format_args!("paged ranges are not registered"));
            return Err(handle);
        }
        let Some(physical) = self.insertion_point(index) else {
            self.reject_index("insert_paged_range", index);
            return Err(handle);
        };

        self.next_range_id += 1;
        self.entries
            .insert(physical, Entry::Paged(PagedEntry::new(id, handle)));
        for slot in self.paged_slots.iter_mut().filter(|slot| **slot >= physical) {
            *slot += 1;
        }
        let at = self.paged_slots.partition_point(|&slot| slot < physical);
        self.paged_slots.insert(at, physical);
        log::debug!(target: LOG_TARGET, "admitted {} with {} rows at {}", id, count, index);
        Ok(Change::Inserted { index, count })
    }

    /// Removes the logical slice `index..index + count`.
    ///
    /// The slice must start and end on entry boundaries: a slice that would
    /// cut a paged range is rejected. Removed ranges are closed. The returned
    /// change always describes the requested slice, whether or not anything
    /// was removed.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Change {
        let change = Change::Removed { index, count };
        let size = self.size();
        let end = match index.checked_add(count) {
            Some(end) if count > 0 && end <= size => end,
            _ => {
                self.diagnostics.reject(
                    "remove_range",
                    format_args!("{}..+{} is not inside 0..{}", index, count, size),
                );
                return change;
            }
        };
        let (Some(first), Some(last)) = (self.insertion_point(index), self.insertion_point(end))
        else {
            self.diagnostics.reject(
                "remove_range",
                format_args!("{}..{} cuts through a paged range", index, end),
            );
            return change;
        };

        // Dropping a paged entry closes its range.
        let closed = self.entries[first..last]
            .iter()
            .filter(|entry| matches!(entry, Entry::Paged(_)))
            .count();
        self.entries.drain(first..last);
        self.reindex();
        if closed > 0 {
            log::debug!(target: LOG_TARGET, "removal of {}..{} released {} range(s)", index, end, closed);
        }
        change
    }

    /// Replaces the plain record at `index` (if `record` is given) and reports
    /// the position as changed with the optional partial-update payload.
    pub fn update(
        &mut self,
        index: usize,
        record: Option<Rc<dyn Record>>,
        payload: Option<Payload>,
        resolver: &impl KeyResolver,
    ) -> Option<Change> {
        let Some(slot) = self.locate(index) else {
            self.reject_index("update", index);
            return None;
        };
        if let Some(record) = record {
            match slot {
                Slot::Plain { physical } => {
                    if !resolver.is_registered(&EntryView::Plain(&record), None) {
                        self.diagnostics.reject(
                            "update",
                            format_args!("{} is not registered", record.shape().short_name()),
                        );
                        return None;
                    }
                    self.entries[physical] = Entry::Plain(record);
                }
                Slot::Paged { start, .. } => {
                    self.diagnostics.reject(
                        "update",
                        format_args!("position {} is a paged row starting at {}; record ignored", index, start),
                    );
                }
            }
        }
        Some(Change::Changed { index, payload })
    }

    /// Swaps the plain records at logical `from` and `to`.
    ///
    /// This is an exchange, not a relocation: nothing between the two
    /// positions shifts, but the whole span is reported as changed.
    pub fn swap(&mut self, from: usize, to: usize) -> Option<Change> {
        let Some(source) = self.locate(from) else {
            self.reject_index("swap", from);
            return None;
        };
        let Some(target) = self.locate(to) else {
            self.reject_index("swap", to);
            return None;
        };
        match (source, target) {
            (Slot::Plain { physical: a }, Slot::Plain { physical: b }) => self.entries.swap(a, b),
            _ => {
                self.diagnostics.reject(
                    "swap",
                    format_args!("{} and {} must both be plain records", from, to),
                );
                return None;
            }
        }
        let start = from.min(to);
        let end = from.max(to);
        Some(Change::RangeChanged {
            start,
            count: end - start + 1,
        })
    }

    /// First logical position whose record resolves to the same key as
    /// `record`.
    ///
    /// Matching is by classifier key, not by value: two distinct records of
    /// the same shape are indistinguishable here. Both sides are resolved
    /// without a position, the way records are keyed at admission.
    pub fn find_logical_index(&self, record: &Rc<dyn Record>, resolver: &impl KeyResolver) -> Option<usize> {
        let target = resolver.resolve_key(&EntryView::Plain(record), None)?;
        let mut logical = 0;
        for entry in &self.entries {
            match entry {
                Entry::Plain(candidate) => {
                    if resolver.resolve_key(&EntryView::Plain(candidate), None) == Some(target) {
                        return Some(logical);
                    }
                    logical += 1;
                }
                Entry::Paged(paged) => logical += paged.count(),
            }
        }
        None
    }

    /// Replaces the whole sequence with the registered subset of `records`.
    ///
    /// Ranges owned before the call are closed.
    pub fn set_data(&mut self, records: Vec<Rc<dyn Record>>, resolver: &impl KeyResolver) -> Option<Change> {
        if records.is_empty() {
            self.diagnostics.reject("set_data", format_args!("records are empty"));
            return None;
        }
        let accepted: Vec<Entry> = records
            .into_iter()
            .filter(|record| {
                let registered = resolver.is_registered(&EntryView::Plain(record), None);
                if !registered {
                    self.diagnostics.reject(
                        "set_data",
                        format_args!("{} is not registered", record.shape().short_name()),
                    );
                }
                registered
            })
            .map(Entry::Plain)
            .collect();
        self.entries = accepted;
        self.paged_slots.clear();
        Some(Change::DataSetChanged)
    }

    pub fn add_first(&mut self, records: Vec<Rc<dyn Record>>, resolver: &impl KeyResolver) -> Option<Change> {
        self.insert_plain(0, records, resolver)
    }

    pub fn add_last(&mut self, records: Vec<Rc<dyn Record>>, resolver: &impl KeyResolver) -> Option<Change> {
        let size = self.size();
        self.insert_plain(size, records, resolver)
    }

    pub fn add_paged_range_first(
        &mut self,
        handle: Box<dyn PagedRange>,
        resolver: &impl KeyResolver,
    ) -> std::result::Result<Change, Box<dyn PagedRange>> {
        self.insert_paged_range(0, handle, resolver)
    }

    pub fn add_paged_range_last(
        &mut self,
        handle: Box<dyn PagedRange>,
        resolver: &impl KeyResolver,
    ) -> std::result::Result<Change, Box<dyn PagedRange>> {
        let size = self.size();
        self.insert_paged_range(size, handle, resolver)
    }

    pub fn remove_at(&mut self, index: usize) -> Change {
        self.remove_range(index, 1)
    }

    pub fn remove_first(&mut self, count: usize) -> Change {
        self.remove_range(0, count)
    }

    /// Removes the last `count` logical positions.
    pub fn remove_last(&mut self, count: usize) -> Change {
        let size = self.size();
        if count > size {
            // Mirror the out-of-range slice; remove_range rejects it.
            return self.remove_range(0, count);
        }
        self.remove_range(size - count, count)
    }

    /// Removes one position per record, located with
    /// [`find_logical_index`](Self::find_logical_index). Records that are not
    /// found are skipped.
    pub fn remove_records(&mut self, records: &[Rc<dyn Record>], resolver: &impl KeyResolver) -> Vec<Change> {
        let mut changes = Vec::with_capacity(records.len());
        for record in records {
            match self.find_logical_index(record, resolver) {
                Some(index) => changes.push(self.remove_range(index, 1)),
                None => self.diagnostics.reject(
                    "remove_records",
                    format_args!("{} is not in the list", record.shape().short_name()),
                ),
            }
        }
        changes
    }

    /// Finds `record` by key and replaces the record found there with it.
    pub fn update_record(
        &mut self,
        record: Rc<dyn Record>,
        payload: Option<Payload>,
        resolver: &impl KeyResolver,
    ) -> Option<Change> {
        let Some(index) = self.find_logical_index(&record, resolver) else {
            self.diagnostics.reject(
                "update_record",
                format_args!("{} is not in the list", record.shape().short_name()),
            );
            return None;
        };
        self.update(index, Some(record), payload, resolver)
    }

    /// Drops every record and closes every owned range.
    ///
    /// The store is consumed: this is a teardown, not a reset.
    pub fn clear(self) {
        log::debug!(
            target: LOG_TARGET,
            "clearing {} entries, {} paged range(s)",
            self.entries.len(),
            self.paged_slots.len()
        );
        drop(self);
    }

    fn reject_index(&self, operation: &str, index: usize) {
        self.diagnostics.reject(
            operation,
            format_args!("index {} is out of range (size {})", index, self.size()),
        );
    }

    fn locate(&self, position: usize) -> Option<Slot> {
        // Logical index of physical entry `cursor`.
        let mut logical = 0;
        let mut cursor = 0;
        for &physical in &self.paged_slots {
            let plain_run = physical - cursor;
            if position < logical + plain_run {
                return Some(Slot::Plain {
                    physical: cursor + (position - logical),
                });
            }
            logical += plain_run;
            let count = self.entries[physical].logical_len();
            if position < logical + count {
                return Some(Slot::Paged {
                    physical,
                    start: logical,
                    local_offset: position - logical,
                });
            }
            logical += count;
            cursor = physical + 1;
        }
        let trailing = self.entries.len() - cursor;
        (position < logical + trailing).then(|| Slot::Plain {
            physical: cursor + (position - logical),
        })
    }

    /// Physical index at which an entry inserted at logical `index` must go,
    /// or `None` if `index` is past the end or strictly inside a paged range.
    fn insertion_point(&self, index: usize) -> Option<usize> {
        let mut logical = 0;
        let mut cursor = 0;
        for &physical in &self.paged_slots {
            let plain_run = physical - cursor;
            if index <= logical + plain_run {
                return Some(cursor + (index - logical));
            }
            logical += plain_run;
            let count = self.entries[physical].logical_len();
            if index < logical + count {
                return None;
            }
            logical += count;
            cursor = physical + 1;
        }
        let trailing = self.entries.len() - cursor;
        (index <= logical + trailing).then(|| cursor + (index - logical))
    }

    fn reindex(&mut self) {
        self.paged_slots = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(physical, entry)| entry.as_paged().map(|_| physical))
            .collect();
    }
}
