use polylist_core::Payload;

/// Structural notification produced by a [`SequenceStore`](super::SequenceStore)
/// mutation.
///
/// Ranges are logical and half-open: `Inserted { index: 2, count: 3 }` covers
/// positions 2, 3 and 4 after the insert.
#[derive(Clone, Debug)]
pub enum Change {
    Inserted { index: usize, count: usize },
    Removed { index: usize, count: usize },
    /// A single item needs rebinding, optionally only partially.
    Changed { index: usize, payload: Option<Payload> },
    /// Every item in `start..start + count` needs a full rebind.
    RangeChanged { start: usize, count: usize },
    /// The whole sequence was replaced.
    DataSetChanged,
}
