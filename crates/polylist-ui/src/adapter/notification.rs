//! Structural notifications for the rendering layer.

use polylist_core::Payload;
use polylist_foundation::Change;

/// Receiver of structural change notifications.
///
/// The rendering layer re-queries positions lazily after each call; no
/// notification carries item data.
pub trait NotificationSink {
    fn on_inserted(&self, index: usize, count: usize);

    fn on_removed(&self, index: usize, count: usize);

    /// `payload` is `Some` for a partial update.
    fn on_changed(&self, index: usize, payload: Option<&Payload>);

    fn on_range_changed(&self, start: usize, count: usize);

    /// Every position may have changed; rebind everything.
    fn on_data_set_changed(&self);
}

/// Forwards `change` to the matching `sink` callback.
pub fn notify(sink: &dyn NotificationSink, change: &Change) {
    match change {
        Change::Inserted { index, count } => sink.on_inserted(*index, *count),
        Change::Removed { index, count } => sink.on_removed(*index, *count),
        Change::Changed { index, payload } => sink.on_changed(*index, payload.as_ref()),
        Change::RangeChanged { start, count } => sink.on_range_changed(*start, *count),
        Change::DataSetChanged => sink.on_data_set_changed(),
    }
}
