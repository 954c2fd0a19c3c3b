use polylist_foundation::{Entry, ListError, RendererTypeId};
use polylist_ui::{AdapterSpec, Holder, ListAdapter};

use crate::sink::{Notification, RecordingSink};

/// A [`ListAdapter`] wired to a [`RecordingSink`], with assertions over both.
pub struct AdapterTestRule {
    adapter: ListAdapter,
    sink: RecordingSink,
}

impl Default for AdapterTestRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterTestRule {
    /// Rule with diagnostics enabled.
    pub fn new() -> Self {
        Self::with_spec(AdapterSpec::new().diagnostics(true))
    }

    pub fn with_spec(spec: AdapterSpec) -> Self {
        let sink = RecordingSink::new();
        let mut adapter = ListAdapter::new(spec);
        adapter.attach_sink(sink.as_sink());
        Self { adapter, sink }
    }

    pub fn adapter(&mut self) -> &mut ListAdapter {
        &mut self.adapter
    }

    pub fn sink(&self) -> &RecordingSink {
        &self.sink
    }

    /// Notifications recorded since the last call.
    pub fn take_notifications(&self) -> Vec<Notification> {
        self.sink.take()
    }

    /// Renderer type of every position, in order.
    pub fn renderer_types(&mut self) -> Vec<Result<RendererTypeId, ListError>> {
        let count = self.adapter.item_count();
        (0..count)
            .map(|position| self.adapter.renderer_type_at(position))
            .collect()
    }

    /// Creates one holder per position and fully binds it, the way a
    /// rendering layer would on first layout.
    pub fn bind_all(&mut self) -> Result<Vec<Holder>, ListError> {
        let count = self.adapter.item_count();
        let mut holders = Vec::with_capacity(count);
        for position in 0..count {
            let type_id = self.adapter.renderer_type_at(position)?;
            let holder = self.adapter.create_holder(type_id)?;
            self.adapter.bind_holder(&holder, position)?;
            holders.push(holder);
        }
        Ok(holders)
    }

    pub fn assert_item_count(&self, expected: usize) {
        assert_eq!(
            self.adapter.item_count(),
            expected,
            "unexpected item count"
        );
    }

    /// Item count equals plain entries plus the live count of every range.
    pub fn assert_size_invariant(&self) {
        let expected: usize = self.adapter.entries().iter().map(Entry::logical_len).sum();
        assert_eq!(
            self.adapter.item_count(),
            expected,
            "item count drifted from the backing entries"
        );
    }

    pub fn assert_notified(&self, expected: &[Notification]) {
        assert_eq!(self.sink.take(), expected, "unexpected notifications");
    }

    pub fn into_adapter(self) -> ListAdapter {
        self.adapter
    }
}
