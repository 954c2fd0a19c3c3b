use std::cell::RefCell;
use std::rc::Rc;

use polylist_core::Payload;
use polylist_ui::NotificationSink;

/// One recorded sink callback. Payloads are reduced to their kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Inserted { index: usize, count: usize },
    Removed { index: usize, count: usize },
    Changed { index: usize, payload_kind: Option<i32> },
    RangeChanged { start: usize, count: usize },
    DataSetChanged,
}

/// Sink that records every callback in order.
///
/// Clones share the same log, so keep one clone and attach another.
#[derive(Clone, Default)]
pub struct RecordingSink {
    log: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle suitable for [`ListAdapter::attach_sink`](polylist_ui::ListAdapter::attach_sink).
    pub fn as_sink(&self) -> Rc<dyn NotificationSink> {
        Rc::new(self.clone())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.log.borrow().clone()
    }

    /// Returns and forgets everything recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn last(&self) -> Option<Notification> {
        self.log.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    fn push(&self, notification: Notification) {
        self.log.borrow_mut().push(notification);
    }
}

impl NotificationSink for RecordingSink {
    fn on_inserted(&self, index: usize, count: usize) {
        self.push(Notification::Inserted { index, count });
    }

    fn on_removed(&self, index: usize, count: usize) {
        self.push(Notification::Removed { index, count });
    }

    fn on_changed(&self, index: usize, payload: Option<&Payload>) {
        self.push(Notification::Changed {
            index,
            payload_kind: payload.map(Payload::kind),
        });
    }

    fn on_range_changed(&self, start: usize, count: usize) {
        self.push(Notification::RangeChanged { start, count });
    }

    fn on_data_set_changed(&self) {
        self.push(Notification::DataSetChanged);
    }
}
