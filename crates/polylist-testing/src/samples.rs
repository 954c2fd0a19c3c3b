//! Sample records and a binding that records what it is asked to do.

use std::cell::RefCell;
use std::rc::Rc;

use polylist_core::{Payload, Record};
use polylist_foundation::{BindingExtras, EntryView, RendererTypeId};
use polylist_ui::{HolderRef, LifecycleEvent, RendererBinding, ViewHolder};

use crate::cursor::FakeCursor;

#[derive(Clone, Debug, PartialEq)]
pub struct Photo {
    pub id: u32,
    pub url: String,
}

impl Photo {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            url: format!("https://img.example/{id}.jpg"),
        }
    }
}

impl Record for Photo {}

#[derive(Clone, Debug, PartialEq)]
pub struct Article {
    pub id: u32,
    pub title: String,
}

impl Article {
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl Record for Article {}

pub fn photo(id: u32) -> Rc<dyn Record> {
    Rc::new(Photo::new(id))
}

pub fn article(id: u32, title: &str) -> Rc<dyn Record> {
    Rc::new(Article::new(id, title))
}

/// `count` cursor rows named `row-0`, `row-1`, ...
pub fn cursor_rows(count: usize) -> Vec<String> {
    (0..count).map(|row| format!("row-{row}")).collect()
}

/// What a [`RecordingBinding`] or one of its holders was asked to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindEvent {
    Created { binding: &'static str, type_id: RendererTypeId },
    Bound { binding: &'static str, position: usize, entry: String },
    Partial { binding: &'static str, position: usize, kind: i32 },
    Lifecycle { binding: &'static str, event: LifecycleEvent },
}

/// Binding whose holders log every bind and lifecycle callback into a shared
/// event list.
pub struct RecordingBinding {
    name: &'static str,
    lifecycle: bool,
    full_span: bool,
    span: usize,
    events: Rc<RefCell<Vec<BindEvent>>>,
}

impl RecordingBinding {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            lifecycle: false,
            full_span: false,
            span: 1,
            events: Rc::default(),
        }
    }

    pub fn lifecycle_aware(mut self) -> Self {
        self.lifecycle = true;
        self
    }

    pub fn full_span(mut self) -> Self {
        self.full_span = true;
        self
    }

    pub fn span(mut self, span: usize) -> Self {
        self.span = span;
        self
    }

    /// Shared event list; stays readable after the binding is registered.
    pub fn events(&self) -> Rc<RefCell<Vec<BindEvent>>> {
        Rc::clone(&self.events)
    }

    pub fn into_rc(self) -> Rc<dyn RendererBinding> {
        Rc::new(self)
    }
}

impl RendererBinding for RecordingBinding {
    fn create_holder(&self, type_id: RendererTypeId, _extras: Rc<RefCell<BindingExtras>>) -> HolderRef {
        self.events.borrow_mut().push(BindEvent::Created {
            binding: self.name,
            type_id,
        });
        Rc::new(RefCell::new(RecordingHolder {
            binding: self.name,
            events: Rc::clone(&self.events),
        }))
    }

    fn supports_lifecycle(&self) -> bool {
        self.lifecycle
    }

    fn is_full_span(&self) -> bool {
        self.full_span
    }

    fn span_size(&self, _span_count: usize) -> usize {
        self.span
    }
}

pub struct RecordingHolder {
    binding: &'static str,
    events: Rc<RefCell<Vec<BindEvent>>>,
}

impl ViewHolder for RecordingHolder {
    fn bind(&mut self, position: usize, entry: EntryView<'_>) {
        self.events.borrow_mut().push(BindEvent::Bound {
            binding: self.binding,
            position,
            entry: describe(&entry),
        });
    }

    fn bind_partial(&mut self, position: usize, _entry: EntryView<'_>, payload: &Payload) {
        self.events.borrow_mut().push(BindEvent::Partial {
            binding: self.binding,
            position,
            kind: payload.kind(),
        });
    }

    fn on_lifecycle_event(&mut self, event: LifecycleEvent) {
        self.events.borrow_mut().push(BindEvent::Lifecycle {
            binding: self.binding,
            event,
        });
    }
}

/// Debug text of a plain record, or the current row of a string cursor.
fn describe(entry: &EntryView<'_>) -> String {
    if let Some(record) = entry.as_record() {
        return format!("{record:?}");
    }
    entry
        .as_range()
        .and_then(|range| range.downcast_ref::<FakeCursor<String>>())
        .and_then(FakeCursor::current_row)
        .unwrap_or_else(|| entry.describe())
}
