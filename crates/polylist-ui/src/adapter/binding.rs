//! Renderer bindings and the view holders they create.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use polylist_core::Payload;
use polylist_foundation::{BindingExtras, EntryView, RendererTypeId};

use super::lifecycle::LifecycleEvent;

/// Shared handle to a holder; the rendering layer keeps it for recycling.
pub type HolderRef = Rc<RefCell<dyn ViewHolder>>;

/// Reusable per-item view state, filled in from one logical position at a
/// time.
pub trait ViewHolder {
    /// Full bind from the entry at `position`.
    ///
    /// For a paged position the range has already been seeked to the row.
    fn bind(&mut self, position: usize, entry: EntryView<'_>);

    /// Partial bind for one payload. Falls back to a full bind.
    fn bind_partial(&mut self, position: usize, entry: EntryView<'_>, _payload: &Payload) {
        self.bind(position, entry);
    }

    /// Only called for holders whose binding reports
    /// [`RendererBinding::supports_lifecycle`].
    fn on_lifecycle_event(&mut self, _event: LifecycleEvent) {}
}

/// Renders one or more renderer types.
///
/// A binding registered under several keys is a single instance with a
/// single [`BindingExtras`] store.
pub trait RendererBinding {
    fn create_holder(&self, type_id: RendererTypeId, extras: Rc<RefCell<BindingExtras>>) -> HolderRef;

    /// Whether holders created by this binding want host lifecycle events.
    fn supports_lifecycle(&self) -> bool {
        false
    }

    /// Whether items of this binding take a full row in a staggered grid.
    fn is_full_span(&self) -> bool {
        false
    }

    /// Grid columns taken by one item when the grid has `span_count` columns.
    fn span_size(&self, _span_count: usize) -> usize {
        1
    }
}

/// A holder together with the renderer type it was created for.
#[derive(Clone)]
pub struct Holder {
    type_id: RendererTypeId,
    view: HolderRef,
}

impl Holder {
    pub(crate) fn new(type_id: RendererTypeId, view: HolderRef) -> Self {
        Self { type_id, view }
    }

    pub fn type_id(&self) -> RendererTypeId {
        self.type_id
    }

    pub fn view(&self) -> &HolderRef {
        &self.view
    }
}

impl fmt::Debug for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Holder")
            .field("type_id", &self.type_id)
            .finish_non_exhaustive()
    }
}
