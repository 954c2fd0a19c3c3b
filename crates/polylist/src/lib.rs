//! Heterogeneous, cursor-backed list adapters.
//!
//! A list is a splice of plain in-memory records and externally-owned paged
//! ranges (database-style cursors). [`ListAdapter`] presents it to a
//! rendering layer as one flat sequence of positions, picks a renderer for
//! each position from the registered [`RendererBinding`]s, and reports every
//! structural change through a [`NotificationSink`].

pub use polylist_core::{collections, AsAny, PagedRange, Payload, RangeId, Record, ShapeId, Tagged};
pub use polylist_foundation::{
    BindingExtras, Change, Classifier, ClassifierKey, Diagnostics, Entry, EntryView, KeyResolver,
    ListError, PagedEntry, RendererTypeId, Resolver, Result, SequenceStore, TypeRegistry,
    LOG_TARGET, RESERVED_TYPE_LIMIT,
};
pub use polylist_ui::{
    notify, AdapterSpec, Holder, HolderRef, LifecycleEvent, LifecycleObservers, ListAdapter,
    NotificationSink, RendererBinding, ViewHolder,
};

pub mod prelude {
    pub use crate::{
        AdapterSpec, BindingExtras, Change, ClassifierKey, EntryView, Holder, HolderRef,
        LifecycleEvent, ListAdapter, ListError, NotificationSink, PagedRange, Payload, Record,
        RendererBinding, RendererTypeId, Tagged, ViewHolder,
    };
}
