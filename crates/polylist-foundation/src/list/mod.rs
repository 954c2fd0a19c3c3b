//! Logical sequence and renderer-type dispatch.

mod change;
mod diagnostics;
mod entry;
mod error;
mod extras;
mod sequence_store;
mod type_registry;

pub use change::Change;
pub use diagnostics::{Diagnostics, LOG_TARGET};
pub use entry::{Entry, EntryView, PagedEntry};
pub use error::{ListError, Result};
pub use extras::BindingExtras;
pub use sequence_store::SequenceStore;
pub use type_registry::{
    Classifier, ClassifierKey, KeyResolver, RendererTypeId, Resolver, TypeRegistry,
    RESERVED_TYPE_LIMIT,
};
