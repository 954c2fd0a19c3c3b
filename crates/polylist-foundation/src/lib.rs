//! Sequence virtualization and renderer-type dispatch for polylist.
//!
//! The [`list`] module holds the two algorithmic pieces of the crate family:
//! the [`SequenceStore`](list::SequenceStore) that splices plain records and
//! paged ranges into one logical sequence, and the
//! [`TypeRegistry`](list::TypeRegistry) that maps record shapes to renderer
//! types.

pub mod list;

pub use list::*;
