//! Shared primitives for polylist.
//!
//! This crate holds the vocabulary every other polylist crate speaks: plain
//! [`Record`]s, externally-owned [`PagedRange`]s, and partial-update
//! [`Payload`]s.

pub mod collections;
mod paged;
mod payload;
mod record;

pub use paged::{PagedRange, RangeId};
pub use payload::Payload;
pub use record::{AsAny, Record, ShapeId, Tagged};
