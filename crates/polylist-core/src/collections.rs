//! Hash map aliases used across polylist.
//!
//! Registry and extras lookups are keyed by small integers and `TypeId`s, so
//! the Fx hasher is the default. Enable the `std-hash` feature to fall back to
//! the SipHash-based std maps.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::hash_map::Entry;
    pub use std::collections::{HashMap, HashSet};
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
    pub use std::collections::hash_map::Entry;
}
