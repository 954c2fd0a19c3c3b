//! Adapter surface of polylist.
//!
//! [`ListAdapter`] owns a sequence store and a type registry and is the only
//! thing a rendering layer talks to: it answers item counts and renderer types,
//! creates and binds view holders, and forwards every structural change to a
//! [`NotificationSink`].

pub mod adapter;

pub use adapter::*;
