//! Partial-update payloads.
//!
//! A [`Payload`] travels with a "changed" notification so a renderer can
//! redraw only what changed (a like counter, a download progress bar) instead
//! of rebinding the whole item.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::collections::map::HashMap;

/// Describes a non-structural change to one item.
///
/// `kind` is a caller-defined discriminator; values are looked up by key and
/// downcast on read.
#[derive(Clone, Default)]
pub struct Payload {
    kind: i32,
    values: HashMap<String, Rc<dyn Any>>,
}

impl Payload {
    pub fn new(kind: i32) -> Self {
        Self {
            kind,
            values: HashMap::default(),
        }
    }

    /// Attaches a value under `key`, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Any) -> Self {
        self.values.insert(key.into(), Rc::new(value));
        self
    }

    pub fn kind(&self) -> i32 {
        self.kind
    }

    /// Returns the value under `key` if present and of type `V`.
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
        self.values.get(key).and_then(|value| value.downcast_ref::<V>())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Payload")
            .field("kind", &self.kind)
            .field("keys", &keys)
            .finish()
    }
}
