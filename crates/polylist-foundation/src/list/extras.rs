//! Per-binding key/value storage shared with every holder the binding creates.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use polylist_core::collections::map::HashMap;

use super::error::{ListError, Result};

/// Arbitrary values a renderer binding wants its holders to see, such as an
/// image loader or a click handler.
#[derive(Default)]
pub struct BindingExtras {
    values: HashMap<String, Rc<dyn Any>>,
}

impl BindingExtras {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Any) {
        self.values.insert(key.into(), Rc::new(value));
    }

    /// Reads a value stored with [`put`](Self::put).
    ///
    /// Reading a key that was never stored is a programming error in the
    /// binding and is reported as [`ListError::MissingExtra`].
    pub fn get<V: Any>(&self, key: &str) -> Result<Rc<V>> {
        let value = self.values.get(key).ok_or_else(|| ListError::MissingExtra {
            key: key.to_string(),
        })?;
        Rc::clone(value)
            .downcast::<V>()
            .map_err(|_| ListError::ExtraTypeMismatch {
                key: key.to_string(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for BindingExtras {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingExtras")
            .field("len", &self.values.len())
            .finish()
    }
}
