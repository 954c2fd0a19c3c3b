//! Plain records and their runtime shape identity.
//!
//! A [`Record`] is any in-memory value that can sit in a list. Its shape is
//! derived from the concrete Rust type, so registering a renderer for
//! `Photo` covers every `Photo` record without per-value bookkeeping.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime shape identity of a record type.
///
/// Equality and hashing only consider the [`TypeId`]; the type name is
/// carried for diagnostics.
#[derive(Clone, Copy)]
pub struct ShapeId {
    type_id: TypeId,
    name: &'static str,
}

impl ShapeId {
    /// Returns the shape identity of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified type name, for log messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without the module path.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for ShapeId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ShapeId {}

impl Hash for ShapeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeId({})", self.short_name())
    }
}

/// Upcast helper so trait objects can be downcast to their concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A plain in-memory list record.
///
/// Implementors usually need an empty `impl Record for MyType {}`. Override
/// [`Record::type_tag`] when several renderers share one Rust type and the
/// record itself knows which one it wants.
pub trait Record: AsAny + fmt::Debug + 'static {
    /// Explicit self-declared type tag. Checked before the runtime shape.
    fn type_tag(&self) -> Option<i64> {
        None
    }

    /// Runtime shape of this record.
    fn shape(&self) -> ShapeId {
        ShapeId::of::<Self>()
    }
}

impl dyn Record {
    /// Returns the record as `T` if that is its concrete type.
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        <dyn Record as AsAny>::as_any(self).downcast_ref::<T>()
    }

    pub fn is<T: Record>(&self) -> bool {
        <dyn Record as AsAny>::as_any(self).is::<T>()
    }
}

impl Record for String {}

/// A record that carries an explicit integer type tag next to its data.
///
/// Useful for headers, footers and section labels that share a payload type
/// but need different renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct Tagged<T> {
    pub tag: i64,
    pub data: Option<T>,
}

impl<T> Tagged<T> {
    /// A tagged record with no data.
    pub fn of(tag: i64) -> Self {
        Self { tag, data: None }
    }

    pub fn with(tag: i64, data: T) -> Self {
        Self {
            tag,
            data: Some(data),
        }
    }
}

impl<T: fmt::Debug + 'static> Record for Tagged<T> {
    fn type_tag(&self) -> Option<i64> {
        Some(self.tag)
    }
}
