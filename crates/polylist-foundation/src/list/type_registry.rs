//! Renderer-type registry.
//!
//! Maps [`ClassifierKey`]s to auto-assigned [`RendererTypeId`]s and those ids
//! to the registered binding. Ids start right above the reserved classifier
//! range so a caller-chosen classifier value can never collide with an
//! auto-assigned id.
//!
//! Resolution order for a position is fixed:
//! 1. the external classifier function, if it returns a value;
//! 2. the record's self-declared type tag;
//! 3. the paged-range sentinel, for positions inside a paged range;
//! 4. the record's runtime shape.
//!
//! Every step is looked up in the registry and the first registered key wins.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use polylist_core::collections::map::HashMap;
use polylist_core::{Record, ShapeId};
use smallvec::SmallVec;

use super::diagnostics::{Diagnostics, LOG_TARGET};
use super::entry::EntryView;
use super::extras::BindingExtras;

/// Upper bound (inclusive) for caller-chosen classifier values.
pub const RESERVED_TYPE_LIMIT: u32 = 100;

/// Renderer-type identifier handed to the rendering layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererTypeId(pub u32);

impl fmt::Display for RendererTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity used to look up the renderer of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassifierKey {
    /// Value returned by an external classifier function.
    Classifier(i32),
    /// Self-declared type tag carried by the record.
    Tag(i64),
    /// Every position backed by a paged range.
    PagedRange,
    /// Runtime shape of a plain record.
    Shape(ShapeId),
}

impl ClassifierKey {
    pub fn shape_of<T: Record>() -> Self {
        ClassifierKey::Shape(ShapeId::of::<T>())
    }
}

/// Caller-supplied classifier: `(entry, position)` to a small type value, or
/// `None` to fall through to the built-in resolution steps.
///
/// `position` is `None` when the entry is being checked for admission and
/// has no logical position yet.
pub type Classifier = Rc<dyn Fn(&EntryView<'_>, Option<usize>) -> Option<i32>>;

/// Anything that can turn an entry into its registered [`ClassifierKey`].
///
/// The sequence store uses this as its admission gate without depending on
/// the binding type.
pub trait KeyResolver {
    /// Returns the first registered key for `view`, or `None` if unregistered.
    fn resolve_key(&self, view: &EntryView<'_>, position: Option<usize>) -> Option<ClassifierKey>;

    fn is_registered(&self, view: &EntryView<'_>, position: Option<usize>) -> bool {
        self.resolve_key(view, position).is_some()
    }
}

impl<F> KeyResolver for F
where
    F: Fn(&EntryView<'_>, Option<usize>) -> Option<ClassifierKey>,
{
    fn resolve_key(&self, view: &EntryView<'_>, position: Option<usize>) -> Option<ClassifierKey> {
        self(view, position)
    }
}

struct BindingSlot<B: ?Sized> {
    binding: Rc<B>,
    extras: Rc<RefCell<BindingExtras>>,
}

/// Registry of renderer bindings of type `B`.
///
/// Bindings live as long as the registry; they are never unregistered.
pub struct TypeRegistry<B: ?Sized> {
    keys: HashMap<ClassifierKey, RendererTypeId>,
    slots: HashMap<RendererTypeId, BindingSlot<B>>,
    last_id: u32,
    reserved_limit: u32,
    diagnostics: Diagnostics,
}

impl<B: ?Sized> TypeRegistry<B> {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self::with_reserved_limit(RESERVED_TYPE_LIMIT, diagnostics)
    }

    /// Creates a registry whose auto-assigned ids start at `reserved_limit + 1`.
    pub fn with_reserved_limit(reserved_limit: u32, diagnostics: Diagnostics) -> Self {
        Self {
            keys: HashMap::default(),
            slots: HashMap::default(),
            last_id: reserved_limit,
            reserved_limit,
            diagnostics,
        }
    }

    pub fn reserved_limit(&self) -> u32 {
        self.reserved_limit
    }

    /// Registers `binding` for every key in `keys`.
    ///
    /// Each unknown key gets a fresh id; a key that is already registered
    /// keeps its id and binding. The returned ids are in `keys` order.
    /// Classifier keys must go through
    /// [`register_by_classifier`](Self::register_by_classifier) and are skipped.
    pub fn register_by_shape<I>(&mut self, binding: &Rc<B>, keys: I) -> SmallVec<[RendererTypeId; 4]>
    where
        I: IntoIterator<Item = ClassifierKey>,
    {
        let mut ids = SmallVec::new();
        for key in keys {
            if let ClassifierKey::Classifier(value) = key {
                self.diagnostics.reject(
                    "register_by_shape",
                    format_args!("classifier value {} must use register_by_classifier", value),
                );
                continue;
            }
            ids.push(self.register_key(binding, key));
        }
        ids
    }

    /// Registers `binding` for a caller-chosen classifier value.
    ///
    /// Values above the reserved limit are rejected so they cannot be
    /// confused with auto-assigned ids.
    pub fn register_by_classifier(&mut self, binding: &Rc<B>, value: i32) -> Option<RendererTypeId> {
        if i64::from(value) > i64::from(self.reserved_limit) {
            self.diagnostics.reject(
                "register_by_classifier",
                format_args!("value {} exceeds the reserved limit {}", value, self.reserved_limit),
            );
            return None;
        }
        Some(self.register_key(binding, ClassifierKey::Classifier(value)))
    }

    fn register_key(&mut self, binding: &Rc<B>, key: ClassifierKey) -> RendererTypeId {
        if let Some(&id) = self.keys.get(&key) {
            return id;
        }
        self.last_id += 1;
        let id = RendererTypeId(self.last_id);
        // Extras belong to the binding instance, not to one of its ids.
        let extras = self
            .slots
            .values()
            .find(|slot| Rc::ptr_eq(&slot.binding, binding))
            .map(|slot| Rc::clone(&slot.extras))
            .unwrap_or_default();
        self.slots.insert(
            id,
            BindingSlot {
                binding: Rc::clone(binding),
                extras,
            },
        );
        self.keys.insert(key, id);
        log::debug!(target: LOG_TARGET, "registered {:?} as renderer type {}", key, id);
        id
    }

    /// Id assigned to `key`, if registered.
    pub fn type_id_for(&self, key: &ClassifierKey) -> Option<RendererTypeId> {
        self.keys.get(key).copied()
    }

    pub fn binding_for(&self, id: RendererTypeId) -> Option<&Rc<B>> {
        self.slots.get(&id).map(|slot| &slot.binding)
    }

    pub fn extras(&self, id: RendererTypeId) -> Option<Rc<RefCell<BindingExtras>>> {
        self.slots.get(&id).map(|slot| Rc::clone(&slot.extras))
    }

    /// Resolves the renderer type for `view` using the fixed lookup order.
    pub fn resolve(
        &self,
        view: &EntryView<'_>,
        position: Option<usize>,
        classifier: Option<&Classifier>,
    ) -> Option<RendererTypeId> {
        self.resolve_key(view, position, classifier)
            .and_then(|key| self.type_id_for(&key))
    }

    /// Returns the first registered key in lookup order.
    pub fn resolve_key(
        &self,
        view: &EntryView<'_>,
        position: Option<usize>,
        classifier: Option<&Classifier>,
    ) -> Option<ClassifierKey> {
        candidate_keys(view, position, classifier)
            .into_iter()
            .find(|key| self.keys.contains_key(key))
    }

    pub fn is_registered(
        &self,
        view: &EntryView<'_>,
        position: Option<usize>,
        classifier: Option<&Classifier>,
    ) -> bool {
        self.resolve_key(view, position, classifier).is_some()
    }

    /// Number of assigned renderer types.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Registered renderer types in ascending id order.
    pub fn type_ids(&self) -> Vec<RendererTypeId> {
        let mut ids: Vec<RendererTypeId> = self.slots.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

fn candidate_keys(
    view: &EntryView<'_>,
    position: Option<usize>,
    classifier: Option<&Classifier>,
) -> SmallVec<[ClassifierKey; 4]> {
    let mut keys = SmallVec::new();
    if let Some(value) = classifier.and_then(|classify| classify(view, position)) {
        keys.push(ClassifierKey::Classifier(value));
    }
    match view {
        EntryView::Plain(record) => {
            if let Some(tag) = record.type_tag() {
                keys.push(ClassifierKey::Tag(tag));
            }
            keys.push(ClassifierKey::Shape(record.shape()));
        }
        EntryView::Paged { .. } => keys.push(ClassifierKey::PagedRange),
    }
    keys
}

/// A registry paired with the optional external classifier.
///
/// This is what the sequence store sees as its [`KeyResolver`].
pub struct Resolver<'a, B: ?Sized> {
    registry: &'a TypeRegistry<B>,
    classifier: Option<&'a Classifier>,
}

impl<'a, B: ?Sized> Resolver<'a, B> {
    pub fn new(registry: &'a TypeRegistry<B>, classifier: Option<&'a Classifier>) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    pub fn resolve(&self, view: &EntryView<'_>, position: Option<usize>) -> Option<RendererTypeId> {
        self.registry.resolve(view, position, self.classifier)
    }
}

impl<B: ?Sized> KeyResolver for Resolver<'_, B> {
    fn resolve_key(&self, view: &EntryView<'_>, position: Option<usize>) -> Option<ClassifierKey> {
        self.registry.resolve_key(view, position, self.classifier)
    }
}
