//! The adapter a rendering layer binds a list to.

use std::cell::RefCell;
use std::rc::Rc;

use polylist_core::{PagedRange, Payload, Record};
use polylist_foundation::{
    BindingExtras, Change, Classifier, ClassifierKey, Diagnostics, Entry, EntryView, ListError, RendererTypeId,
    Resolver, Result, SequenceStore, TypeRegistry, LOG_TARGET,
};
use smallvec::SmallVec;

use super::binding::{Holder, RendererBinding};
use super::lifecycle::{LifecycleEvent, LifecycleObservers};
use super::notification::{notify, NotificationSink};
use super::spec::AdapterSpec;

struct ActiveAdapter {
    store: SequenceStore,
    registry: TypeRegistry<dyn RendererBinding>,
    classifier: Option<Classifier>,
    observers: LifecycleObservers,
}

impl ActiveAdapter {
    fn split(&mut self) -> (&mut SequenceStore, Resolver<'_, dyn RendererBinding>) {
        let resolver = Resolver::new(&self.registry, self.classifier.as_ref());
        (&mut self.store, resolver)
    }

    fn binding(&self, type_id: RendererTypeId) -> Result<&Rc<dyn RendererBinding>> {
        self.registry
            .binding_for(type_id)
            .ok_or(ListError::UnknownRendererType { type_id })
    }

    fn renderer_type_at(&mut self, position: usize) -> Result<RendererTypeId> {
        let view = self.store.get(position)?;
        self.registry
            .resolve(&view, Some(position), self.classifier.as_ref())
            .ok_or_else(|| ListError::Unregistered {
                position,
                shape: view.describe(),
            })
    }
}

enum AdapterState {
    Active(Box<ActiveAdapter>),
    TornDown,
}

/// Binds a logical sequence of records and paged ranges to renderer bindings.
///
/// Mutations validate their input, apply the edit to the backing
/// [`SequenceStore`] and forward the resulting [`Change`] to the attached
/// [`NotificationSink`]. Rejected mutations return `None` and notify nothing.
///
/// The adapter is single-threaded: it is neither `Send` nor `Sync`.
///
/// Once torn down (by [`LifecycleEvent::Destroy`] or
/// [`tear_down`](Self::tear_down)) the adapter stays torn down: every owned
/// range has been closed, queries fail with [`ListError::TornDown`] and
/// mutations are no-ops.
pub struct ListAdapter {
    spec: AdapterSpec,
    diagnostics: Diagnostics,
    state: AdapterState,
    sink: Option<Rc<dyn NotificationSink>>,
}

impl Default for ListAdapter {
    fn default() -> Self {
        Self::new(AdapterSpec::default())
    }
}

impl ListAdapter {
    pub fn new(spec: AdapterSpec) -> Self {
        let diagnostics = spec.diagnostics_mode();
        let active = ActiveAdapter {
            store: SequenceStore::new(diagnostics),
            registry: TypeRegistry::with_reserved_limit(spec.reserved_type_limit, diagnostics),
            classifier: None,
            observers: LifecycleObservers::new(),
        };
        Self {
            spec,
            diagnostics,
            state: AdapterState::Active(Box::new(active)),
            sink: None,
        }
    }

    pub fn spec(&self) -> &AdapterSpec {
        &self.spec
    }

    pub fn attach_sink(&mut self, sink: Rc<dyn NotificationSink>) {
        self.sink = Some(sink);
    }

    pub fn detach_sink(&mut self) -> Option<Rc<dyn NotificationSink>> {
        self.sink.take()
    }

    /// Installs the external classifier consulted first for every position.
    ///
    /// Returning `None` falls through to the record's tag, the paged-range
    /// sentinel and finally the record's shape.
    pub fn set_classifier<F>(&mut self, classifier: F)
    where
        F: Fn(&EntryView<'_>, Option<usize>) -> Option<i32> + 'static,
    {
        if let Some(active) = self.active_mut("set_classifier") {
            active.classifier = Some(Rc::new(classifier));
        }
    }

    pub fn clear_classifier(&mut self) {
        if let Some(active) = self.active_mut("clear_classifier") {
            active.classifier = None;
        }
    }

    // -- registration --------------------------------------------------------

    /// Registers `binding` for each of `keys`; see
    /// [`TypeRegistry::register_by_shape`].
    pub fn register_by_shape<I>(
        &mut self,
        binding: &Rc<dyn RendererBinding>,
        keys: I,
    ) -> SmallVec<[RendererTypeId; 4]>
    where
        I: IntoIterator<Item = ClassifierKey>,
    {
        match self.active_mut("register_by_shape") {
            Some(active) => active.registry.register_by_shape(binding, keys),
            None => SmallVec::new(),
        }
    }

    /// Registers `binding` for plain records of type `T`.
    pub fn register<T: Record>(&mut self, binding: &Rc<dyn RendererBinding>) -> Option<RendererTypeId> {
        self.register_by_shape(binding, [ClassifierKey::shape_of::<T>()])
            .first()
            .copied()
    }

    /// Registers `binding` for records declaring type tag `tag`.
    pub fn register_tag(&mut self, binding: &Rc<dyn RendererBinding>, tag: i64) -> Option<RendererTypeId> {
        self.register_by_shape(binding, [ClassifierKey::Tag(tag)])
            .first()
            .copied()
    }

    /// Registers `binding` for every position backed by a paged range.
    pub fn register_paged_range(&mut self, binding: &Rc<dyn RendererBinding>) -> Option<RendererTypeId> {
        self.register_by_shape(binding, [ClassifierKey::PagedRange])
            .first()
            .copied()
    }

    pub fn register_by_classifier(
        &mut self,
        binding: &Rc<dyn RendererBinding>,
        value: i32,
    ) -> Option<RendererTypeId> {
        self.active_mut("register_by_classifier")
            .and_then(|active| active.registry.register_by_classifier(binding, value))
    }

    // -- queries -------------------------------------------------------------

    /// Logical size; 0 once torn down.
    pub fn item_count(&self) -> usize {
        match &self.state {
            AdapterState::Active(active) => active.store.size(),
            AdapterState::TornDown => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Physical backing entries; empty once torn down.
    pub fn entries(&self) -> &[Entry] {
        match &self.state {
            AdapterState::Active(active) => active.store.entries(),
            AdapterState::TornDown => &[],
        }
    }

    pub fn paged_range_count(&self) -> usize {
        match &self.state {
            AdapterState::Active(active) => active.store.paged_range_count(),
            AdapterState::TornDown => 0,
        }
    }

    pub fn renderer_type_at(&mut self, position: usize) -> Result<RendererTypeId> {
        self.active()?.renderer_type_at(position)
    }

    /// Entry at `position`; paged ranges are seeked to the row first.
    pub fn record_at(&mut self, position: usize) -> Result<EntryView<'_>> {
        self.active()?.store.get(position)
    }

    /// Grid columns the item at `position` takes out of `span_count`.
    pub fn span_size_at(&mut self, position: usize, span_count: usize) -> Result<usize> {
        let active = self.active()?;
        let type_id = active.renderer_type_at(position)?;
        let binding = active.binding(type_id)?;
        if binding.is_full_span() {
            return Ok(span_count);
        }
        Ok(binding.span_size(span_count).clamp(1, span_count.max(1)))
    }

    pub fn is_full_span(&self, type_id: RendererTypeId) -> Result<bool> {
        Ok(self.active_ref()?.binding(type_id)?.is_full_span())
    }

    pub fn binding_for(&self, type_id: RendererTypeId) -> Result<Rc<dyn RendererBinding>> {
        self.active_ref()?.binding(type_id).map(Rc::clone)
    }

    /// Extras shared by every renderer type of the binding behind `type_id`.
    pub fn extras(&self, type_id: RendererTypeId) -> Result<Rc<RefCell<BindingExtras>>> {
        self.active_ref()?
            .registry
            .extras(type_id)
            .ok_or(ListError::UnknownRendererType { type_id })
    }

    /// Registered renderer types, ascending.
    pub fn renderer_types(&self) -> Vec<RendererTypeId> {
        match &self.state {
            AdapterState::Active(active) => active.registry.type_ids(),
            AdapterState::TornDown => Vec::new(),
        }
    }

    /// First position whose record resolves to the same key as `record`.
    pub fn find_logical_index(&self, record: &Rc<dyn Record>) -> Option<usize> {
        let AdapterState::Active(active) = &self.state else {
            return None;
        };
        let resolver = Resolver::new(&active.registry, active.classifier.as_ref());
        active.store.find_logical_index(record, &resolver)
    }

    // -- holders -------------------------------------------------------------

    /// Creates a holder for `type_id` through its binding.
    ///
    /// Holders of lifecycle-aware bindings are subscribed to host lifecycle
    /// events for as long as the caller keeps them alive.
    pub fn create_holder(&mut self, type_id: RendererTypeId) -> Result<Holder> {
        let active = self.active()?;
        let binding = Rc::clone(active.binding(type_id)?);
        let extras = active
            .registry
            .extras(type_id)
            .ok_or(ListError::UnknownRendererType { type_id })?;
        let view = binding.create_holder(type_id, extras);
        if binding.supports_lifecycle() {
            active.observers.subscribe(&view);
        }
        Ok(Holder::new(type_id, view))
    }

    /// Full bind of `holder` from `position`.
    pub fn bind_holder(&mut self, holder: &Holder, position: usize) -> Result<()> {
        let entry = self.active()?.store.get(position)?;
        holder.view().borrow_mut().bind(position, entry);
        Ok(())
    }

    /// Partial bind of `holder`, once per payload. An empty payload list is a
    /// full bind.
    pub fn bind_holder_partial(&mut self, holder: &Holder, position: usize, payloads: &[Payload]) -> Result<()> {
        if payloads.is_empty() {
            return self.bind_holder(holder, position);
        }
        let entry = self.active()?.store.get(position)?;
        let mut view = holder.view().borrow_mut();
        for payload in payloads {
            view.bind_partial(position, entry, payload);
        }
        Ok(())
    }

    // -- mutations -----------------------------------------------------------

    /// Replaces every entry with `records`, closing owned ranges.
    pub fn set_data(&mut self, records: Vec<Rc<dyn Record>>) -> Option<Change> {
        let change = self.active_mut("set_data").and_then(|active| {
            let (store, resolver) = active.split();
            store.set_data(records, &resolver)
        });
        self.emit(change)
    }

    /// Inserts `records` at logical `index`.
    pub fn add(&mut self, index: usize, records: Vec<Rc<dyn Record>>) -> Option<Change> {
        let change = self.active_mut("add").and_then(|active| {
            let (store, resolver) = active.split();
            store.insert_plain(index, records, &resolver)
        });
        self.emit(change)
    }

    pub fn add_first(&mut self, records: Vec<Rc<dyn Record>>) -> Option<Change> {
        self.add(0, records)
    }

    pub fn add_last(&mut self, records: Vec<Rc<dyn Record>>) -> Option<Change> {
        let size = self.item_count();
        self.add(size, records)
    }

    /// Splices `range` in at logical `index`.
    ///
    /// On success the adapter owns the range and closes it when it leaves the
    /// list. A rejected range is returned to the caller unclosed.
    pub fn add_paged_range(
        &mut self,
        index: usize,
        range: Box<dyn PagedRange>,
    ) -> std::result::Result<Change, Box<dyn PagedRange>> {
        let Some(active) = self.active_mut("add_paged_range") else {
            return Err(range);
        };
        let (store, resolver) = active.split();
        let change = store.insert_paged_range(index, range, &resolver)?;
        self.dispatch(&change);
        Ok(change)
    }

    pub fn add_paged_range_first(
        &mut self,
        range: Box<dyn PagedRange>,
    ) -> std::result::Result<Change, Box<dyn PagedRange>> {
        self.add_paged_range(0, range)
    }

    pub fn add_paged_range_last(
        &mut self,
        range: Box<dyn PagedRange>,
    ) -> std::result::Result<Change, Box<dyn PagedRange>> {
        let size = self.item_count();
        self.add_paged_range(size, range)
    }

    /// Removes `count` positions starting at `index`.
    ///
    /// The removal is announced even when the slice is rejected (for
    /// instance because it would cut a paged range in two).
    pub fn remove_range(&mut self, index: usize, count: usize) -> Option<Change> {
        let change = self
            .active_mut("remove_range")
            .map(|active| active.store.remove_range(index, count));
        self.emit(change)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Change> {
        self.remove_range(index, 1)
    }

    pub fn remove_first(&mut self, count: usize) -> Option<Change> {
        self.remove_range(0, count)
    }

    pub fn remove_last(&mut self, count: usize) -> Option<Change> {
        let change = self
            .active_mut("remove_last")
            .map(|active| active.store.remove_last(count));
        self.emit(change)
    }

    /// Removes one position per record found by key. Records not in the list
    /// are skipped.
    pub fn remove_records(&mut self, records: &[Rc<dyn Record>]) -> Vec<Change> {
        let changes = match self.active_mut("remove_records") {
            Some(active) => {
                let (store, resolver) = active.split();
                store.remove_records(records, &resolver)
            }
            None => Vec::new(),
        };
        for change in &changes {
            self.dispatch(change);
        }
        changes
    }

    /// Replaces the record at `index` and announces a (partial) change.
    pub fn update(&mut self, index: usize, record: Rc<dyn Record>, payload: Option<Payload>) -> Option<Change> {
        let change = self.active_mut("update").and_then(|active| {
            let (store, resolver) = active.split();
            store.update(index, Some(record), payload, &resolver)
        });
        self.emit(change)
    }

    /// Finds `record` by key and replaces what is stored there with it.
    pub fn update_record(&mut self, record: Rc<dyn Record>, payload: Option<Payload>) -> Option<Change> {
        let change = self.active_mut("update_record").and_then(|active| {
            let (store, resolver) = active.split();
            store.update_record(record, payload, &resolver)
        });
        self.emit(change)
    }

    /// Announces that the item at `index` changed without replacing it.
    pub fn notify_changed(&mut self, index: usize, payload: Option<Payload>) -> Option<Change> {
        let change = self.active_mut("notify_changed").and_then(|active| {
            let (store, resolver) = active.split();
            store.update(index, None, payload, &resolver)
        });
        self.emit(change)
    }

    /// Exchanges the plain records at `from` and `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Option<Change> {
        let change = self
            .active_mut("move_item")
            .and_then(|active| active.store.swap(from, to));
        self.emit(change)
    }

    // -- lifecycle -----------------------------------------------------------

    /// Forwards a host lifecycle event to subscribed holders.
    ///
    /// [`LifecycleEvent::Destroy`] also tears the adapter down.
    pub fn on_lifecycle_event(&mut self, event: LifecycleEvent) {
        if event == LifecycleEvent::Destroy {
            self.tear_down();
            return;
        }
        if let AdapterState::Active(active) = &mut self.state {
            active.observers.dispatch(event);
        }
    }

    /// Sends `Destroy` to subscribed holders, closes every owned range and
    /// drops the registry. Calling it again does nothing.
    pub fn tear_down(&mut self) {
        let AdapterState::Active(active) = std::mem::replace(&mut self.state, AdapterState::TornDown) else {
            return;
        };
        let ActiveAdapter {
            store,
            registry,
            mut observers,
            ..
        } = *active;
        observers.dispatch(LifecycleEvent::Destroy);
        store.clear();
        log::debug!(target: LOG_TARGET, "adapter torn down with {} renderer type(s)", registry.len());
    }

    pub fn is_torn_down(&self) -> bool {
        matches!(self.state, AdapterState::TornDown)
    }

    fn active(&mut self) -> Result<&mut ActiveAdapter> {
        match &mut self.state {
            AdapterState::Active(active) => Ok(&mut **active),
            AdapterState::TornDown => Err(ListError::TornDown),
        }
    }

    fn active_ref(&self) -> Result<&ActiveAdapter> {
        match &self.state {
            AdapterState::Active(active) => Ok(&**active),
            AdapterState::TornDown => Err(ListError::TornDown),
        }
    }

    fn active_mut(&mut self, operation: &str) -> Option<&mut ActiveAdapter> {
        match &mut self.state {
            AdapterState::Active(active) => Some(&mut **active),
            AdapterState::TornDown => {
                self.diagnostics
                    .reject(operation, format_args!("adapter is torn down"));
                None
            }
        }
    }

    fn emit(&self, change: Option<Change>) -> Option<Change> {
        if let Some(change) = &change {
            self.dispatch(change);
        }
        change
    }

    fn dispatch(&self, change: &Change) {
        if let Some(sink) = &self.sink {
            notify(sink.as_ref(), change);
        }
    }
}

impl Drop for ListAdapter {
    fn drop(&mut self) {
        self.tear_down();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::adapter::{HolderRef, ViewHolder};

    #[derive(Debug)]
    struct Note(&'static str);
    impl Record for Note {}

    #[derive(Debug)]
    struct Banner;
    impl Record for Banner {}

    #[derive(Default)]
    struct NoteHolder {
        bound: Vec<usize>,
        partial: Vec<i32>,
        events: Vec<LifecycleEvent>,
    }

    impl ViewHolder for NoteHolder {
        fn bind(&mut self, position: usize, _entry: EntryView<'_>) {
            self.bound.push(position);
        }
        fn bind_partial(&mut self, _position: usize, _entry: EntryView<'_>, payload: &Payload) {
            self.partial.push(payload.kind());
        }
        fn on_lifecycle_event(&mut self, event: LifecycleEvent) {
            self.events.push(event);
        }
    }

    struct NoteBinding {
        lifecycle: bool,
        full_span: bool,
        created: Cell<usize>,
        last: RefCell<Option<Rc<RefCell<NoteHolder>>>>,
    }

    impl NoteBinding {
        fn new(lifecycle: bool, full_span: bool) -> Rc<Self> {
            Rc::new(Self {
                lifecycle,
                full_span,
                created: Cell::new(0),
                last: RefCell::new(None),
            })
        }
    }

    impl RendererBinding for NoteBinding {
        fn create_holder(&self, _type_id: RendererTypeId, _extras: Rc<RefCell<BindingExtras>>) -> HolderRef {
            self.created.set(self.created.get() + 1);
            let holder = Rc::new(RefCell::new(NoteHolder::default()));
            *self.last.borrow_mut() = Some(Rc::clone(&holder));
            holder
        }
        fn supports_lifecycle(&self) -> bool {
            self.lifecycle
        }
        fn is_full_span(&self) -> bool {
            self.full_span
        }
    }

    fn note(text: &'static str) -> Rc<dyn Record> {
        Rc::new(Note(text))
    }

    #[test]
    fn registration_feeds_renderer_type_lookup() {
        let mut adapter = ListAdapter::default();
        let binding: Rc<dyn RendererBinding> = NoteBinding::new(false, false);
        let id = adapter.register::<Note>(&binding).unwrap();
        assert_eq!(id, RendererTypeId(101));

        adapter.add_last(vec![note("a"), Rc::new(Banner), note("b")]);
        assert_eq!(adapter.item_count(), 2);
        assert_eq!(adapter.renderer_type_at(1), Ok(id));
        assert_eq!(
            adapter.renderer_type_at(2),
            Err(ListError::OutOfRange { position: 2, size: 2 })
        );
    }

    #[test]
    fn classifier_values_take_precedence() {
        let mut adapter = ListAdapter::default();
        let shape: Rc<dyn RendererBinding> = NoteBinding::new(false, false);
        let pinned: Rc<dyn RendererBinding> = NoteBinding::new(false, true);
        let shape_id = adapter.register::<Note>(&shape).unwrap();
        let pinned_id = adapter.register_by_classifier(&pinned, 7).unwrap();
        assert_eq!(pinned_id, RendererTypeId(102));

        adapter.set_classifier(|view: &EntryView<'_>, _: Option<usize>| {
            let note = view.as_record()?.downcast_ref::<Note>()?;
            (note.0 == "pinned").then_some(7)
        });
        adapter.add_last(vec![note("pinned"), note("plain")]);

        assert_eq!(adapter.renderer_type_at(0), Ok(pinned_id));
        assert_eq!(adapter.renderer_type_at(1), Ok(shape_id));
        assert_eq!(adapter.span_size_at(0, 3), Ok(3));
        assert_eq!(adapter.span_size_at(1, 3), Ok(1));
        assert_eq!(adapter.is_full_span(pinned_id), Ok(true));
    }

    #[test]
    fn holders_bind_fully_or_per_payload() {
        let mut adapter = ListAdapter::default();
        let binding = NoteBinding::new(false, false);
        let dyn_binding: Rc<dyn RendererBinding> = binding.clone();
        let id = adapter.register::<Note>(&dyn_binding).unwrap();
        adapter.add_last(vec![note("a"), note("b")]);

        let holder = adapter.create_holder(id).unwrap();
        assert_eq!(holder.type_id(), id);
        adapter.bind_holder(&holder, 1).unwrap();
        adapter
            .bind_holder_partial(&holder, 0, &[Payload::new(1), Payload::new(2)])
            .unwrap();
        adapter.bind_holder_partial(&holder, 0, &[]).unwrap();

        let created = binding.last.borrow().clone().unwrap();
        assert_eq!(created.borrow().bound, vec![1, 0]);
        assert_eq!(created.borrow().partial, vec![1, 2]);
        assert_eq!(
            adapter.create_holder(RendererTypeId(5)).err(),
            Some(ListError::UnknownRendererType {
                type_id: RendererTypeId(5)
            })
        );
    }

    #[test]
    fn lifecycle_reaches_subscribed_holders_and_destroy_tears_down() {
        let mut adapter = ListAdapter::default();
        let aware = NoteBinding::new(true, false);
        let dyn_aware: Rc<dyn RendererBinding> = aware.clone();
        let id = adapter.register::<Note>(&dyn_aware).unwrap();
        adapter.add_last(vec![note("a")]);
        let _holder = adapter.create_holder(id).unwrap();

        adapter.on_lifecycle_event(LifecycleEvent::Pause);
        adapter.on_lifecycle_event(LifecycleEvent::Destroy);

        let created = aware.last.borrow().clone().unwrap();
        assert_eq!(
            created.borrow().events,
            vec![LifecycleEvent::Pause, LifecycleEvent::Destroy]
        );
        assert!(adapter.is_torn_down());
        assert_eq!(adapter.item_count(), 0);
        assert_eq!(adapter.renderer_type_at(0), Err(ListError::TornDown));
        assert!(adapter.add_last(vec![note("b")]).is_none());
        assert!(adapter.renderer_types().is_empty());
    }

    #[test]
    fn extras_are_shared_across_a_bindings_types() {
        let mut adapter = ListAdapter::default();
        let binding: Rc<dyn RendererBinding> = NoteBinding::new(false, false);
        let ids = adapter.register_by_shape(
            &binding,
            [ClassifierKey::shape_of::<Note>(), ClassifierKey::shape_of::<Banner>()],
        );
        assert_eq!(ids.len(), 2);

        adapter.extras(ids[0]).unwrap().borrow_mut().put("columns", 2usize);
        let columns = adapter.extras(ids[1]).unwrap().borrow().get::<usize>("columns");
        assert_eq!(columns.map(|value| *value), Ok(2));
    }
}
