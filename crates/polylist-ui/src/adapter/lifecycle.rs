//! Host lifecycle forwarding to view holders.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use polylist_foundation::LOG_TARGET;

use super::binding::{HolderRef, ViewHolder};

/// Lifecycle of the screen hosting the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Create,
    Start,
    Resume,
    Pause,
    Stop,
    /// Final event; the adapter tears itself down after forwarding it.
    Destroy,
}

/// Holders subscribed to lifecycle events.
///
/// Subscriptions are weak: a holder the rendering layer dropped is pruned on
/// the next subscribe or dispatch.
#[derive(Default)]
pub struct LifecycleObservers {
    holders: Vec<Weak<RefCell<dyn ViewHolder>>>,
}

impl LifecycleObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, holder: &HolderRef) {
        self.prune();
        self.holders.push(Rc::downgrade(holder));
    }

    /// Number of holders still alive.
    pub fn len(&self) -> usize {
        self.holders
            .iter()
            .filter(|holder| holder.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forwards `event` to every live holder.
    ///
    /// A holder that is mutably borrowed at the time (it is dispatching the
    /// event itself) is skipped.
    pub fn dispatch(&mut self, event: LifecycleEvent) {
        self.prune();
        log::debug!(target: LOG_TARGET, "{:?} -> {} holder(s)", event, self.holders.len());
        for holder in self.holders.iter().filter_map(Weak::upgrade) {
            match holder.try_borrow_mut() {
                Ok(mut holder) => holder.on_lifecycle_event(event),
                Err(_) => log::debug!(target: LOG_TARGET, "skipped busy holder for {:?}", event),
            }
        }
    }

    fn prune(&mut self) {
        self.holders.retain(|holder| holder.strong_count() > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polylist_foundation::EntryView;

    #[derive(Default)]
    struct Recorder {
        events: Vec<LifecycleEvent>,
    }

    impl ViewHolder for Recorder {
        fn bind(&mut self, _position: usize, _entry: EntryView<'_>) {}

        fn on_lifecycle_event(&mut self, event: LifecycleEvent) {
            self.events.push(event);
        }
    }

    #[test]
    fn events_reach_live_holders_only() {
        let kept = Rc::new(RefCell::new(Recorder::default()));
        let dropped = Rc::new(RefCell::new(Recorder::default()));
        let kept_ref: HolderRef = kept.clone();
        let dropped_ref: HolderRef = dropped.clone();

        let mut observers = LifecycleObservers::new();
        observers.subscribe(&kept_ref);
        observers.subscribe(&dropped_ref);
        assert_eq!(observers.len(), 2);

        drop(dropped_ref);
        drop(dropped);
        observers.dispatch(LifecycleEvent::Pause);
        observers.dispatch(LifecycleEvent::Resume);

        assert_eq!(observers.len(), 1);
        assert_eq!(
            kept.borrow().events,
            vec![LifecycleEvent::Pause, LifecycleEvent::Resume]
        );
    }

    #[test]
    fn dropped_holders_do_not_accumulate_between_events() {
        let mut observers = LifecycleObservers::new();
        for _ in 0..1_000 {
            let holder: HolderRef = Rc::new(RefCell::new(Recorder::default()));
            observers.subscribe(&holder);
        }
        assert!(observers.holders.len() <= 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn busy_holders_are_skipped() {
        let holder = Rc::new(RefCell::new(Recorder::default()));
        let holder_ref: HolderRef = holder.clone();
        let mut observers = LifecycleObservers::new();
        observers.subscribe(&holder_ref);

        {
            let _busy = holder.borrow_mut();
            observers.dispatch(LifecycleEvent::Stop);
        }
        assert!(holder.borrow().events.is_empty());
    }
}
