//! In-memory stand-in for a database cursor.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use polylist_core::PagedRange;

#[derive(Debug)]
struct CursorState<T> {
    rows: RefCell<Vec<T>>,
    position: Cell<Option<usize>>,
    closes: Cell<usize>,
}

/// Paged range over an in-memory row vector.
///
/// Every cursor comes with a [`CursorProbe`] that outlives it, so a test can
/// observe seeks and closes after the list took ownership of the cursor.
pub struct FakeCursor<T> {
    state: Rc<CursorState<T>>,
}

impl<T: fmt::Debug + 'static> FakeCursor<T> {
    pub fn new(rows: Vec<T>) -> (Self, CursorProbe<T>) {
        let state = Rc::new(CursorState {
            rows: RefCell::new(rows),
            position: Cell::new(None),
            closes: Cell::new(0),
        });
        let probe = CursorProbe {
            state: Rc::clone(&state),
        };
        (Self { state }, probe)
    }

    /// Same as [`new`](Self::new), boxed for
    /// [`ListAdapter::add_paged_range`](polylist_ui::ListAdapter::add_paged_range).
    pub fn boxed(rows: Vec<T>) -> (Box<dyn PagedRange>, CursorProbe<T>) {
        let (cursor, probe) = Self::new(rows);
        (Box::new(cursor), probe)
    }

    /// Row the cursor is positioned on.
    pub fn current_row(&self) -> Option<T>
    where
        T: Clone,
    {
        let position = self.state.position.get()?;
        self.state.rows.borrow().get(position).cloned()
    }
}

impl<T> fmt::Debug for FakeCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeCursor")
            .field("rows", &self.state.rows.borrow().len())
            .field("position", &self.state.position.get())
            .field("closes", &self.state.closes.get())
            .finish()
    }
}

impl<T: fmt::Debug + 'static> PagedRange for FakeCursor<T> {
    fn count(&self) -> usize {
        self.state.rows.borrow().len()
    }

    fn seek(&mut self, local_offset: usize) {
        self.state.position.set(Some(local_offset));
    }

    fn is_open(&self) -> bool {
        self.state.closes.get() == 0
    }

    fn close(&mut self) {
        self.state.closes.set(self.state.closes.get() + 1);
    }
}

/// Test-side view of a [`FakeCursor`].
pub struct CursorProbe<T> {
    state: Rc<CursorState<T>>,
}

impl<T> CursorProbe<T> {
    pub fn close_count(&self) -> usize {
        self.state.closes.get()
    }

    pub fn is_closed(&self) -> bool {
        self.close_count() > 0
    }

    /// Last offset the cursor was seeked to.
    pub fn position(&self) -> Option<usize> {
        self.state.position.get()
    }

    /// Simulates the external dataset growing.
    pub fn push_row(&self, row: T) {
        self.state.rows.borrow_mut().push(row);
    }

    /// Simulates the external dataset shrinking to `len` rows.
    pub fn truncate(&self, len: usize) {
        self.state.rows.borrow_mut().truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_observes_the_boxed_cursor() {
        let (mut cursor, probe) = FakeCursor::boxed(vec!["a", "b"]);
        cursor.seek(1);
        assert_eq!(probe.position(), Some(1));
        assert_eq!(cursor.downcast_ref::<FakeCursor<&str>>().unwrap().current_row(), Some("b"));

        probe.push_row("c");
        assert_eq!(cursor.count(), 3);

        cursor.close();
        assert!(!cursor.is_open());
        assert_eq!(probe.close_count(), 1);
    }
}
