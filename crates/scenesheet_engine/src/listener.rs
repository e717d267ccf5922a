//! Id-indexed listener registries.

use std::cell::{Cell, RefCell};

/// Handle returned by listener registration, used for removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// An ordered listener registry with stable registration ids.
///
/// Notification always runs over [`ListenerSet::snapshot`], so listeners may
/// register or remove entries while a pass is in flight without affecting it.
pub(crate) struct ListenerSet<F: Clone> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ListenerId, F)>>,
}

impl<F: Clone> ListenerSet<F> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, listener: F) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        self.entries.borrow_mut().push((id, listener));
        id
    }

    /// Remove by id, reporting whether an entry existed.
    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Copy of the current listeners in registration order.
    pub(crate) fn snapshot(&self) -> Vec<F> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub(crate) fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
