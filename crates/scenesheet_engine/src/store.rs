//! The ordered rule list and its deferred-notification batch.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;

use crate::error::StyleError;
use crate::listener::{ListenerId, ListenerSet};
use crate::rule::StyleRule;

/// Callback invoked with each flushed batch of newly added rules.
pub type RulesAddedListener = Rc<dyn Fn(&[Rc<StyleRule>]) -> Result<(), StyleError>>;

/// Holds every declared rule sorted by ascending specificity.
///
/// New rules join the sorted list immediately and are matchable from that
/// point on. Notification is deferred: added rules accumulate in a pending
/// batch until [`RuleStore::process`] flushes them to listeners.
pub struct RuleStore {
    rules: RefCell<Vec<Rc<StyleRule>>>,
    pending: RefCell<Vec<Rc<StyleRule>>>,
    dirty: Cell<bool>,
    rules_added_listeners: ListenerSet<RulesAddedListener>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self {
            rules: RefCell::new(Vec::new()),
            pending: RefCell::new(Vec::new()),
            dirty: Cell::new(false),
            rules_added_listeners: ListenerSet::new(),
        }
    }

    /// Insert `rule` keeping the list sorted by specificity, ties resolved
    /// by insertion order. The rule becomes visible to iteration at once;
    /// listeners hear about it on the next [`RuleStore::process`].
    pub fn add_rule(&self, rule: Rc<StyleRule>) {
        let mut rules = self.rules.borrow_mut();
        let index = rules.partition_point(|existing| existing.specificity() <= rule.specificity());
        rules.insert(index, Rc::clone(&rule));
        drop(rules);
        self.pending.borrow_mut().push(rule);
        self.dirty.set(true);
    }

    /// Flush the pending batch to every rules-added listener.
    ///
    /// All listeners see the same batch. If one fails, the batch stays
    /// pending and the error propagates; the next call re-delivers it.
    pub fn process(&self) -> Result<(), StyleError> {
        if !self.dirty.get() {
            return Ok(());
        }
        let batch: Vec<_> = self.pending.borrow().clone();
        debug!("flushing {} added rule(s)", batch.len());
        for listener in self.rules_added_listeners.snapshot() {
            listener(&batch)?;
        }
        self.pending.borrow_mut().clear();
        self.dirty.set(false);
        Ok(())
    }

    /// Visit every rule in ascending specificity order.
    ///
    /// Iterates a snapshot, so `visit` may declare further rules.
    pub fn each_rule(&self, mut visit: impl FnMut(&Rc<StyleRule>)) {
        let rules: Vec<_> = self.rules.borrow().clone();
        for rule in &rules {
            visit(rule);
        }
    }

    pub fn add_rules_added_listener(&self, listener: RulesAddedListener) -> ListenerId {
        self.rules_added_listeners.add(listener)
    }

    pub fn remove_rules_added_listener(&self, id: ListenerId) -> bool {
        self.rules_added_listeners.remove(id)
    }

    /// Whether a pending batch awaits [`RuleStore::process`].
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn len(&self) -> usize {
        self.rules.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.borrow().is_empty()
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}
