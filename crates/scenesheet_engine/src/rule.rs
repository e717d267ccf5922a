//! Style rules: a parsed selector paired with a mutable declaration block.

use std::cell::RefCell;
use std::rc::Rc;

use scenesheet_core::StyleMap;
use scenesheet_selectors::{Matchable, Selector, SelectorMatcher, Specificity};

use crate::error::StyleError;
use crate::listener::{ListenerId, ListenerSet};

/// Callback invoked after a rule's declarations change.
pub type RuleUpdateListener = Rc<dyn Fn() -> Result<(), StyleError>>;

/// A selector plus the style it contributes to matching objects.
pub struct StyleRule {
    selector: Selector,
    style: RefCell<StyleMap>,
    update_listeners: ListenerSet<RuleUpdateListener>,
    matcher: Rc<dyn SelectorMatcher>,
}

impl StyleRule {
    /// Parse `selector_text` and build a rule carrying `style`.
    pub fn new(
        selector_text: &str,
        style: StyleMap,
        matcher: Rc<dyn SelectorMatcher>,
    ) -> Result<Rc<Self>, StyleError> {
        let selector = Selector::parse(selector_text)?;
        Ok(Rc::new(Self {
            selector,
            style: RefCell::new(style),
            update_listeners: ListenerSet::new(),
            matcher,
        }))
    }

    #[inline]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The selector source text as declared.
    #[inline]
    pub fn selector_text(&self) -> &str {
        &self.selector.text
    }

    #[inline]
    pub fn specificity(&self) -> Specificity {
        self.selector.specificity
    }

    /// Copy of the current declaration block.
    pub fn style(&self) -> StyleMap {
        self.style.borrow().clone()
    }

    /// Whether this rule's selector matches `target`.
    pub fn matches(&self, target: &dyn Matchable) -> bool {
        self.matcher.matches(&self.selector, target)
    }

    /// Merge `partial` into the declarations, then notify listeners in
    /// registration order. A failing listener stops the chain and returns
    /// its error; the merge itself is never rolled back.
    pub fn update_style(&self, partial: &StyleMap) -> Result<(), StyleError> {
        self.style.borrow_mut().merge_from(partial);
        for listener in self.update_listeners.snapshot() {
            listener()?;
        }
        Ok(())
    }

    pub fn add_update_listener(&self, listener: RuleUpdateListener) -> ListenerId {
        self.update_listeners.add(listener)
    }

    pub fn remove_update_listener(&self, id: ListenerId) -> bool {
        self.update_listeners.remove(id)
    }

    pub fn update_listener_count(&self) -> usize {
        self.update_listeners.len()
    }
}

impl std::fmt::Debug for StyleRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleRule")
            .field("selector", &self.selector.text)
            .field("specificity", &self.selector.specificity)
            .field("style", &self.style.borrow())
            .finish_non_exhaustive()
    }
}
