//! Styled scene objects: cascade resolution and material application.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::trace;

use scenesheet_core::StyleMap;
use scenesheet_materials::{Material, MaterialCache, MaterialTarget};
use scenesheet_selectors::Matchable;

use crate::error::StyleError;
use crate::listener::{ListenerId, ListenerSet};
use crate::rule::StyleRule;
use crate::store::RuleStore;

/// Callback invoked when an object's resolved material changes.
///
/// Receives the new material and a copy of the computed style it came from.
pub type MaterialChangeListener = Rc<dyn Fn(&Rc<dyn Material>, &StyleMap)>;

/// Hook invoked with each newly derived object so an owner can track it.
pub type DeriveHook = Rc<dyn Fn(&Rc<StyledObject>)>;

/// The outcome of one cascade pass: the rules that matched, in ascending
/// specificity order, and the style they merged down to.
pub struct StyleComputation {
    pub matched_rules: Vec<Rc<StyleRule>>,
    pub computed_style: StyleMap,
}

/// An object whose material is driven by the rule cascade.
///
/// Construction runs an initial cascade pass and subscribes the object to
/// future rule additions; matched rules are watched for in-place updates.
pub struct StyledObject {
    object_type: String,
    classes: RefCell<Vec<String>>,
    explicit_style: RefCell<StyleMap>,
    computed_style: RefCell<StyleMap>,
    material: RefCell<Option<Rc<dyn Material>>>,
    using_rules: RefCell<Vec<Rc<StyleRule>>>,
    material_change_listeners: ListenerSet<MaterialChangeListener>,
    rule_store: Rc<RuleStore>,
    material_cache: Rc<MaterialCache>,
    on_derive: DeriveHook,
    live: Cell<bool>,
    weak_self: Weak<StyledObject>,
}

impl StyledObject {
    /// Build an object, run its first cascade pass, and hook it up to the
    /// rule store so later rule additions restyle it.
    pub fn new(
        object_type: impl Into<String>,
        class_str: &str,
        style: StyleMap,
        rule_store: Rc<RuleStore>,
        material_cache: Rc<MaterialCache>,
        on_derive: DeriveHook,
    ) -> Result<Rc<Self>, StyleError> {
        let object = Rc::new_cyclic(|weak| Self {
            object_type: object_type.into(),
            classes: RefCell::new(split_classes(class_str)),
            explicit_style: RefCell::new(style),
            computed_style: RefCell::new(StyleMap::new()),
            material: RefCell::new(None),
            using_rules: RefCell::new(Vec::new()),
            material_change_listeners: ListenerSet::new(),
            rule_store,
            material_cache,
            on_derive,
            live: Cell::new(true),
            weak_self: Weak::clone(weak),
        });
        object.compute_style_and_apply()?;
        let weak = Rc::downgrade(&object);
        object
            .rule_store
            .add_rules_added_listener(Rc::new(move |batch| match weak.upgrade() {
                Some(object) => object.on_rules_added(batch),
                None => Ok(()),
            }));
        Ok(object)
    }

    /// React to a flushed batch of new rules: the first one that matches
    /// triggers a full recompute, which covers the entire batch.
    fn on_rules_added(&self, batch: &[Rc<StyleRule>]) -> Result<(), StyleError> {
        if !self.live.get() {
            return Ok(());
        }
        for rule in batch {
            if rule.matches(self) {
                trace!(
                    "restyling {} object on new rule {:?}",
                    self.object_type,
                    rule.selector_text()
                );
                return self.compute_style_and_apply();
            }
        }
        Ok(())
    }

    /// Run the cascade: merge every matching rule's style in ascending
    /// specificity order, then overlay the explicit style on top.
    pub fn compute_style(&self) -> StyleComputation {
        let mut matched_rules = Vec::new();
        let mut computed_style = StyleMap::new();
        self.rule_store.each_rule(|rule| {
            if rule.matches(self) {
                computed_style.merge_from(&rule.style());
                matched_rules.push(Rc::clone(rule));
            }
        });
        computed_style.merge_from(&self.explicit_style.borrow());
        StyleComputation {
            matched_rules,
            computed_style,
        }
    }

    /// Cascade, resolve the material, and start watching any newly matched
    /// rules for in-place updates.
    pub fn compute_style_and_apply(&self) -> Result<(), StyleError> {
        let computation = self.compute_style();
        self.set_material(computation.computed_style)?;
        for rule in computation.matched_rules {
            self.watch_rule(rule);
        }
        Ok(())
    }

    /// Subscribe to `rule`'s updates unless this object already watches it.
    fn watch_rule(&self, rule: Rc<StyleRule>) {
        let already_watched = self
            .using_rules
            .borrow()
            .iter()
            .any(|watched| Rc::ptr_eq(watched, &rule));
        if already_watched {
            return;
        }
        let weak = Weak::clone(&self.weak_self);
        rule.add_update_listener(Rc::new(move || match weak.upgrade() {
            Some(object) if object.is_live() => object.compute_style_and_apply(),
            _ => Ok(()),
        }));
        self.using_rules.borrow_mut().push(rule);
    }

    /// Resolve `computed` through the material cache and store the result.
    ///
    /// When the cache hands back the very material already in place the call
    /// is a no-op: the stored computed style is left untouched and no
    /// listener fires.
    pub fn set_material(&self, computed: StyleMap) -> Result<(), StyleError> {
        let material = self.material_cache.get_material(&computed)?;
        let unchanged = self
            .material
            .borrow()
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, &material));
        if unchanged {
            return Ok(());
        }
        *self.computed_style.borrow_mut() = computed;
        *self.material.borrow_mut() = Some(Rc::clone(&material));
        let style_snapshot = self.computed_style.borrow().clone();
        for listener in self.material_change_listeners.snapshot().into_iter().rev() {
            listener(&material, &style_snapshot);
        }
        Ok(())
    }

    /// Register a material-change listener. Later registrations are
    /// notified first.
    pub fn add_material_change_listener(&self, listener: MaterialChangeListener) -> ListenerId {
        self.material_change_listeners.add(listener)
    }

    pub fn remove_material_change_listener(&self, id: ListenerId) -> bool {
        self.material_change_listeners.remove(id)
    }

    pub fn material_change_listener_count(&self) -> usize {
        self.material_change_listeners.len()
    }

    /// Push the current material into `target` immediately, then keep the
    /// target in sync with every future material change.
    pub fn apply_material_on_change(&self, target: Rc<dyn MaterialTarget>) -> ListenerId {
        let current = self.material.borrow().as_ref().map(Rc::clone);
        if let Some(material) = current {
            target.set_material(material);
        }
        self.add_material_change_listener(Rc::new(move |material, _style| {
            target.set_material(Rc::clone(material));
        }))
    }

    /// Add `class` (ignored if already present) and recompute.
    pub fn add_class(&self, class: impl Into<String>) -> Result<(), StyleError> {
        let class = class.into();
        {
            let mut classes = self.classes.borrow_mut();
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
        self.compute_style_and_apply()
    }

    /// Remove `class` if present and recompute.
    pub fn remove_class(&self, class: &str) -> Result<(), StyleError> {
        self.classes.borrow_mut().retain(|existing| existing != class);
        self.compute_style_and_apply()
    }

    /// Build a sibling of the same type with its own classes and explicit
    /// style, sharing this object's rule store and material cache.
    pub fn create_derived_object(
        &self,
        class_str: &str,
        style: StyleMap,
    ) -> Result<Rc<Self>, StyleError> {
        let derived = Self::new(
            self.object_type.clone(),
            class_str,
            style,
            Rc::clone(&self.rule_store),
            Rc::clone(&self.material_cache),
            Rc::clone(&self.on_derive),
        )?;
        (self.on_derive)(&derived);
        Ok(derived)
    }

    /// Mark the object inert and drop its material-change listeners.
    ///
    /// Rule subscriptions stay registered but turn into no-ops through the
    /// live flag.
    pub fn destroy(&self) {
        self.live.set(false);
        self.material_change_listeners.clear();
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    #[inline]
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// The class list joined back into whitespace-separated form.
    pub fn class_str(&self) -> String {
        self.classes.borrow().join(" ")
    }

    /// Copy of the explicit style.
    pub fn style(&self) -> StyleMap {
        self.explicit_style.borrow().clone()
    }

    /// Copy of the last computed style.
    pub fn computed_style(&self) -> StyleMap {
        self.computed_style.borrow().clone()
    }

    pub fn material(&self) -> Option<Rc<dyn Material>> {
        self.material.borrow().as_ref().map(Rc::clone)
    }

    /// The rules this object currently watches, in the order they were
    /// first matched.
    pub fn using_rules(&self) -> Vec<Rc<StyleRule>> {
        self.using_rules.borrow().clone()
    }
}

impl Matchable for StyledObject {
    fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Scene objects carry no id attribute, so id selectors never match.
    fn object_id(&self) -> Option<&str> {
        None
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().iter().any(|existing| existing == class)
    }
}

fn split_classes(class_str: &str) -> Vec<String> {
    class_str.split_whitespace().map(str::to_string).collect()
}
