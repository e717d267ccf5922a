//! The top-level styling context: rules, objects, and the material cache.

use std::cell::RefCell;
use std::rc::Rc;

use scenesheet_core::StyleMap;
use scenesheet_materials::{MaterialCache, MaterialFactory, MaterialRegistry};
use scenesheet_selectors::{CompoundMatcher, SelectorMatcher};

use crate::error::StyleError;
use crate::object::{DeriveHook, StyledObject};
use crate::rule::StyleRule;
use crate::store::RuleStore;

/// Owns the rule store, the material cache, and every declared object.
pub struct StyleContext {
    rule_store: Rc<RuleStore>,
    material_cache: Rc<MaterialCache>,
    matcher: Rc<dyn SelectorMatcher>,
    objects: Rc<RefCell<Vec<Rc<StyledObject>>>>,
}

impl StyleContext {
    /// Build a context around the given matcher and material factory.
    pub fn new(matcher: Rc<dyn SelectorMatcher>, factory: Rc<dyn MaterialFactory>) -> Self {
        Self {
            rule_store: Rc::new(RuleStore::new()),
            material_cache: Rc::new(MaterialCache::new(factory)),
            matcher,
            objects: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Convenience constructor pairing the compound matcher with a
    /// constructor registry.
    pub fn with_registry(registry: MaterialRegistry) -> Self {
        Self::new(Rc::new(CompoundMatcher), Rc::new(registry))
    }

    /// Parse `selector_text` and add the rule to the store.
    ///
    /// The rule is matchable immediately; rules-added notifications wait
    /// for [`StyleContext::process`].
    pub fn declare_rule(
        &self,
        selector_text: &str,
        style: StyleMap,
    ) -> Result<Rc<StyleRule>, StyleError> {
        let rule = StyleRule::new(selector_text, style, Rc::clone(&self.matcher))?;
        self.rule_store.add_rule(Rc::clone(&rule));
        Ok(rule)
    }

    /// Create an object, run its initial cascade pass, and track it.
    pub fn declare_object(
        &self,
        object_type: &str,
        class_str: &str,
        style: StyleMap,
    ) -> Result<Rc<StyledObject>, StyleError> {
        let object = StyledObject::new(
            object_type,
            class_str,
            style,
            Rc::clone(&self.rule_store),
            Rc::clone(&self.material_cache),
            self.derive_hook(),
        )?;
        self.objects.borrow_mut().push(Rc::clone(&object));
        Ok(object)
    }

    /// Hook that folds derived objects into this context's tracking list.
    fn derive_hook(&self) -> DeriveHook {
        let objects = Rc::downgrade(&self.objects);
        Rc::new(move |derived| {
            if let Some(objects) = objects.upgrade() {
                objects.borrow_mut().push(Rc::clone(derived));
            }
        })
    }

    /// Flush pending rules-added notifications.
    pub fn process(&self) -> Result<(), StyleError> {
        self.rule_store.process()
    }

    /// Tear down the cache first, then every tracked object.
    pub fn destroy(&self) {
        self.material_cache.destroy();
        let objects: Vec<_> = self.objects.borrow().clone();
        for object in &objects {
            object.destroy();
        }
    }

    pub fn rule_store(&self) -> &Rc<RuleStore> {
        &self.rule_store
    }

    pub fn material_cache(&self) -> &Rc<MaterialCache> {
        &self.material_cache
    }

    pub fn object_count(&self) -> usize {
        self.objects.borrow().len()
    }

    /// Copies of every tracked object, declaration order.
    pub fn objects(&self) -> Vec<Rc<StyledObject>> {
        self.objects.borrow().clone()
    }
}
