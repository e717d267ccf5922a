//! Cascading stylesheet-driven material styling for scene objects.
//!
//! Rules pair a selector with a style block. Objects declare a type, a class
//! list, and an explicit style; the cascade merges every matching rule in
//! ascending specificity order, overlays the explicit style on top, and
//! resolves the result to a shared material through a keyed cache.
//!
//! ```
//! use std::rc::Rc;
//!
//! use scenesheet::{Material, MaterialRegistry, StyleContext, StyleValue, style};
//!
//! #[derive(Debug)]
//! struct LineMaterial;
//!
//! impl Material for LineMaterial {
//!     fn type_name(&self) -> &str {
//!         "LineBasicMaterial"
//!     }
//!
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = MaterialRegistry::new();
//! registry.register("LineBasicMaterial", |_config| Rc::new(LineMaterial));
//!
//! let context = StyleContext::with_registry(registry);
//! context.declare_rule("line", style! { "material": "lineBasic", "linewidth": 2 })?;
//! let object = context.declare_object("line", "highlight", style!())?;
//! context.process()?;
//!
//! assert_eq!(
//!     object.computed_style().get("linewidth"),
//!     Some(&StyleValue::from(2))
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub use scenesheet_core::{StyleMap, StyleValue, style};
pub use scenesheet_engine::{
    DeriveHook, ListenerId, MaterialChangeListener, RuleStore, RuleUpdateListener,
    RulesAddedListener, StyleComputation, StyleContext, StyleError, StyleRule, StyledObject,
};
pub use scenesheet_materials::{
    MATERIAL_TYPE_KEY, Material, MaterialCache, MaterialError, MaterialFactory, MaterialRegistry,
    MaterialTarget, canonical_style_key, material_class_name,
};
pub use scenesheet_selectors::{
    CompoundMatcher, CompoundSelector, Matchable, Selector, SelectorError, SelectorMatcher,
    SimpleSelector, Specificity, matches_compound, specificity_of_compound,
};
