//! Identity cache mapping computed styles to constructed materials.

use crate::{Material, MaterialError, MaterialFactory};
use log::{debug, warn};
use scenesheet_core::{StyleMap, StyleValue};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Reserved style key naming the material type.
pub const MATERIAL_TYPE_KEY: &str = "material";

/// Canonical text form of a style map: `key=value` pairs sorted by key and
/// joined by single spaces. The empty style produces `""`. Styles with equal
/// entries always produce equal keys.
pub fn canonical_style_key(style: &StyleMap) -> String {
    let mut out = String::new();
    for (key, value) in style {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(&value.to_string());
    }
    out
}

/// Derive the constructor class name for a material type: first letter
/// uppercased plus the `Material` suffix (`lineBasic` becomes
/// `LineBasicMaterial`).
pub fn material_class_name(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len().saturating_add(8));
    let mut chars = type_name.chars();
    if let Some(first) = chars.next() {
        out.push(first.to_ascii_uppercase());
        out.push_str(chars.as_str());
    }
    out.push_str("Material");
    out
}

/// Lazy cache from canonical style text to materials. Entries are created on
/// first lookup and only ever dropped by [`MaterialCache::destroy`].
pub struct MaterialCache {
    factory: Rc<dyn MaterialFactory>,
    entries: RefCell<HashMap<String, Rc<dyn Material>>>,
    live: Cell<bool>,
}

impl MaterialCache {
    pub fn new(factory: Rc<dyn MaterialFactory>) -> Self {
        Self {
            factory,
            entries: RefCell::new(HashMap::new()),
            live: Cell::new(true),
        }
    }

    /// Resolve the material for a computed style, constructing and caching on
    /// first sight. Equal canonical keys always resolve to the same instance.
    pub fn get_material(&self, style: &StyleMap) -> Result<Rc<dyn Material>, MaterialError> {
        if !self.live.get() {
            return Err(MaterialError::CacheDestroyed);
        }
        let key = canonical_style_key(style);
        if let Some(hit) = self.entries.borrow().get(&key) {
            return Ok(Rc::clone(hit));
        }
        let material = self.create_material(style)?;
        debug!("cached material for {key:?}");
        self.entries.borrow_mut().insert(key, Rc::clone(&material));
        Ok(material)
    }

    /// Split the style into type name and constructor configuration, then
    /// build through the factory.
    fn create_material(&self, style: &StyleMap) -> Result<Rc<dyn Material>, MaterialError> {
        let mut config = style.clone();
        let type_name = match config.remove(MATERIAL_TYPE_KEY) {
            Some(StyleValue::Text(type_name)) if !type_name.is_empty() => type_name,
            _ => {
                warn!(
                    "style {:?} has no material type",
                    canonical_style_key(style)
                );
                return Err(MaterialError::MissingType);
            }
        };
        let class_name = material_class_name(&type_name);
        self.factory.construct(&class_name, &config)
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drop the cache bookkeeping and refuse further lookups. Materials held
    /// elsewhere stay alive; their underlying resources are not released.
    pub fn destroy(&self) {
        self.entries.borrow_mut().clear();
        self.live.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::{MaterialCache, canonical_style_key, material_class_name};
    use crate::{Material, MaterialError, MaterialRegistry};
    use scenesheet_core::{StyleMap, StyleValue, style};
    use std::any::Any;
    use std::rc::Rc;

    #[derive(Debug)]
    struct FakeMaterial {
        class_name: String,
        config: StyleMap,
    }

    impl Material for FakeMaterial {
        fn type_name(&self) -> &str {
            &self.class_name
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn line_registry() -> MaterialRegistry {
        let mut registry = MaterialRegistry::new();
        registry.register("LineBasicMaterial", |config| {
            Rc::new(FakeMaterial {
                class_name: "LineBasicMaterial".to_string(),
                config: config.clone(),
            })
        });
        registry
    }

    fn line_cache() -> MaterialCache {
        MaterialCache::new(Rc::new(line_registry()))
    }

    #[test]
    fn cache_keys_sort_entries_and_join_with_spaces() {
        let style = style! { "z": 1, "b": 2, "d": 3, "a": 4 };
        assert_eq!(canonical_style_key(&style), "a=4 b=2 d=3 z=1");
        assert_eq!(canonical_style_key(&StyleMap::new()), "");
    }

    #[test]
    fn class_names_capitalize_and_append_the_suffix() {
        assert_eq!(material_class_name("lineBasic"), "LineBasicMaterial");
        assert_eq!(material_class_name("lineDashed"), "LineDashedMaterial");
        assert_eq!(material_class_name("meshNormal"), "MeshNormalMaterial");
    }

    #[test]
    fn equal_styles_resolve_to_the_identical_material() -> Result<(), MaterialError> {
        let cache = line_cache();
        let first = cache.get_material(&style! { "material": "lineBasic", "linewidth": 4 })?;
        let second = cache.get_material(&style! { "linewidth": 4, "material": "lineBasic" })?;
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[test]
    fn differing_styles_resolve_to_distinct_materials() -> Result<(), MaterialError> {
        let cache = line_cache();
        let thin = cache.get_material(&style! { "material": "lineBasic", "linewidth": 1 })?;
        let wide = cache.get_material(&style! { "material": "lineBasic", "linewidth": 9 })?;
        assert!(!Rc::ptr_eq(&thin, &wide));
        assert_eq!(cache.len(), 2);
        Ok(())
    }

    #[test]
    fn the_type_key_never_reaches_the_constructor() -> Result<(), MaterialError> {
        let cache = line_cache();
        let material = cache.get_material(&style! { "material": "lineBasic", "linewidth": 4 })?;
        let fake = material
            .as_any()
            .downcast_ref::<FakeMaterial>()
            .ok_or(MaterialError::MissingType)?;
        assert!(!fake.config.contains("material"));
        assert_eq!(fake.config.get("linewidth"), Some(&StyleValue::Number(4.0)));
        Ok(())
    }

    #[test]
    fn styles_without_a_usable_type_fail() {
        let cache = line_cache();
        assert_eq!(
            cache.get_material(&style! { "linewidth": 4 }).err(),
            Some(MaterialError::MissingType)
        );
        assert_eq!(
            cache.get_material(&style! { "material": 3 }).err(),
            Some(MaterialError::MissingType)
        );
        assert_eq!(
            cache.get_material(&style! { "material": "" }).err(),
            Some(MaterialError::MissingType)
        );
    }

    #[test]
    fn unknown_class_names_fail_with_the_derived_name() {
        let cache = line_cache();
        assert_eq!(
            cache.get_material(&style! { "material": "meshNormal" }).err(),
            Some(MaterialError::UnknownType {
                class_name: "MeshNormalMaterial".to_string()
            })
        );
    }

    #[test]
    fn destroyed_caches_refuse_lookups() -> Result<(), MaterialError> {
        let cache = line_cache();
        cache.get_material(&style! { "material": "lineBasic" })?;
        cache.destroy();
        assert!(!cache.is_live());
        assert!(cache.is_empty());
        assert_eq!(
            cache.get_material(&style! { "material": "lineBasic" }).err(),
            Some(MaterialError::CacheDestroyed)
        );
        Ok(())
    }
}
