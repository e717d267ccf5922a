//! Constructor registry used as the default material factory.

use crate::{Material, MaterialError, MaterialFactory};
use scenesheet_core::StyleMap;
use std::collections::HashMap;
use std::rc::Rc;

type Constructor = Box<dyn Fn(&StyleMap) -> Rc<dyn Material>>;

/// Maps constructor class names (`"LineBasicMaterial"`) to constructor
/// closures. Lookup is by exact name.
#[derive(Default)]
pub struct MaterialRegistry {
    constructors: HashMap<String, Constructor>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under its class name, replacing any previous
    /// entry for that name.
    pub fn register(
        &mut self,
        class_name: impl Into<String>,
        constructor: impl Fn(&StyleMap) -> Rc<dyn Material> + 'static,
    ) {
        self.constructors
            .insert(class_name.into(), Box::new(constructor));
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.constructors.contains_key(class_name)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl MaterialFactory for MaterialRegistry {
    fn construct(
        &self,
        class_name: &str,
        config: &StyleMap,
    ) -> Result<Rc<dyn Material>, MaterialError> {
        let Some(constructor) = self.constructors.get(class_name) else {
            return Err(MaterialError::UnknownType {
                class_name: class_name.to_string(),
            });
        };
        Ok(constructor(config))
    }
}
