//! Material construction and caching over computed styles.
//!
//! A computed style names its material type under the reserved
//! [`MATERIAL_TYPE_KEY`]; the remaining entries configure the constructor.
//! [`MaterialCache`] maps canonical style text to constructed materials so
//! equal styles always share one instance, and a [`MaterialFactory`] supplies
//! the constructors. [`MaterialRegistry`] is the default factory.

#![forbid(unsafe_code)]

mod cache;
mod registry;

pub use cache::{MATERIAL_TYPE_KEY, MaterialCache, canonical_style_key, material_class_name};
pub use registry::MaterialRegistry;

use scenesheet_core::StyleMap;
use std::any::Any;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

/// A constructed rendering artifact, shared by every object whose computed
/// style resolves to it.
pub trait Material: fmt::Debug {
    /// Constructor class name this material was built from
    /// (`"LineBasicMaterial"`).
    fn type_name(&self) -> &str;

    /// Downcasting hook for hosts that need the concrete material.
    fn as_any(&self) -> &dyn Any;
}

/// Strategy constructing materials from a class name and configuration.
pub trait MaterialFactory {
    fn construct(
        &self,
        class_name: &str,
        config: &StyleMap,
    ) -> Result<Rc<dyn Material>, MaterialError>;
}

/// A host-side binding point that receives materials as they change.
pub trait MaterialTarget {
    fn set_material(&self, material: Rc<dyn Material>);
}

/// Errors raised while resolving materials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaterialError {
    /// The style has no usable entry under [`MATERIAL_TYPE_KEY`].
    MissingType,
    /// No constructor is registered under the derived class name.
    UnknownType { class_name: String },
    /// The cache was used after [`MaterialCache::destroy`].
    CacheDestroyed,
}

impl fmt::Display for MaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingType => f.write_str("style names no material type"),
            Self::UnknownType { class_name } => {
                write!(f, "no material constructor registered for {class_name:?}")
            }
            Self::CacheDestroyed => f.write_str("material cache used after destroy"),
        }
    }
}

impl Error for MaterialError {}
