//! Flat style maps with additive merge.

use crate::StyleValue;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// An attribute-name to value map with keys kept in sorted order.
///
/// Merging is additive: [`StyleMap::merge_from`] overwrites colliding keys
/// and never removes anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleMap {
    entries: BTreeMap<String, StyleValue>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite one attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove one attribute, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<StyleValue> {
        self.entries.remove(key)
    }

    /// Copy every entry of `other` into this map, overwriting collisions.
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in other {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, StyleValue> {
        self.entries.iter()
    }
}

impl<'map> IntoIterator for &'map StyleMap {
    type Item = (&'map String, &'map StyleValue);
    type IntoIter = btree_map::Iter<'map, String, StyleValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Build a [`StyleMap`] from literal key/value pairs.
///
/// ```
/// use scenesheet_core::style;
///
/// let style = style! { "material": "lineBasic", "linewidth": 4 };
/// assert_eq!(style.len(), 2);
/// ```
#[macro_export]
macro_rules! style {
    () => {
        $crate::StyleMap::new()
    };
    ($($key:literal : $value:expr),+ $(,)?) => {{
        let mut style_map = $crate::StyleMap::new();
        $(style_map.set($key, $value);)+
        style_map
    }};
}
