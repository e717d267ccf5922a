//! Selector matching for standalone scene objects.
//! Spec: <https://www.w3.org/TR/selectors-3/>

use crate::{CompoundSelector, Matchable, Selector, SelectorMatcher, SimpleSelector};

/// Match a compound selector against a single target.
/// Spec: Section 5–7
pub fn matches_compound(target: &dyn Matchable, compound: &CompoundSelector) -> bool {
    for simple in &compound.simples {
        match simple {
            SimpleSelector::Universal => {}
            SimpleSelector::Type(type_name) => {
                if target.object_type() != type_name.as_str() {
                    return false;
                }
            }
            SimpleSelector::Class(class_name) => {
                if !target.has_class(class_name.as_str()) {
                    return false;
                }
            }
            SimpleSelector::IdSelector(id_value) => {
                if target
                    .object_id()
                    .is_none_or(|value| value != id_value.as_str())
                {
                    return false;
                }
            }
        }
    }
    true
}

/// The default matching strategy.
///
/// Scene objects stand alone, so only single-compound selectors can match;
/// a descendant chain names ancestry the target does not have.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompoundMatcher;

impl SelectorMatcher for CompoundMatcher {
    fn matches(&self, selector: &Selector, target: &dyn Matchable) -> bool {
        match selector.compounds.as_slice() {
            [compound] => matches_compound(target, compound),
            _ => false,
        }
    }
}
