//! Selector specificity calculation.
//! Spec: <https://www.w3.org/TR/selectors-3/#specificity>

use crate::{CompoundSelector, SimpleSelector};

/// Collapsed specificity weight: `100 * ids + 10 * classes + types`.
/// Universal selectors contribute nothing. Higher weights are more specific.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Specificity(pub u32);

impl Specificity {
    /// Weight the (id, class, type) counts into one comparable number.
    pub fn from_counts(ids: u32, classes: u32, types: u32) -> Self {
        Self(
            ids.saturating_mul(100)
                .saturating_add(classes.saturating_mul(10))
                .saturating_add(types),
        )
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Compute the specificity of a compound selector.
pub fn specificity_of_compound(compound: &CompoundSelector) -> Specificity {
    let mut id_count = 0u32;
    let mut class_count = 0u32;
    let mut type_count = 0u32;
    for simple in &compound.simples {
        match simple {
            SimpleSelector::IdSelector(_) => {
                id_count = id_count.saturating_add(1);
            }
            SimpleSelector::Class(_) => {
                class_count = class_count.saturating_add(1);
            }
            SimpleSelector::Type(_) => {
                type_count = type_count.saturating_add(1);
            }
            SimpleSelector::Universal => {}
        }
    }
    Specificity::from_counts(id_count, class_count, type_count)
}

/// Sum specificity across every compound of a selector.
pub(crate) fn specificity_of_compounds(compounds: &[CompoundSelector]) -> Specificity {
    let mut total = Specificity::default();
    for compound in compounds {
        total.0 = total.0.saturating_add(specificity_of_compound(compound).0);
    }
    total
}
