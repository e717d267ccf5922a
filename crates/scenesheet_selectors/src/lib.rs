//! Selector matching and specificity for styled scene objects.
//! Grammar subset of Selectors Level 3: <https://www.w3.org/TR/selectors-3/>
//!
//! A selector is a whitespace-separated sequence of compounds; each compound
//! combines an optional type (or `*`), any number of `.class` selectors, and
//! `#id` selectors. Comma-separated groups are rejected at parse time.
//!
//! Matching is pluggable: hosts implement [`Matchable`] for whatever carries
//! a type, classes, and an optional id, and a [`SelectorMatcher`] decides how
//! selectors relate to those targets. [`CompoundMatcher`] is the default
//! strategy for standalone objects with no ancestry.

#![forbid(unsafe_code)]

mod matcher;
mod parser;
mod specificity;

// Re-export public API
pub use matcher::{CompoundMatcher, matches_compound};
pub use parser::SelectorError;
pub use specificity::{Specificity, specificity_of_compound};

/// An adapter that abstracts target access for selector matching.
/// Implement this for whatever your scene treats as a taggable object.
pub trait Matchable {
    /// Type name, the analog of an element tag (`"line"`, `"mesh"`).
    /// Spec: Section 5 — Type selectors
    fn object_type(&self) -> &str;

    /// Returns Some(id) if the target carries an id, else None.
    /// Spec: Section 7 — ID selectors
    fn object_id(&self) -> Option<&str>;

    /// True if the target has the given class token.
    /// Spec: Section 6 — Class selectors
    fn has_class(&self, class: &str) -> bool;
}

/// Strategy deciding whether a selector matches a target.
pub trait SelectorMatcher {
    fn matches(&self, selector: &Selector, target: &dyn Matchable) -> bool;
}

/// Simple selectors (subset).
/// Spec: Section 5, 6, 7
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// Spec: Section 5 — Type selectors
    Type(String),
    /// Spec: Section 6 — Class selectors
    Class(String),
    /// Spec: Section 7 — ID selectors
    IdSelector(String),
    /// Universal selector `*`; matches everything, adds no specificity.
    /// Spec: Section 5 — Universal selector
    Universal,
}

/// A compound selector is a sequence of simple selectors (no separators).
/// Spec: Section 5 — Simple selector sequences
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// A parsed selector: its source text, its whitespace-separated compounds,
/// and the specificity fixed at parse time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    pub text: String,
    pub compounds: Vec<CompoundSelector>,
    pub specificity: Specificity,
}

impl Selector {
    /// Parse selector text. Grouped (comma separated) selectors are rejected,
    /// as is any character outside the subset grammar.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        parser::parse_selector(input)
    }
}
