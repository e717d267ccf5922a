//! Engine error type.

use std::error::Error;
use std::fmt;

use scenesheet_materials::MaterialError;
use scenesheet_selectors::SelectorError;

/// Any failure surfaced by rule declaration or style application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyleError {
    /// Selector text failed to parse.
    Selector(SelectorError),
    /// Material resolution failed.
    Material(MaterialError),
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(error) => write!(f, "selector error: {error}"),
            Self::Material(error) => write!(f, "material error: {error}"),
        }
    }
}

impl Error for StyleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Selector(error) => Some(error),
            Self::Material(error) => Some(error),
        }
    }
}

impl From<SelectorError> for StyleError {
    fn from(error: SelectorError) -> Self {
        Self::Selector(error)
    }
}

impl From<MaterialError> for StyleError {
    fn from(error: MaterialError) -> Self {
        Self::Material(error)
    }
}
