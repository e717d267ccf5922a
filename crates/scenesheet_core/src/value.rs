//! Tagged scalar style values.

use std::fmt;

/// A single style attribute value.
///
/// Values render with [`fmt::Display`] into the canonical text used by cache
/// keys: numbers in their shortest form (`16711935`, `0.7`), booleans as
/// `true`/`false`, text verbatim.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl StyleValue {
    /// The text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }

    /// The numeric payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        if let Self::Number(number) = self {
            Some(*number)
        } else {
            None
        }
    }

    /// The boolean payload, if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(flag) = self {
            Some(*flag)
        } else {
            None
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<i32> for StyleValue {
    fn from(number: i32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<u32> for StyleValue {
    fn from(number: u32) -> Self {
        Self::Number(f64::from(number))
    }
}

impl From<bool> for StyleValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<&str> for StyleValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}
