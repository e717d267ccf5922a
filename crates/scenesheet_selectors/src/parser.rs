//! Selector parsing.
//! Spec: <https://www.w3.org/TR/selectors-3/>

use crate::specificity::specificity_of_compounds;
use crate::{CompoundSelector, Selector, SimpleSelector};
use core::mem::take;
use std::error::Error;
use std::fmt;

/// Errors raised while parsing selector text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    /// The input contained no compounds at all.
    Empty,
    /// Comma separated selector groups are not supported.
    GroupedSelector,
    /// A character outside the supported grammar.
    UnexpectedChar { character: char, offset: usize },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty selector"),
            Self::GroupedSelector => {
                f.write_str("grouped (comma separated) selectors are not supported")
            }
            Self::UnexpectedChar { character, offset } => {
                write!(f, "unexpected character {character:?} at offset {offset}")
            }
        }
    }
}

impl Error for SelectorError {}

/// Byte cursor over selector text.
struct SelectorCursor {
    input_bytes: Vec<u8>,
    index: usize,
}

impl SelectorCursor {
    #[inline]
    fn new(input: &str) -> Self {
        Self {
            input_bytes: input.as_bytes().to_vec(),
            index: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input_bytes.get(self.index).copied()
    }

    #[inline]
    fn advance(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    /// Consume an identifier of ASCII alphanumerics, '-' and '_'. Case is
    /// preserved: scene object types like `lineBasic` are case-significant.
    #[inline]
    fn consume_ident(&mut self) -> String {
        let start = self.index;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        let slice = self.input_bytes.get(start..self.index).unwrap_or(&[]);
        String::from_utf8_lossy(slice).to_string()
    }

    /// Skip ASCII whitespace, reporting whether any was seen.
    #[inline]
    fn skip_whitespace(&mut self) -> bool {
        let mut saw = false;
        while matches!(self.peek(), Some(byte) if byte.is_ascii_whitespace()) {
            saw = true;
            self.advance();
        }
        saw
    }

    /// The character at the cursor, for error reporting. The cursor only
    /// stops on ASCII boundaries, so this is always a char start.
    fn current_char(&self) -> char {
        let slice = self.input_bytes.get(self.index..).unwrap_or(&[]);
        String::from_utf8_lossy(slice)
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

/// Parse one selector into its compounds. Whitespace separates compounds;
/// a comma rejects the whole input as a grouped selector.
pub(crate) fn parse_selector(input: &str) -> Result<Selector, SelectorError> {
    let mut cursor = SelectorCursor::new(input);
    let mut compounds = Vec::new();
    let mut current = CompoundSelector::default();

    loop {
        if cursor.skip_whitespace() && !current.simples.is_empty() {
            compounds.push(take(&mut current));
        }
        let Some(byte) = cursor.peek() else { break };
        match byte {
            b',' => return Err(SelectorError::GroupedSelector),
            b'*' => {
                cursor.advance();
                current.simples.push(SimpleSelector::Universal);
            }
            b'.' => {
                let start = cursor.index;
                cursor.advance();
                let ident = cursor.consume_ident();
                if ident.is_empty() {
                    return Err(SelectorError::UnexpectedChar {
                        character: '.',
                        offset: start,
                    });
                }
                current.simples.push(SimpleSelector::Class(ident));
            }
            b'#' => {
                let start = cursor.index;
                cursor.advance();
                let ident = cursor.consume_ident();
                if ident.is_empty() {
                    return Err(SelectorError::UnexpectedChar {
                        character: '#',
                        offset: start,
                    });
                }
                current.simples.push(SimpleSelector::IdSelector(ident));
            }
            _ if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' => {
                let ident = cursor.consume_ident();
                current.simples.push(SimpleSelector::Type(ident));
            }
            _ => {
                return Err(SelectorError::UnexpectedChar {
                    character: cursor.current_char(),
                    offset: cursor.index,
                });
            }
        }
    }

    if !current.simples.is_empty() {
        compounds.push(current);
    }
    if compounds.is_empty() {
        return Err(SelectorError::Empty);
    }

    let specificity = specificity_of_compounds(&compounds);
    Ok(Selector {
        text: input.to_string(),
        compounds,
        specificity,
    })
}
