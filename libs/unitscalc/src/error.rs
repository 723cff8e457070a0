//! Error types for the units calculator

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the analyze / calculate pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input text could not be split into tokens.
    ///
    /// `position` is a character offset into `input`.
    #[error("{expected} at pos {position}: `{}`", marked(.input, .position))]
    Lex {
        input: String,
        position: usize,
        expected: String,
    },

    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("numeric overflow")]
    Overflow,
}

impl Error {
    pub(crate) fn lex(input: &str, position: usize, expected: impl Into<String>) -> Self {
        Error::Lex {
            input: input.to_string(),
            position,
            expected: expected.into(),
        }
    }

    pub fn is_lex(&self) -> bool {
        matches!(self, Error::Lex { .. })
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax(_))
    }

    pub fn is_conversion(&self) -> bool {
        matches!(self, Error::Conversion(_))
    }

    /// Offending character offset, for lexical errors only.
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Lex { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Input text with a `[]` marker inserted before the character at `position`.
fn marked(input: &str, position: &usize) -> String {
    let split = input
        .char_indices()
        .nth(*position)
        .map(|(idx, _)| idx)
        .unwrap_or(input.len());
    format!("{}[]{}", &input[..split], &input[split..])
}
