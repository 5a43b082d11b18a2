//! Annotation errors

use thiserror::Error;

/// Errors raised while turning annotation text into a [`TypeSpec`](crate::TypeSpec)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// Annotation text was empty
    #[error("Empty type annotation")]
    Empty,

    /// Character that does not start any token
    #[error("Unexpected character at offset {offset} in '{source_text}'")]
    UnexpectedCharacter {
        /// Full annotation text
        source_text: String,
        /// Byte offset of the character
        offset: usize,
    },

    /// Token that does not fit the grammar
    #[error("Unexpected '{found}' at offset {offset}, expected {expected}")]
    UnexpectedToken {
        /// Token text that was found
        found: String,
        /// What the parser was looking for
        expected: &'static str,
        /// Byte offset of the token
        offset: usize,
    },

    /// Input ended in the middle of an annotation
    #[error("Unexpected end of annotation, expected {expected}")]
    UnexpectedEnd {
        /// What the parser was looking for
        expected: &'static str,
    },

    /// Wrong number of type arguments for a generic
    #[error("Type '{name}' expects {expected} type argument(s), got {actual}")]
    InvalidTypeArgCount {
        /// Generic name
        name: String,
        /// Expected count
        expected: usize,
        /// Actual count
        actual: usize,
    },

    /// Type arguments applied to a non-generic name
    #[error("Type '{name}' does not take type arguments")]
    NotGeneric {
        /// Type name
        name: String,
    },
}
