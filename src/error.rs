//! Decode errors
//!
//! Every error is fatal to the run that produced it. Positions are byte
//! offsets into the input buffer.

use thiserror::Error;

/// Failure while decoding a changeset dump
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Unexpected byte where a bracket, key, value or `=` was required
    #[error("expected {expected} at byte {position}")]
    Grammar {
        expected: &'static str,
        position: usize,
    },
    /// Quoted value never closed before the end of input
    #[error("quoted value opened at byte {position} is never closed")]
    UnterminatedValue { position: usize },
    /// Element that is not valid at this point of the document
    #[error("unexpected element `{name}` at byte {position}")]
    UnexpectedElement { name: String, position: usize },
}

impl DecodeError {
    pub(crate) fn grammar(expected: &'static str, position: usize) -> Self {
        DecodeError::Grammar { expected, position }
    }

    pub(crate) fn unexpected_element(name: &[u8], position: usize) -> Self {
        DecodeError::UnexpectedElement {
            name: String::from_utf8_lossy(name).into_owned(),
            position,
        }
    }

    /// Byte offset the error was detected at
    pub fn position(&self) -> usize {
        match self {
            DecodeError::Grammar { position, .. }
            | DecodeError::UnterminatedValue { position }
            | DecodeError::UnexpectedElement { position, .. } => *position,
        }
    }
}
