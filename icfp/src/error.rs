use num_bigint::BigInt;
use thiserror::Error;

use crate::prelude::Span;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A character with no slot in the 94-symbol table. `offset` counts characters
    /// into whatever text was being encoded or decoded.
    #[error("character {found:?} at offset {offset} is outside the wire alphabet")]
    OutOfAlphabet { found: char, offset: usize },
    #[error("cannot encode negative integer {0}")]
    NegativeIntegerUnsupported(BigInt),
    #[error("integer literal has no digits")]
    EmptyInteger,
    #[error("malformed program: {reason}")]
    MalformedProgram { span: Span, reason: String },
}

impl Error {
    pub(crate) fn malformed(span: Span, reason: impl Into<String>) -> Self {
        Error::MalformedProgram {
            span,
            reason: reason.into(),
        }
    }

    /// Shifts offsets reported against a token body so they point into the input
    /// that contains the body at `base`.
    pub(crate) fn rebase(self, base: usize) -> Self {
        match self {
            Error::OutOfAlphabet { found, offset } => Error::OutOfAlphabet {
                found,
                offset: offset + base,
            },
            Error::MalformedProgram { span, reason } => Error::MalformedProgram {
                span: span.start + base..span.end + base,
                reason,
            },
            e => e,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Error::OutOfAlphabet { offset, .. } => Some(*offset..offset + 1),
            Error::MalformedProgram { span, .. } => Some(span.clone()),
            Error::NegativeIntegerUnsupported(_) | Error::EmptyInteger => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rebase_moves_offsets_into_the_input() {
        let e = Error::OutOfAlphabet {
            found: '\u{7f}',
            offset: 2,
        };
        assert_eq!(e.rebase(10).span(), Some(12..13));
        let e = Error::malformed(0..2, "unknown indicator");
        assert_eq!(e.rebase(5).span(), Some(5..7));
        assert_eq!(Error::EmptyInteger.rebase(3), Error::EmptyInteger);
    }
}
