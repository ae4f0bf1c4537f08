use tracing::debug;

use crate::{codec, prelude::*, term::Term, token::Token};

/// Flattens `term` into prefix order: each node's token is followed by the tokens
/// of its children (`lhs` before `rhs`; `cond`, `positive`, `negative`).
///
/// Fails if a string literal or binder name cannot be written in the wire
/// alphabet; the reported offset is relative to that string.
pub fn term_to_tokens(term: &Term) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(term.size());
    let mut pending = vec![term];
    while let Some(term) = pending.pop() {
        tokens.push(match term {
            Term::Binary { op, .. } => Token::Binary(*op),
            Term::Unary { op, .. } => Token::Unary(*op),
            Term::If { .. } => Token::If,
            Term::Lambda { var, .. } => {
                codec::check_wire(var)?;
                Token::Lambda(var.clone())
            }
            Term::Var(name) => {
                codec::check_wire(name)?;
                Token::Var(name.clone())
            }
            Term::Str(s) => Token::Str(codec::encode_text(s)?),
            Term::Int(n) => Token::Int(n.clone()),
            Term::Bool(true) => Token::True,
            Term::Bool(false) => Token::False,
        });
        pending.extend(term.children().rev().map(|child| child.as_ref()));
    }
    debug!(tokens = tokens.len(), "serialized term");
    Ok(tokens)
}

pub fn term_to_wire(term: &Term) -> Result<String> {
    Ok(term_to_tokens(term)?
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(" "))
}
