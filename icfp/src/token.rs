use num_bigint::BigUint;

use crate::{
    codec::{self, Base94},
    prelude::*,
    term::{BinOp, UnOp},
};

/// One whitespace-delimited word of wire text.
///
/// The first character is the indicator; `Display` renders the exact wire form.
/// String bodies are kept in their encoded form so that rendering cannot fail.
#[derive(PartialEq, Eq, Clone, derive_more::Display, Debug)]
pub enum Token {
    #[display(fmt = "T")]
    True,
    #[display(fmt = "F")]
    False,
    #[display(fmt = "I{}", "Base94(_0)")]
    Int(BigUint),
    #[display(fmt = "S{_0}")]
    Str(String),
    #[display(fmt = "U{_0}")]
    Unary(UnOp),
    #[display(fmt = "B{_0}")]
    Binary(BinOp),
    #[display(fmt = "?")]
    If,
    #[display(fmt = "L{_0}")]
    Lambda(Identifier),
    #[display(fmt = "v{_0}")]
    Var(Identifier),
}

impl Token {
    /// Number of subterms that follow this token in prefix order.
    pub fn arity(&self) -> usize {
        match self {
            Token::Binary(_) => 2,
            Token::If => 3,
            Token::Unary(_) | Token::Lambda(_) => 1,
            Token::True | Token::False | Token::Int(_) | Token::Str(_) | Token::Var(_) => 0,
        }
    }

    /// Decodes a single word. Error positions are character offsets into `word`.
    pub fn from_word(word: &str) -> Result<Token> {
        let whole = 0..word.chars().count();
        let mut chars = word.chars();
        let Some(indicator) = chars.next() else {
            return Err(Error::malformed(whole, "empty token"));
        };
        let body = chars.as_str();
        let in_body = |e: Error| e.rebase(1);
        match indicator {
            'T' | 'F' | '?' if !body.is_empty() => Err(Error::malformed(
                whole,
                format!("`{indicator}` takes no payload"),
            )),
            'T' => Ok(Token::True),
            'F' => Ok(Token::False),
            '?' => Ok(Token::If),
            'I' => match codec::decode_integer(body) {
                Ok(n) => Ok(Token::Int(n)),
                Err(Error::EmptyInteger) => {
                    Err(Error::malformed(whole, "integer literal has no digits"))
                }
                Err(e) => Err(in_body(e)),
            },
            'S' => {
                codec::check_wire(body).map_err(in_body)?;
                Ok(Token::Str(body.to_string()))
            }
            'L' | 'v' => {
                codec::check_wire(body).map_err(in_body)?;
                let name = Identifier::new(body.to_string());
                Ok(if indicator == 'L' {
                    Token::Lambda(name)
                } else {
                    Token::Var(name)
                })
            }
            'U' => {
                let symbol = operator_symbol(body, &whole)?;
                UnOp::from_symbol(symbol).map(Token::Unary).ok_or_else(|| {
                    Error::malformed(whole, format!("unknown unary operator `{symbol}`"))
                })
            }
            'B' => {
                let symbol = operator_symbol(body, &whole)?;
                BinOp::from_symbol(symbol).map(Token::Binary).ok_or_else(|| {
                    Error::malformed(whole, format!("unknown binary operator `{symbol}`"))
                })
            }
            other => Err(Error::malformed(
                whole,
                format!("unknown indicator `{other}`"),
            )),
        }
    }
}

fn operator_symbol(body: &str, whole: &Span) -> Result<char> {
    let mut chars = body.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(Error::malformed(
            whole.clone(),
            "operator tokens carry exactly one symbol",
        )),
    }
}
