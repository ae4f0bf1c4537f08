use chumsky::{error::Simple, prelude::*, text};
use tracing::debug;

use crate::{
    codec,
    prelude::*,
    term::{BinOp, Term, UnOp},
    token::Token,
};

/// Splits wire text into whitespace-free words with their character spans.
pub fn lexer() -> impl Parser<char, Vec<Spanned<String>>, Error = Simple<char>> {
    let word = filter(|c: &char| !c.is_whitespace())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map_with_span(|value, span| Spanned { span, value });
    text::whitespace()
        .ignore_then(word.then_ignore(text::whitespace()).repeated())
        .then_ignore(end())
}

pub fn tokenize(input: &str) -> Result<Vec<Spanned<Token>>> {
    let words = lexer().parse(input).map_err(|es| {
        let span = es.first().map(|e| e.span()).unwrap_or(0..0);
        Error::malformed(span, "unreadable wire text")
    })?;
    words
        .into_iter()
        .map(|word| {
            Token::from_word(word.value())
                .map(|value| Spanned {
                    span: word.span(),
                    value,
                })
                .map_err(|e| e.rebase(word.span.start))
        })
        .collect()
}

/// A compound node whose subterms are still being read.
enum Frame {
    Lambda(Identifier),
    Unary(UnOp),
    Binary(BinOp, Option<Term>),
    If(Option<Term>, Option<Term>),
}

enum Step {
    Complete(Term),
    Waiting(Frame),
}

impl Frame {
    /// Hands the next finished subterm to this node.
    fn accept(self, term: Term) -> Step {
        match self {
            Frame::Lambda(var) => Step::Complete(Term::Lambda {
                var,
                body: term.into(),
            }),
            Frame::Unary(op) => Step::Complete(Term::Unary {
                op,
                operand: term.into(),
            }),
            Frame::Binary(op, None) => Step::Waiting(Frame::Binary(op, Some(term))),
            Frame::Binary(op, Some(lhs)) => Step::Complete(Term::Binary {
                op,
                lhs: lhs.into(),
                rhs: term.into(),
            }),
            Frame::If(None, _) => Step::Waiting(Frame::If(Some(term), None)),
            Frame::If(Some(cond), None) => Step::Waiting(Frame::If(Some(cond), Some(term))),
            Frame::If(Some(cond), Some(positive)) => Step::Complete(Term::If {
                cond: cond.into(),
                positive: positive.into(),
                negative: term.into(),
            }),
        }
    }
}

/// Prefix-order reader over a token slice. `end` is the position reported when
/// the tokens run out.
struct Cursor<'a> {
    tokens: &'a [Spanned<Token>],
    pos: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self) -> Result<&'a Spanned<Token>> {
        let token = self.tokens.get(self.pos).ok_or_else(|| {
            Error::malformed(self.end..self.end, "program ended where a term was expected")
        })?;
        self.pos += 1;
        Ok(token)
    }

    /// Reads one complete term. Open compound nodes wait on `frames` rather than
    /// on the call stack.
    fn term(&mut self) -> Result<Term> {
        let mut frames = Vec::new();
        loop {
            let token = self.next()?;
            let mut term = match token.value() {
                Token::True => Term::Bool(true),
                Token::False => Term::Bool(false),
                Token::Int(n) => Term::Int(n.clone()),
                Token::Str(body) => Term::Str(
                    codec::decode_text(body).map_err(|e| e.rebase(token.span.start + 1))?,
                ),
                Token::Var(name) => Term::Var(name.clone()),
                Token::Lambda(var) => {
                    frames.push(Frame::Lambda(var.clone()));
                    continue;
                }
                Token::Unary(op) => {
                    frames.push(Frame::Unary(*op));
                    continue;
                }
                Token::Binary(op) => {
                    frames.push(Frame::Binary(*op, None));
                    continue;
                }
                Token::If => {
                    frames.push(Frame::If(None, None));
                    continue;
                }
            };
            loop {
                let Some(frame) = frames.pop() else {
                    return Ok(term);
                };
                match frame.accept(term) {
                    Step::Complete(complete) => term = complete,
                    Step::Waiting(frame) => {
                        frames.push(frame);
                        break;
                    }
                }
            }
        }
    }
}

/// Reads exactly one term from `tokens`; anything left over is an error.
pub fn parse_tokens(tokens: &[Spanned<Token>], end: usize) -> Result<Term> {
    let mut cursor = Cursor {
        tokens,
        pos: 0,
        end,
    };
    let term = cursor.term()?;
    if let Some(extra) = tokens.get(cursor.pos) {
        return Err(Error::malformed(
            extra.span(),
            format!(
                "{} token(s) left after a complete term",
                tokens.len() - cursor.pos
            ),
        ));
    }
    Ok(term)
}

pub fn parse_wire(input: &str) -> Result<Term> {
    let tokens = tokenize(input)?;
    debug!(tokens = tokens.len(), "lexed wire program");
    parse_tokens(&tokens, input.chars().count())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{builder::*, programs, serializer::term_to_wire};

    fn name(s: &str) -> Identifier {
        Identifier::new(s.to_string())
    }

    fn roundtrip(term: Term) {
        let wire = term_to_wire(&term).unwrap();
        assert_eq!(parse_wire(&wire).unwrap(), term, "wire: {wire}");
    }

    #[test]
    fn test_lexer_spans() {
        let words = lexer().parse("  B$ \n\tI!  ").unwrap();
        assert_eq!(
            words,
            vec![
                Spanned {
                    span: 2..4,
                    value: "B$".to_string()
                },
                Spanned {
                    span: 7..9,
                    value: "I!".to_string()
                },
            ]
        );
        assert!(lexer().parse(" \n ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_known_program() {
        let term = parse_wire("B$ B$ L# L$ v# B. SB%,,/ S}Q/2,$_ IK").unwrap();
        assert_eq!(
            term,
            apply(
                apply(
                    raw_lambda(name("#"), raw_lambda(name("$"), var(name("#")))),
                    concat(string("Hello"), string(" World!")),
                ),
                int(42u32),
            )
        );
    }

    #[test]
    fn test_whitespace_runs() {
        assert_eq!(
            parse_wire("\n  B+   I\"\t\tI# \n").unwrap(),
            add(int(1u32), int(2u32))
        );
    }

    #[test]
    fn test_roundtrip_literals_and_operators() {
        roundtrip(string("get index"));
        roundtrip(string(""));
        roundtrip(int(0u32));
        roundtrip(int(u64::MAX));
        roundtrip(boolean(true));
        roundtrip(negate(int(7u32)));
        roundtrip(cond(
            not(equal(int_to_string(int(5u32)), string("5"))),
            take(int(2u32), string("abc")),
            drop(int(1u32), string("abc")),
        ));
        roundtrip(or(
            and(less(int(1u32), int(2u32)), greater(int(3u32), int(2u32))),
            equal(
                modulo(div(int(9u32), int(2u32)), int(3u32)),
                string_to_int(string("h")),
            ),
        ));
    }

    #[test]
    fn test_roundtrip_builders() {
        roundtrip(lambda(|x| lambda(|y| apply(x, y))));
        roundtrip(apply(rec(|f| lambda(|n| apply(f, n))), int(3u32)));
        roundtrip(let_in(
            [(name("a"), int(1u32)), (name("b"), var(name("a")))],
            var(name("b")),
        ));
        roundtrip(first(pair(string("l"), string("r"))));
        roundtrip(var(name("free")));
    }

    #[test]
    fn test_roundtrip_programs() {
        for program in programs::NAMES {
            roundtrip(programs::by_name(program).unwrap());
        }
    }

    #[test]
    fn test_missing_operand() {
        let e = parse_wire("B+ I!").unwrap_err();
        assert!(matches!(e, Error::MalformedProgram { .. }), "{e:?}");
        assert_eq!(e.span(), Some(5..5));
    }

    #[test]
    fn test_unknown_indicator() {
        let e = parse_wire("Z").unwrap_err();
        assert!(matches!(e, Error::MalformedProgram { .. }), "{e:?}");
        assert_eq!(e.span(), Some(0..1));
        let e = parse_wire("B. S! Zap").unwrap_err();
        assert_eq!(e.span(), Some(6..9));
    }

    #[test]
    fn test_out_of_alphabet_string() {
        assert_eq!(
            parse_wire("B. Sa Sb\u{7f}c"),
            Err(Error::OutOfAlphabet {
                found: '\u{7f}',
                offset: 8
            })
        );
    }

    #[test]
    fn test_empty_and_trailing_input() {
        assert!(matches!(
            parse_wire(""),
            Err(Error::MalformedProgram { .. })
        ));
        assert!(matches!(
            parse_wire("   "),
            Err(Error::MalformedProgram { span, reason })
                if span == (3..3) && reason == "program ended where a term was expected"
        ));
        let e = parse_wire("I! I\"").unwrap_err();
        assert!(matches!(e, Error::MalformedProgram { .. }));
        assert_eq!(e.span(), Some(3..5));
    }

    #[test]
    fn test_parse_tokens_directly() {
        let tokens = tokenize("U! T").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(parse_tokens(&tokens, 4).unwrap(), not(boolean(true)));
        assert!(matches!(
            parse_tokens(&tokens[..1], 2),
            Err(Error::MalformedProgram { span, .. }) if span == (2..2)
        ));
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 100_000;
        let term = parse_wire(&("U- ".repeat(depth) + "I!")).unwrap();
        assert_eq!(term.size(), depth + 1);
        assert!(term_to_wire(&term).unwrap().ends_with("U- U- I!"));

        roundtrip((0..depth).fold(int(0u32), |term, n| {
            concat(term, int_to_string(int(n as u32)))
        }));
        roundtrip(apply_spine(var(name("f")), (0..depth).map(|_| boolean(false))));
    }
}
