//! Human-readable rendering of terms. The output is for inspection only and is
//! never parsed back.

use std::fmt::Write as _;

use crate::term::{BinOp, Term, UnOp};

impl BinOp {
    pub fn display_name(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::Equal => "=",
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Concat => "++",
            BinOp::Take => "take",
            BinOp::Drop => "drop",
            BinOp::Apply => "apply",
        }
    }
}

impl UnOp {
    pub fn display_name(self) -> &'static str {
        match self {
            UnOp::Negate => "-",
            UnOp::Not => "!",
            UnOp::StringToInt => "str->int",
            UnOp::IntToString => "int->str",
        }
    }
}

enum Piece<'a> {
    Term(&'a Term),
    Text(&'static str),
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pending = vec![Piece::Term(self)];
        while let Some(piece) = pending.pop() {
            let term = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Term(term) => term,
            };
            match term {
                Term::Binary {
                    op: BinOp::Apply, ..
                } => f.write_char('(')?,
                Term::Binary { op, .. } => write!(f, "({} ", op.display_name())?,
                Term::Unary { op, .. } => write!(f, "({} ", op.display_name())?,
                Term::If { .. } => f.write_str("(if ")?,
                Term::Lambda { var, .. } => write!(f, "(λ {var} ")?,
                Term::Var(name) => f.write_str(name)?,
                Term::Str(s) => {
                    f.write_char('"')?;
                    for c in s.chars() {
                        if matches!(c, '"' | '\\') {
                            f.write_char('\\')?;
                        }
                        f.write_char(c)?;
                    }
                    f.write_char('"')?;
                }
                Term::Int(n) => write!(f, "{n}")?,
                Term::Bool(v) => write!(f, "{v}")?,
            }
            let mut children = term.children().rev().peekable();
            if children.peek().is_some() {
                pending.push(Piece::Text(")"));
            }
            while let Some(child) = children.next() {
                pending.push(Piece::Term(child.as_ref()));
                if children.peek().is_some() {
                    pending.push(Piece::Text(" "));
                }
            }
        }
        Ok(())
    }
}

pub fn term_to_display_text(term: &Term) -> String {
    term.to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{builder::*, prelude::Identifier};

    fn name(s: &str) -> Identifier {
        Identifier::new(s.to_string())
    }

    #[test]
    fn test_display() {
        assert_eq!(
            term_to_display_text(&apply(var(name("f")), int(1u32))),
            "(f 1)"
        );
        assert_eq!(
            term_to_display_text(&add(int(1u32), negate(int(2u32)))),
            "(+ 1 (- 2))"
        );
        assert_eq!(
            term_to_display_text(&cond(
                boolean(true),
                concat(string("a"), string("b")),
                take(int(1u32), string("c")),
            )),
            "(if true (++ \"a\" \"b\") (take 1 \"c\"))"
        );
        assert_eq!(
            term_to_display_text(&raw_lambda(name("#"), string_to_int(var(name("#"))))),
            "(λ # (str->int #))"
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            term_to_display_text(&string("say \"hi\" \\ bye")),
            r#""say \"hi\" \\ bye""#
        );
    }

    #[test]
    fn test_large_integers_in_decimal() {
        let wire = "I~~~~~~~~~~~~";
        let term = crate::parse_wire(wire).unwrap();
        let expected = num_bigint::BigUint::from(94u32).pow(12) - 1u32;
        assert_eq!(term.to_string(), expected.to_string());
    }

    #[test]
    fn test_deeply_nested_display() {
        let depth = 100_000;
        let term = (0..depth).fold(int(0u32), |term, _| negate(term));
        let text = term.to_string();
        assert_eq!(text.len(), 4 * depth + 1);
        assert!(text.starts_with("(- (- (- "));
        assert!(text.ends_with("0)))"));
    }
}
