//! Smart constructors for [`Term`].
//!
//! Binders are written in higher-order style: [`lambda`] hands the callback a
//! `Var` for a freshly named parameter and wraps whatever it returns.
//!
//! ```
//! use icfp::builder::*;
//!
//! let fact = rec(|f| {
//!     lambda(|x| {
//!         cond(
//!             equal(int(0u32), x.clone()),
//!             int(1u32),
//!             mul(x.clone(), apply(f, sub(x, int(1u32)))),
//!         )
//!     })
//! });
//! let program = apply(fact, int(5u32));
//! let wire = icfp::term_to_wire(&program).unwrap();
//! assert_eq!(icfp::parse_wire(&wire).unwrap(), program);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use num_bigint::BigUint;
use tracing::trace;

use crate::{
    codec,
    prelude::*,
    term::{BinOp, Term, UnOp},
};

static NEXT_NAME: AtomicU64 = AtomicU64::new(0);

/// Issues a binder name no other call in this process has returned: the base-94
/// digits of a global counter.
pub fn fresh_name() -> Identifier {
    let id = NEXT_NAME.fetch_add(1, Ordering::Relaxed);
    let name = codec::encode_natural(&BigUint::from(id));
    trace!(id, %name, "issued fresh binder");
    Identifier::new(name)
}

pub fn int(n: impl Into<BigUint>) -> Term {
    Term::Int(n.into())
}

pub fn string(s: impl Into<String>) -> Term {
    Term::Str(s.into())
}

pub fn boolean(b: bool) -> Term {
    Term::Bool(b)
}

pub fn var(name: impl Into<Identifier>) -> Term {
    Term::Var(name.into())
}

pub fn binary(op: BinOp, lhs: Term, rhs: Term) -> Term {
    Term::Binary {
        op,
        lhs: lhs.into(),
        rhs: rhs.into(),
    }
}

pub fn unary(op: UnOp, operand: Term) -> Term {
    Term::Unary {
        op,
        operand: operand.into(),
    }
}

pub fn cond(cond: Term, positive: Term, negative: Term) -> Term {
    Term::If {
        cond: cond.into(),
        positive: positive.into(),
        negative: negative.into(),
    }
}

pub fn add(lhs: Term, rhs: Term) -> Term {
    binary(BinOp::Add, lhs, rhs)
}
pub fn sub(lhs: Term, rhs: Term) -> Term {
    binary(BinOp::Sub, lhs, rhs)
}
pub fn mul(lhs: Term, rhs: Term) -> Term {
    binary(BinOp::Mul, lhs, rhs)
}
pub fn div(lhs: Term, rhs: Term) -> Term {
    binary(BinOp::Div, lhs, rhs)
}
pub fn modulo(lhs: Term, rhs: Term) -> Term {
    binary(BinOp::Mod, lhs, rhs)
}
pub fn less(lhs: Term, rhs: Term) -> Term {
    binary(BinOp::Less, lhs, rhs)
}
pub fn greater(lhs: Term, rhs: Term) -> Term {
    binary(BinOp::Greater, lhs, rhs)
}
pub fn equal(lhs: Term, rhs: Term) -> Term {
    binary(BinOp::Equal, lhs, rhs)
}
pub fn or(lhs: Term, rhs: Term) -> Term {
    binary(BinOp::Or, lhs, rhs)
}
pub fn and(lhs: Term, rhs: Term) -> Term {
    binary(BinOp::And, lhs, rhs)
}
pub fn concat(lhs: Term, rhs: Term) -> Term {
    binary(BinOp::Concat, lhs, rhs)
}
/// First `n` characters of `s`.
pub fn take(n: Term, s: Term) -> Term {
    binary(BinOp::Take, n, s)
}
/// `s` without its first `n` characters.
pub fn drop(n: Term, s: Term) -> Term {
    binary(BinOp::Drop, n, s)
}
pub fn apply(func: Term, arg: Term) -> Term {
    binary(BinOp::Apply, func, arg)
}

pub fn negate(operand: Term) -> Term {
    unary(UnOp::Negate, operand)
}
pub fn not(operand: Term) -> Term {
    unary(UnOp::Not, operand)
}
pub fn string_to_int(operand: Term) -> Term {
    unary(UnOp::StringToInt, operand)
}
pub fn int_to_string(operand: Term) -> Term {
    unary(UnOp::IntToString, operand)
}

pub fn raw_lambda(var: impl Into<Identifier>, body: Term) -> Term {
    Term::Lambda {
        var: var.into(),
        body: body.into(),
    }
}

pub fn lambda_named(var: Identifier, body: impl FnOnce(Term) -> Term) -> Term {
    let body = body(Term::Var(var.clone()));
    raw_lambda(var, body)
}

pub fn lambda(body: impl FnOnce(Term) -> Term) -> Term {
    lambda_named(fresh_name(), body)
}

/// `λf. (λx. f (x x)) (λx. f (x x))`
pub fn y_combinator() -> Term {
    lambda(|f| {
        let half = |f: Term| lambda(|x| apply(f, apply(x.clone(), x)));
        apply(half(f.clone()), half(f))
    })
}

/// Ties a recursive knot: `body` receives the function itself.
pub fn rec(body: impl FnOnce(Term) -> Term) -> Term {
    apply(y_combinator(), lambda(body))
}

/// `f a b c` as `((f a) b) c`.
pub fn apply_spine(func: Term, args: impl IntoIterator<Item = Term>) -> Term {
    args.into_iter().fold(func, apply)
}

/// Sequential `let` bindings.
///
/// The first binding is the outermost lambda, so every bound value can refer to
/// the names bound before it.
pub fn let_in(bindings: impl IntoIterator<Item = (Identifier, Term)>, body: Term) -> Term {
    let bindings = bindings.into_iter().collect::<Vec<_>>();
    bindings
        .into_iter()
        .rev()
        .fold(body, |body, (var, value)| apply(raw_lambda(var, body), value))
}

pub fn let_with(value: Term, body: impl FnOnce(Term) -> Term) -> Term {
    apply(lambda(body), value)
}

/// Church pair: a function selecting `first` on `true` and `second` on `false`.
pub fn pair(first: Term, second: Term) -> Term {
    lambda(|x| cond(x, first, second))
}

pub fn first(pair: Term) -> Term {
    apply(pair, boolean(true))
}

pub fn second(pair: Term) -> Term {
    apply(pair, boolean(false))
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;

    fn ident(s: &str) -> Identifier {
        Identifier::new(s.to_string())
    }

    #[test]
    fn test_lambda_substitutes_its_own_name() {
        let term = lambda(|x| add(x.clone(), x));
        let Term::Lambda { var, body } = &term else {
            panic!("expected a lambda, got {term:?}");
        };
        assert_eq!(
            body.as_ref(),
            &add(Term::Var(var.clone()), Term::Var(var.clone()))
        );
    }

    #[test]
    fn test_fresh_names_are_distinct() {
        let names = (0..200).map(|_| fresh_name()).collect::<HashSet<_>>();
        assert_eq!(names.len(), 200);
        let lambdas = (lambda(|x| x), lambda(|x| x));
        let (Term::Lambda { var: a, .. }, Term::Lambda { var: b, .. }) = &lambdas else {
            panic!("expected lambdas");
        };
        assert_ne!(a, b);
    }

    #[test]
    fn test_fresh_names_are_distinct_across_threads() {
        let handles = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..100)
                        .map(|_| fresh_name().to_string())
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();
        let names = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect::<HashSet<_>>();
        assert_eq!(names.len(), 400);
    }

    #[test]
    fn test_fresh_names_are_wire_safe() {
        for _ in 0..100 {
            assert!(codec::check_wire(&fresh_name()).is_ok());
        }
    }

    #[test]
    fn test_y_combinator_shape() {
        let y = y_combinator();
        let Term::Lambda { var: f, body } = &y else {
            panic!("expected a lambda");
        };
        let Term::Binary {
            op: BinOp::Apply,
            lhs,
            rhs,
        } = body.as_ref()
        else {
            panic!("expected an application, got {body:?}");
        };
        for half in [lhs, rhs] {
            let Term::Lambda { var: x, body } = half.as_ref() else {
                panic!("expected a lambda, got {half:?}");
            };
            let x = Term::Var(x.clone());
            assert_eq!(
                body.as_ref(),
                &apply(Term::Var(f.clone()), apply(x.clone(), x))
            );
        }
        assert_ne!(lhs, rhs);
    }

    #[test]
    fn test_rec_applies_y_to_the_body() {
        let term = rec(|f| lambda(|n| apply(f, n)));
        let Term::Binary {
            op: BinOp::Apply,
            lhs,
            rhs,
        } = &term
        else {
            panic!("expected an application, got {term:?}");
        };
        assert!(matches!(lhs.as_ref(), Term::Lambda { .. }));
        let Term::Lambda { var: f, body } = rhs.as_ref() else {
            panic!("expected a lambda, got {rhs:?}");
        };
        let Term::Lambda { var: n, body } = body.as_ref() else {
            panic!("expected a lambda, got {body:?}");
        };
        assert_eq!(
            body.as_ref(),
            &apply(Term::Var(f.clone()), Term::Var(n.clone()))
        );
    }

    #[test]
    fn test_apply_spine_is_left_nested() {
        let f = var(ident("f"));
        assert_eq!(apply_spine(f.clone(), std::iter::empty()), f);
        assert_eq!(
            apply_spine(f.clone(), [int(1u32), int(2u32)]),
            apply(apply(f, int(1u32)), int(2u32))
        );
    }

    #[test]
    fn test_let_in_binds_first_declared_outermost() {
        let term = let_in(
            [
                (ident("a"), int(1u32)),
                (ident("b"), add(var(ident("a")), int(1u32))),
            ],
            mul(var(ident("a")), var(ident("b"))),
        );
        let expected = apply(
            raw_lambda(
                ident("a"),
                apply(
                    raw_lambda(ident("b"), mul(var(ident("a")), var(ident("b")))),
                    add(var(ident("a")), int(1u32)),
                ),
            ),
            int(1u32),
        );
        assert_eq!(term, expected);
        assert_eq!(let_in(Vec::new(), int(7u32)), int(7u32));
    }

    #[test]
    fn test_let_with() {
        let term = let_with(int(3u32), |x| add(x.clone(), x));
        let Term::Binary {
            op: BinOp::Apply,
            lhs,
            rhs,
        } = &term
        else {
            panic!("expected an application, got {term:?}");
        };
        assert_eq!(rhs.as_ref(), &int(3u32));
        assert!(matches!(lhs.as_ref(), Term::Lambda { .. }));
    }

    #[test]
    fn test_pair_projections() {
        let p = pair(string("l"), string("r"));
        let Term::Lambda { var: x, body } = &p else {
            panic!("expected a lambda, got {p:?}");
        };
        assert_eq!(
            body.as_ref(),
            &cond(Term::Var(x.clone()), string("l"), string("r"))
        );
        assert_eq!(first(p.clone()), apply(p.clone(), boolean(true)));
        assert_eq!(second(p.clone()), apply(p, boolean(false)));
    }
}
