use std::{fmt::Write as _, rc::Rc};

use num_bigint::BigUint;

use crate::prelude::*;

pub type TermRef = Rc<Term>;

/// Binary operators, displayed as their one-character wire symbol.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// Truncates toward zero.
    Div,
    Mod,
    Less,
    Greater,
    Equal,
    Or,
    And,
    Concat,
    Take,
    Drop,
    Apply,
}

impl BinOp {
    pub const ALL: [BinOp; 14] = [
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Mod,
        BinOp::Less,
        BinOp::Greater,
        BinOp::Equal,
        BinOp::Or,
        BinOp::And,
        BinOp::Concat,
        BinOp::Take,
        BinOp::Drop,
        BinOp::Apply,
    ];

    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
            BinOp::Mod => '%',
            BinOp::Less => '<',
            BinOp::Greater => '>',
            BinOp::Equal => '=',
            BinOp::Or => '|',
            BinOp::And => '&',
            BinOp::Concat => '.',
            BinOp::Take => 'T',
            BinOp::Drop => 'D',
            BinOp::Apply => '$',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char(self.symbol())
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum UnOp {
    Negate,
    Not,
    StringToInt,
    IntToString,
}

impl UnOp {
    pub const ALL: [UnOp; 4] = [UnOp::Negate, UnOp::Not, UnOp::StringToInt, UnOp::IntToString];

    pub fn symbol(self) -> char {
        match self {
            UnOp::Negate => '-',
            UnOp::Not => '!',
            UnOp::StringToInt => '#',
            UnOp::IntToString => '$',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char(self.symbol())
    }
}

/// An expression of the contest language.
///
/// Children are shared, so cloning a term is shallow. Binder names are opaque:
/// nothing here checks that a `Var` is bound.
///
/// Every walk over a term (comparison, dropping, serializing, printing) keeps
/// its own work list, so arbitrarily deep trees never exhaust the call stack.
#[derive(Clone)]
pub enum Term {
    Binary {
        op: BinOp,
        lhs: TermRef,
        rhs: TermRef,
    },
    Unary {
        op: UnOp,
        operand: TermRef,
    },
    If {
        cond: TermRef,
        positive: TermRef,
        negative: TermRef,
    },
    Lambda {
        var: Identifier,
        body: TermRef,
    },
    Var(Identifier),
    Str(String),
    /// Literals are unsigned; negative numbers are `Unary { op: Negate, .. }`.
    Int(BigUint),
    Bool(bool),
}

impl Term {
    /// Immediate subterms, left to right.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &TermRef> {
        let (a, b, c) = match self {
            Term::Binary { lhs, rhs, .. } => (Some(lhs), Some(rhs), None),
            Term::Unary { operand, .. } => (Some(operand), None, None),
            Term::If {
                cond,
                positive,
                negative,
            } => (Some(cond), Some(positive), Some(negative)),
            Term::Lambda { body, .. } => (Some(body), None, None),
            Term::Var(_) | Term::Str(_) | Term::Int(_) | Term::Bool(_) => (None, None, None),
        };
        a.into_iter().chain(b).chain(c)
    }

    fn children_mut(&mut self) -> impl Iterator<Item = &mut TermRef> {
        let (a, b, c) = match self {
            Term::Binary { lhs, rhs, .. } => (Some(lhs), Some(rhs), None),
            Term::Unary { operand, .. } => (Some(operand), None, None),
            Term::If {
                cond,
                positive,
                negative,
            } => (Some(cond), Some(positive), Some(negative)),
            Term::Lambda { body, .. } => (Some(body), None, None),
            Term::Var(_) | Term::Str(_) | Term::Int(_) | Term::Bool(_) => (None, None, None),
        };
        a.into_iter().chain(b).chain(c)
    }

    /// Number of nodes in the tree, which is also its wire token count.
    pub fn size(&self) -> usize {
        let mut pending = vec![self];
        let mut size = 0;
        while let Some(term) = pending.pop() {
            size += 1;
            pending.extend(term.children().map(|child| child.as_ref()));
        }
        size
    }

    /// Compares the node itself, ignoring children.
    fn same_node(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Binary { op: a, .. }, Term::Binary { op: b, .. }) => a == b,
            (Term::Unary { op: a, .. }, Term::Unary { op: b, .. }) => a == b,
            (Term::If { .. }, Term::If { .. }) => true,
            (Term::Lambda { var: a, .. }, Term::Lambda { var: b, .. }) => a == b,
            (Term::Var(a), Term::Var(b)) => a == b,
            (Term::Str(a), Term::Str(b)) => a == b,
            (Term::Int(a), Term::Int(b)) => a == b,
            (Term::Bool(a), Term::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if std::ptr::eq(a, b) {
                continue;
            }
            if !a.same_node(b) {
                return false;
            }
            pending.extend(
                a.children()
                    .zip(b.children())
                    .map(|(a, b)| (a.as_ref(), b.as_ref())),
            );
        }
        true
    }
}

impl Eq for Term {}

impl std::fmt::Debug for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

thread_local! {
    static DETACHED: TermRef = Rc::new(Term::Bool(false));
}

impl Drop for Term {
    fn drop(&mut self) {
        // Children are unlinked and released from a work list. Only a child whose
        // last reference is taken here gets its own children unlinked in turn.
        fn detach(term: &mut Term, pending: &mut Vec<TermRef>) {
            for child in term.children_mut() {
                if matches!(**child, Term::Bool(_)) {
                    continue;
                }
                let leaf = DETACHED
                    .try_with(Rc::clone)
                    .unwrap_or_else(|_| Rc::new(Term::Bool(false)));
                pending.push(std::mem::replace(child, leaf));
            }
        }
        let mut pending = Vec::new();
        detach(self, &mut pending);
        while let Some(child) = pending.pop() {
            if let Ok(mut term) = Rc::try_unwrap(child) {
                detach(&mut term, &mut pending);
            }
        }
    }
}
