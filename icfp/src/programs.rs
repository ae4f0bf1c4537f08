//! Contest programs built with the builder library.

use crate::{builder::*, term::Term};

pub const NAMES: &[&str] = &["repeat", "factorial", "spiral", "lambdaman8"];

pub fn by_name(name: &str) -> Option<Term> {
    Some(match name {
        "repeat" => repeat(),
        "factorial" => factorial(),
        "spiral" => spiral(),
        "lambdaman8" => lambdaman_spiral(),
        _ => return None,
    })
}

/// `repeat s n`: `n` copies of `s`, for `n >= 1`.
pub fn repeat() -> Term {
    rec(|r| {
        lambda(|s| {
            lambda(|n| {
                cond(
                    equal(n.clone(), int(1u32)),
                    s.clone(),
                    concat(s.clone(), apply_spine(r, [s, sub(n, int(1u32))])),
                )
            })
        })
    })
}

pub fn factorial() -> Term {
    rec(|f| {
        lambda(|x| {
            cond(
                equal(int(0u32), x.clone()),
                int(1u32),
                mul(x.clone(), apply(f, sub(x, int(1u32)))),
            )
        })
    })
}

/// Walks an outward square spiral: runs of `D`, `L`, `U`, `R` whose length grows
/// by two per side, until the side length reaches 98.
pub fn spiral() -> Term {
    let repeat_name = fresh_name();
    let run = |direction: &str, n: Term| {
        apply_spine(var(repeat_name.clone()), [string(direction), n])
    };
    let body = rec(|s| {
        lambda(|n| {
            cond(
                equal(n.clone(), int(98u32)),
                concat(run("D", int(98u32)), run("L", int(97u32))),
                concat(
                    concat(
                        concat(run("D", n.clone()), run("L", n.clone())),
                        concat(
                            run("U", add(n.clone(), int(2u32))),
                            run("R", add(n.clone(), int(2u32))),
                        ),
                    ),
                    apply(s, add(n, int(4u32))),
                ),
            )
        })
    });
    let_in([(repeat_name, repeat())], body)
}

/// The submission for lambdaman8: the solve request prefix followed by the spiral.
pub fn lambdaman_spiral() -> Term {
    concat(string("solve lambdaman8 "), apply(spiral(), int(2u32)))
}
