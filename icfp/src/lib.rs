//! Terms of the contest's lambda-calculus exchange language, and their wire form.
//!
//! A program travels as whitespace-separated tokens in prefix order. Each token
//! starts with an indicator character (`B` binary operator, `U` unary operator,
//! `?` conditional, `L` lambda, `v` variable, `S` string, `I` integer, `T`/`F`
//! booleans) followed by a payload in the 94-symbol alphabet of [`codec`].
//!
//! ```
//! use icfp::builder::{concat, string};
//!
//! let term = concat(string("Hello"), string(" World!"));
//! let wire = icfp::term_to_wire(&term).unwrap();
//! assert_eq!(wire, "B. SB%,,/ S}Q/2,$_");
//! assert_eq!(icfp::parse_wire(&wire).unwrap(), term);
//! assert_eq!(term.to_string(), r#"(++ "Hello" " World!")"#);
//! ```

pub mod builder;
pub mod codec;
mod error;
pub mod parser;
pub mod prelude;
pub mod pretty;
pub mod programs;
pub mod serializer;
pub mod term;
pub mod token;

pub use error::Error;
pub use parser::parse_wire;
pub use pretty::term_to_display_text;
pub use serializer::{term_to_tokens, term_to_wire};
pub use term::{BinOp, Term, TermRef, UnOp};
pub use token::Token;
