use std::rc::Rc;

pub type Identifier = Rc<String>;

pub type Span = std::ops::Range<usize>;

#[derive(Clone, PartialEq, Eq, derive_more::Display, Debug)]
#[display(bound = "T: std::fmt::Display")]
#[display(fmt = "{value}")]
pub struct Spanned<T> {
    pub span: Span,
    pub value: T,
}
impl<T> Spanned<T> {
    pub fn forget_span(self) -> T {
        self.value
    }
    pub fn value(&self) -> &T {
        &self.value
    }
    pub fn span(&self) -> Span {
        self.span.clone()
    }
}

pub use crate::error::Error;
pub type Result<T, E = Error> = std::result::Result<T, E>;
