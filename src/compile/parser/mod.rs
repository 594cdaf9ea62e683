use std::fmt::Display;

use chumsky::{error::Rich, span::Span};

pub mod elaboration;
pub mod feed;
pub mod lex;
pub mod parse;

pub use crate::compile::ast::SourcePos;

pub type Spanned<T> = (T, SourcePos);

/// A lexer or parser error detached from the input it was produced for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub span: SourcePos,
    pub message: String,
}

impl SyntaxError {
    pub fn from_rich<T, S>(err: &Rich<'_, T, S>) -> Self
    where
        T: Display,
        S: Span<Offset = usize>,
    {
        let span = err.span();

        SyntaxError {
            span: span.start()..span.end(),
            message: err.reason().to_string(),
        }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}
