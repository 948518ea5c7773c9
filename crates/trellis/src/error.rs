//! Error taxonomy.
//!
//! Every failure mode of the lexer, the AST builder, and the schema engine is
//! one variant here. Lexical and parse errors carry the source location they
//! were raised at; schema-build errors carry the offending name. All of them
//! are fatal for the call that produced them - nothing is retried and there
//! is no partial result.

use common::SourceLoc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown character")]
    UnknownToken { loc: SourceLoc },

    #[error("bad indent (expected {expected}, actual {actual})")]
    BadIndent {
        loc: SourceLoc,
        expected: u32,
        actual: u32,
    },

    #[error("bad indent for closing (expected {expected}, actual {actual})")]
    BadIndentClose {
        loc: SourceLoc,
        expected: u32,
        actual: u32,
    },

    #[error("unbalanced list")]
    Unbalanced { loc: SourceLoc },

    #[error("separator expected")]
    MissingSeparator { loc: SourceLoc },

    #[error("unary operator expects exactly 1 argument")]
    UnaryArity { loc: SourceLoc },

    #[error("binary operator expects exactly 2 arguments")]
    BinaryArity { loc: SourceLoc },

    #[error("unknown unary operator '{spelling}'")]
    UnknownUnary { loc: SourceLoc, spelling: String },

    #[error("unknown binary operator '{spelling}'")]
    UnknownBinary { loc: SourceLoc, spelling: String },

    /// The schema (or source) text parsed, but did not match the expected
    /// shape. The location anchors the furthest-reached mismatch when one is
    /// known.
    #[error("syntax error")]
    SchemaSyntax { loc: Option<SourceLoc> },

    #[error("rule '{0}' not found")]
    MissingRule(String),

    #[error("rule '{0}' defined twice")]
    DuplicateRule(String),

    #[error("handler '{0}' not found")]
    MissingHandler(String),

    #[error("top rule '{0}' not found")]
    MissingTopRule(String),

    /// A consumer callback refused; propagated through dispatch unchanged.
    #[error("{0}")]
    Handler(String),
}

impl Error {
    /// Source location, for errors that have one.
    pub fn location(&self) -> Option<SourceLoc> {
        match self {
            Error::UnknownToken { loc }
            | Error::BadIndent { loc, .. }
            | Error::BadIndentClose { loc, .. }
            | Error::Unbalanced { loc }
            | Error::MissingSeparator { loc }
            | Error::UnaryArity { loc }
            | Error::BinaryArity { loc }
            | Error::UnknownUnary { loc, .. }
            | Error::UnknownBinary { loc, .. } => Some(*loc),
            Error::SchemaSyntax { loc } => *loc,
            _ => None,
        }
    }

    /// Shorthand for a callback failure.
    pub fn handler(msg: impl Into<String>) -> Self {
        Error::Handler(msg.into())
    }
}
