//! Error types for the front end
//!
//! Lexing and parsing both stop at the first error. Each error carries a
//! kind tag, a human-readable message and the line/column of the offending
//! token, so callers never have to reconstruct where a parse gave up.

use super::ast::SourceLocation;
use thiserror::Error;

/// What went wrong while turning characters into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedChar,
    UnterminatedComment,
    InvalidNumber,
    InvalidEscape,
    /// Duplicating a lexeme failed to allocate.
    OutOfMemory,
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at {location}: {message}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub message: String,
    pub location: SourceLocation,
}

impl LexError {
    pub fn new(kind: LexErrorKind, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }
}

/// What went wrong while turning tokens into a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The lexer failed underneath the parser.
    Lex(LexErrorKind),
    UnexpectedToken,
    UnexpectedEof,
    ExpectedType,
    /// A memory intrinsic was called with the wrong number of arguments.
    InvalidArity,
    InvalidInitializer,
    InvalidEnumValue,
    NestingTooDeep,
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at {location}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            kind: ParseErrorKind::Lex(err.kind),
            message: err.message,
            location: err.location,
        }
    }
}
