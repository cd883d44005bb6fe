//! # Introduction
//!
//! crisp is the front end of a statically-typed, C-like systems language:
//! it turns source text into an owned syntax tree.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST
//! ```
//!
//! 1. [`parser::lexer`]: pulls one token at a time from a private copy of
//!    the source, with keyword lookup and maximal-munch operators.
//! 2. [`parser::parse`]: recursive descent over statements and
//!    declarations, precedence climbing over binary operators.
//! 3. [`parser::ast`]: a closed set of node kinds. Each child is owned by
//!    exactly one parent and dropping the root releases the tree.
//!
//! Errors carry a kind, a message and the line/column where parsing
//! stopped; the first error ends the parse.
//!
//! ```
//! let program = crisp::parse_source("int x = 5;").unwrap();
//! assert_eq!(program.to_string(), "(decl x int = 5)");
//! ```

pub mod parser;
pub mod source;

pub use parser::ast::{AstNode, NodeKind, Program, SourceLocation};
pub use parser::error::{LexError, LexErrorKind, ParseError, ParseErrorKind};
pub use parser::factory::free_tree;
pub use parser::lexer::Lexer;
pub use parser::parse::{Parser, ParserConfig, DEFAULT_MAX_DEPTH};
pub use parser::token::{Token, TokenKind, TokenValue};
pub use source::{read_source, SourceError};

/// Parse a whole source unit with the default configuration.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    let mut lexer = Lexer::new(source);
    let mut parser = Parser::new(&mut lexer)?;
    parser.parse_program()
}
