//! Source parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens), pulled one token at a time
//! - [`token`]: Token kinds, payloads and the keyword table
//! - [`parse`]: Parser state, configuration and the program entry point
//! - [`ast`]: AST node definitions
//! - [`factory`]: One constructor per node kind, and tree release
//! - [`error`]: Lexer and parser error types
//!
//! # Language
//!
//! - Types: `bool byte short ushort int uint long ulong float double schar
//!   char uchar string arch uarch`, `long long`, `ulong long`, `long double`,
//!   pointers, arrays, structs, unions, enums, typedefs
//! - Items: functions and prototypes, globals, `impl` method blocks
//! - Statements: `if`/`else`, `switch`, `while`, `do`-`while`, `for`,
//!   `try`/`catch`/`throw`, `label`/`jump`, `break`, `continue`, `return`
//! - Expressions: C precedence, casts, `sizeof`, `typeof`, lambdas,
//!   compound expressions and the memory intrinsics
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod display;
pub mod error;
mod expressions;
pub mod factory;
pub mod lexer;
pub mod parse;
mod statements;
pub mod token;
