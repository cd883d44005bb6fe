//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, its configuration and the
//! helper methods the grammar modules share.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and the program entry point
//! - `declarations`: types, variable/function declarations, user-defined types
//! - `statements`: statements (if, while, for, try, etc.)
//! - `expressions`: expressions with precedence climbing
//!
//! # Implementation
//!
//! The parser borrows a [`Lexer`] and keeps exactly one buffered lookahead
//! token. Parser methods are split across multiple files using `impl Parser`
//! blocks. The first error aborts the parse; any subtree built so far is
//! dropped on the way out.

use crate::parser::ast::*;
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::lexer::Lexer;
use crate::parser::token::{Token, TokenKind, TokenValue};
use log::debug;
use rustc_hash::FxHashSet;
use std::mem;

/// Nesting limit used by [`ParserConfig::default`].
///
/// The deepest input accepted under this limit must parse on a 2 MiB
/// thread stack in an unoptimized build.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest expression/statement nesting accepted before the parse fails
    /// with [`ParseErrorKind::NestingTooDeep`].
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Recursive descent parser
pub struct Parser<'a> {
    lexer: &'a mut Lexer,
    pub(crate) current: Token,
    config: ParserConfig,
    depth: usize,
    /// Aliases introduced by `typedef` so far; each can start a declaration
    typedefs: FxHashSet<String>,
}

impl<'a> Parser<'a> {
    /// Create a parser with the default configuration and pull the first token.
    pub fn new(lexer: &'a mut Lexer) -> Result<Self, ParseError> {
        Self::with_config(lexer, ParserConfig::default())
    }

    pub fn with_config(lexer: &'a mut Lexer, config: ParserConfig) -> Result<Self, ParseError> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            config,
            depth: 0,
            typedefs: FxHashSet::default(),
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse the entire program (top-level items)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        debug!("parsing program");
        let mut program = Program::new();

        while !self.is_at_end() {
            let item = self
                .parse_top_level()
                .inspect_err(|err| debug!("parse failed: {}", err))?;
            program.items.push(item);
        }

        debug!("parsed {} top-level items", program.items.len());
        Ok(program)
    }

    // ===== Helper methods =====

    /// Pull the next token and hand back the one it replaces.
    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current, next))
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.current.location
    }

    /// Error pointing at the current token. Running out of input reports
    /// [`ParseErrorKind::UnexpectedEof`] instead of `kind`.
    pub(crate) fn error(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        let kind = if self.is_at_end() && kind == ParseErrorKind::UnexpectedToken {
            ParseErrorKind::UnexpectedEof
        } else {
            kind
        };
        ParseError::new(kind, message, self.current.location)
    }

    pub(crate) fn expect_token(&mut self, kind: TokenKind, message: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.error(
                ParseErrorKind::UnexpectedToken,
                format!("{}, found {}", message, self.current),
            ))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(TokenKind::LParen, &format!("Expected '(' {ctx}"))
            .map(drop)
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(TokenKind::RParen, &format!("Expected ')' {ctx}"))
            .map(drop)
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(TokenKind::LBrace, &format!("Expected '{{' {ctx}"))
            .map(drop)
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(TokenKind::RBrace, &format!("Expected '}}' {ctx}"))
            .map(drop)
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(TokenKind::Semicolon, &format!("Expected ';' {ctx}"))
            .map(drop)
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<String, ParseError> {
        if self.check(TokenKind::Identifier) {
            if let TokenValue::Identifier(name) = self.advance()?.value {
                return Ok(name);
            }
        }
        Err(self.error(
            ParseErrorKind::UnexpectedToken,
            format!("Expected identifier {ctx}, found {}", self.current),
        ))
    }

    /// Run `f` one nesting level deeper, failing once the configured limit
    /// is passed.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.config.max_depth {
            debug!(
                "nesting limit {} reached at {}",
                self.config.max_depth, self.current.location
            );
            return Err(self.error(
                ParseErrorKind::NestingTooDeep,
                format!("Nesting deeper than {} levels", self.config.max_depth),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn is_typedef_name(&self, name: &str) -> bool {
        self.typedefs.contains(name)
    }

    pub(crate) fn register_typedef(&mut self, alias: &str) {
        self.typedefs.insert(alias.to_owned());
    }

    /// Whether the current token can begin a type
    pub(crate) fn starts_type(&self) -> bool {
        match self.current.kind {
            TokenKind::Bool
            | TokenKind::Byte
            | TokenKind::Short
            | TokenKind::UShort
            | TokenKind::Int
            | TokenKind::UInt
            | TokenKind::Long
            | TokenKind::ULong
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::SChar
            | TokenKind::Char
            | TokenKind::UChar
            | TokenKind::String
            | TokenKind::Arch
            | TokenKind::UArch
            | TokenKind::Void
            | TokenKind::Fun
            | TokenKind::Struct
            | TokenKind::Union
            | TokenKind::Enum => true,
            TokenKind::Identifier => self
                .current
                .identifier()
                .is_some_and(|name| self.is_typedef_name(name)),
            _ => false,
        }
    }

    /// Whether the current token can begin a declaration
    pub(crate) fn starts_declaration(&self) -> bool {
        self.starts_type() || storage_flag(self.current.kind).is_some()
    }
}

/// Storage qualifier named by a token kind
pub(crate) fn storage_flag(kind: TokenKind) -> Option<StorageFlags> {
    match kind {
        TokenKind::Const => Some(StorageFlags::CONST),
        TokenKind::Static => Some(StorageFlags::STATIC),
        TokenKind::Extern => Some(StorageFlags::EXTERN),
        TokenKind::Volatile => Some(StorageFlags::VOLATILE),
        TokenKind::Atomic => Some(StorageFlags::ATOMIC),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Program, ParseError> {
        let mut lexer = Lexer::new(source);
        let mut parser = Parser::new(&mut lexer)?;
        parser.parse_program()
    }

    #[test]
    fn test_parse_simple_function() {
        let program = parse("int main() { return 0; }").unwrap();

        assert_eq!(program.items.len(), 1);
        match &program.items[0] {
            AstNode::Function {
                name,
                params,
                return_type,
                body,
                ..
            } => {
                assert_eq!(name, "main");
                assert!(params.is_empty());
                assert!(matches!(
                    **return_type,
                    AstNode::Primitive {
                        ty: PrimitiveType::Int,
                        ..
                    }
                ));
                assert_eq!(body.as_ref().map(Vec::len), Some(1));
            }
            _ => panic!("Expected function definition"),
        }
    }

    #[test]
    fn test_parse_struct() {
        let program = parse("struct Point { int x; int y; };").unwrap();

        assert_eq!(program.items.len(), 1);
        match &program.items[0] {
            AstNode::Struct { name, fields, .. } => {
                assert_eq!(name, "Point");
                assert_eq!(fields.len(), 2);
            }
            _ => panic!("Expected struct definition"),
        }
    }

    #[test]
    fn test_empty_program() {
        assert!(parse("  // nothing\n").unwrap().items.is_empty());
    }

    #[test]
    fn test_error_reports_location() {
        let err = parse("int main() {\n  return 0\n}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.location, SourceLocation::new(3, 1));
        assert_eq!(err.message, "Expected ';' after return, found '}'");
    }

    #[test]
    fn test_missing_brace_is_eof() {
        let err = parse("int main() { return 0;").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_lex_error_surfaces_as_parse_error() {
        let err = parse("string s = \"abc").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::Lex(crate::parser::error::LexErrorKind::UnterminatedString)
        );
    }

    #[test]
    fn test_config_builder() {
        let config = ParserConfig::default().with_max_depth(8);
        assert_eq!(config.max_depth, 8);

        let mut lexer = Lexer::new("int x;");
        let parser = Parser::with_config(&mut lexer, config).unwrap();
        assert_eq!(parser.config().max_depth, 8);
        assert_eq!(ParserConfig::default().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_nesting_limit() {
        let source = format!("int x = {}1{};", "(".repeat(20), ")".repeat(20));
        let mut lexer = Lexer::new(&source);
        let config = ParserConfig::default().with_max_depth(10);
        let mut parser = Parser::with_config(&mut lexer, config).unwrap();
        let err = parser.parse_program().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);

        let mut lexer = Lexer::new(&source);
        let config = ParserConfig::default().with_max_depth(40);
        let mut parser = Parser::with_config(&mut lexer, config).unwrap();
        assert!(parser.parse_program().is_ok());
    }
}
