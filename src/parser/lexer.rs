//! Lexer (tokenizer)
//!
//! Pull-based: the parser asks for one [`Token`] at a time with
//! [`Lexer::next_token`]. Once the input is exhausted every further call
//! returns an end-of-file token. Operators are matched by maximal munch and
//! identifiers are checked against the fixed keyword table.

use super::ast::{Literal, SourceLocation};
use super::error::{LexError, LexErrorKind};
use super::token::{self, Token, TokenKind, TokenValue};
use log::trace;

/// Lexer over a private copy of one source unit
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input, up to and including the end-of-file token
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Produce the next token.
    ///
    /// An error leaves the cursor past the offending text; the caller should
    /// treat it as the end of lexing rather than retry.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;

        let start = self.position;
        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Ok(Token::eof(loc));
        };

        let token = match ch {
            '"' => self.string_literal(start, loc)?,
            '\'' => self.char_literal(start, loc)?,
            '0'..='9' => self.number_literal(start, loc)?,
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(start, loc)?,
            _ => {
                let kind = self.operator(ch, loc)?;
                Token::new(kind, self.lexeme(start, loc)?, loc, TokenValue::None)
            }
        };

        trace!("{} at {}", token, token.location);
        Ok(token)
    }

    /// Match an operator or punctuation token, longest spelling first
    fn operator(&mut self, ch: char, loc: SourceLocation) -> Result<TokenKind, LexError> {
        let kind = match ch {
            '+' => {
                if self.eat('+') {
                    TokenKind::PlusPlus
                } else if self.eat('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    TokenKind::MinusMinus
                } else if self.eat('=') {
                    TokenKind::MinusEq
                } else if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => self.with_eq(TokenKind::Star, TokenKind::StarEq),
            '/' => self.with_eq(TokenKind::Slash, TokenKind::SlashEq),
            '%' => self.with_eq(TokenKind::Percent, TokenKind::PercentEq),
            '^' => self.with_eq(TokenKind::Caret, TokenKind::CaretEq),
            '=' => self.with_eq(TokenKind::Assign, TokenKind::EqEq),
            '!' => self.with_eq(TokenKind::Bang, TokenKind::NotEq),
            '&' => {
                if self.eat('&') {
                    TokenKind::AndAnd
                } else {
                    self.with_eq(TokenKind::Amp, TokenKind::AmpEq)
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::OrOr
                } else {
                    self.with_eq(TokenKind::Pipe, TokenKind::PipeEq)
                }
            }
            '<' => {
                if self.eat('<') {
                    self.with_eq(TokenKind::Shl, TokenKind::ShlEq)
                } else {
                    self.with_eq(TokenKind::Lt, TokenKind::Le)
                }
            }
            '>' => {
                if self.eat('>') {
                    self.with_eq(TokenKind::Shr, TokenKind::ShrEq)
                } else {
                    self.with_eq(TokenKind::Gt, TokenKind::Ge)
                }
            }
            '~' => TokenKind::Tilde,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '\\' => TokenKind::Backslash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            _ => {
                return Err(LexError::new(
                    LexErrorKind::UnexpectedCharacter,
                    format!("Unexpected character: '{}'", ch),
                    loc,
                ))
            }
        };
        Ok(kind)
    }

    /// `plain`, or `with` if the next character is `=`
    fn with_eq(&mut self, plain: TokenKind, with: TokenKind) -> TokenKind {
        if self.eat('=') {
            with
        } else {
            plain
        }
    }

    /// Parse string literal. Only `\"` is an escape; any other backslash is
    /// kept as written.
    fn string_literal(&mut self, start: usize, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.advance(); // consume closing quote
                    let lexeme = self.lexeme(start, loc)?;
                    return Ok(Token::new(
                        TokenKind::StringLiteral,
                        lexeme,
                        loc,
                        TokenValue::Literal(Literal::String(string)),
                    ));
                }
                '\\' if self.peek_ahead(1) == Some('"') => {
                    self.advance();
                    self.advance();
                    string.push('"');
                }
                _ => {
                    self.advance();
                    string.push(ch);
                }
            }
        }

        Err(LexError::new(
            LexErrorKind::UnterminatedString,
            "Unterminated string literal",
            loc,
        ))
    }

    /// Parse character literal
    fn char_literal(&mut self, start: usize, loc: SourceLocation) -> Result<Token, LexError> {
        let unterminated = || {
            LexError::new(
                LexErrorKind::UnterminatedChar,
                "Unterminated character literal",
                loc,
            )
        };

        let ch = self.advance().ok_or_else(unterminated)?;
        let value = if ch == '\\' {
            let escaped = self.advance().ok_or_else(unterminated)?;
            match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '\\' => '\\',
                '\'' => '\'',
                '0' => '\0',
                _ => {
                    return Err(LexError::new(
                        LexErrorKind::InvalidEscape,
                        format!("Unknown escape sequence: \\{}", escaped),
                        self.current_location(),
                    ));
                }
            }
        } else if ch == '\'' {
            return Err(LexError::new(
                LexErrorKind::UnexpectedCharacter,
                "Empty character literal",
                loc,
            ));
        } else {
            ch
        };

        if !value.is_ascii() {
            return Err(LexError::new(
                LexErrorKind::UnexpectedCharacter,
                format!("Character literal '{}' is not ASCII", value),
                loc,
            ));
        }

        // Expect closing quote
        if !self.eat('\'') {
            return Err(unterminated());
        }

        Ok(Token::new(
            TokenKind::CharLiteral,
            self.lexeme(start, loc)?,
            loc,
            TokenValue::Literal(Literal::Char(value as u8 as i8)),
        ))
    }

    /// Parse numeric literal: `d+` or `d+.d+`
    fn number_literal(&mut self, start: usize, loc: SourceLocation) -> Result<Token, LexError> {
        self.skip_digits();

        let is_float = self.peek() == Some('.')
            && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit());
        if is_float {
            self.advance(); // '.'
            self.skip_digits();
        }

        let lexeme = self.lexeme(start, loc)?;
        let invalid = || {
            LexError::new(
                LexErrorKind::InvalidNumber,
                format!("Invalid numeric literal: {}", lexeme),
                loc,
            )
        };

        let value = if is_float {
            Literal::Double(lexeme.parse::<f64>().map_err(|_| invalid())?)
        } else if let Ok(v) = lexeme.parse::<i32>() {
            Literal::Int(v)
        } else if let Ok(v) = lexeme.parse::<i64>() {
            Literal::Long(v)
        } else {
            Literal::ULong(lexeme.parse::<u64>().map_err(|_| invalid())?)
        };

        Ok(Token::new(
            TokenKind::Number,
            lexeme,
            loc,
            TokenValue::Literal(value),
        ))
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, start: usize, loc: SourceLocation) -> Result<Token, LexError> {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text = self.lexeme(start, loc)?;
        if text == "true" || text == "false" {
            let value = TokenValue::Literal(Literal::Bool(text == "true"));
            return Ok(Token::new(TokenKind::BoolLiteral, text, loc, value));
        }

        let token = match token::keyword(&text) {
            Some(kind) => Token::new(kind, text, loc, TokenValue::None),
            None => {
                let name = copy_text(&text, loc)?;
                Token::new(TokenKind::Identifier, text, loc, TokenValue::Identifier(name))
            }
        };
        Ok(token)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::new(
            LexErrorKind::UnterminatedComment,
            "Unterminated block comment",
            start_loc,
        ))
    }

    /// Copy the source text from `start` to the cursor into a fresh string
    fn lexeme(&self, start: usize, loc: SourceLocation) -> Result<String, LexError> {
        let chars = &self.input[start..self.position];
        let len = chars.iter().map(|c| c.len_utf8()).sum();
        let mut text = String::new();
        text.try_reserve_exact(len).map_err(|_| out_of_memory(loc))?;
        text.extend(chars);
        Ok(text)
    }

    /// Consume the next character if it is `expected`
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

fn copy_text(text: &str, loc: SourceLocation) -> Result<String, LexError> {
    let mut copy = String::new();
    copy.try_reserve_exact(text.len()).map_err(|_| out_of_memory(loc))?;
    copy.push_str(text);
    Ok(copy)
}

fn out_of_memory(loc: SourceLocation) -> LexError {
    LexError::new(
        LexErrorKind::OutOfMemory,
        "Out of memory while copying lexeme",
        loc,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("int main() { return 0; }");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[1].identifier(), Some("main"));
        assert_eq!(tokens[2].kind, TokenKind::LParen);
        assert_eq!(tokens[3].kind, TokenKind::RParen);
        assert_eq!(tokens[4].kind, TokenKind::LBrace);
        assert_eq!(tokens[5].kind, TokenKind::Return);
        assert!(matches!(tokens[6].literal(), Some(Literal::Int(0))));
        assert_eq!(tokens[7].kind, TokenKind::Semicolon);
        assert_eq!(tokens[8].kind, TokenKind::RBrace);
        assert_eq!(tokens[9].kind, TokenKind::Eof);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("++ -- += -= == != && || -> <<= >>= &= |= ^= \\"),
            vec![
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Arrow,
                TokenKind::ShlEq,
                TokenKind::ShrEq,
                TokenKind::AmpEq,
                TokenKind::PipeEq,
                TokenKind::CaretEq,
                TokenKind::Backslash,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_maximal_munch_without_spaces() {
        assert_eq!(
            kinds("a>>=b<<c<=d"),
            vec![
                TokenKind::Identifier,
                TokenKind::ShrEq,
                TokenKind::Identifier,
                TokenKind::Shl,
                TokenKind::Identifier,
                TokenKind::Le,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments() {
        let tokens = kinds("int x; // comment\nint y; /* block\ncomment */ int z;");
        assert_eq!(tokens.len(), 10);
        assert_eq!(tokens[3], TokenKind::Int);
        assert_eq!(tokens[6], TokenKind::Int);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = Lexer::new("int /* never closed").tokenize().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
        assert_eq!(err.location, SourceLocation::new(1, 5));
    }

    #[test]
    fn test_string_keeps_unknown_escapes() {
        let mut lexer = Lexer::new(r#""say \"hi\"\n""#);
        let token = lexer.next_token().unwrap();
        match token.literal() {
            Some(Literal::String(s)) => assert_eq!(s, "say \"hi\"\\n"),
            other => panic!("Expected string literal, got {:?}", other),
        }
    }

    #[test]
    fn test_char_escapes() {
        let mut lexer = Lexer::new(r"'a' '\n' '\0' '\''");
        let values: Vec<_> = (0..4)
            .map(|_| lexer.next_token().unwrap().into_literal())
            .collect();
        assert_eq!(
            values,
            vec![
                Some(Literal::Char(b'a' as i8)),
                Some(Literal::Char(b'\n' as i8)),
                Some(Literal::Char(0)),
                Some(Literal::Char(b'\'' as i8)),
            ]
        );
    }

    #[test]
    fn test_char_errors() {
        let err = Lexer::new(r"'\q'").next_token().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidEscape);
        let err = Lexer::new("'ab'").next_token().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedChar);
    }

    #[test]
    fn test_number_widths() {
        let mut lexer = Lexer::new("7 3000000000 10000000000000000000 2.5");
        let values: Vec<_> = (0..4)
            .map(|_| lexer.next_token().unwrap().into_literal())
            .collect();
        assert_eq!(
            values,
            vec![
                Some(Literal::Int(7)),
                Some(Literal::Long(3_000_000_000)),
                Some(Literal::ULong(10_000_000_000_000_000_000)),
                Some(Literal::Double(2.5)),
            ]
        );
    }

    #[test]
    fn test_number_too_large() {
        let err = Lexer::new("99999999999999999999999").next_token().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidNumber);
    }

    #[test]
    fn test_dot_after_number_without_digit() {
        assert_eq!(
            kinds("1.x"),
            vec![
                TokenKind::Number,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_bool_literals() {
        let mut lexer = Lexer::new("true false");
        let t = lexer.next_token().unwrap();
        assert_eq!(t.kind, TokenKind::BoolLiteral);
        assert_eq!(t.literal(), Some(&Literal::Bool(true)));
        assert_eq!(lexer.next_token().unwrap().literal(), Some(&Literal::Bool(false)));
    }

    #[test]
    fn test_locations() {
        let tokens = Lexer::new("int\n  x = 5;").tokenize().unwrap();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[2].location, SourceLocation::new(2, 5));
        assert_eq!(tokens[3].lexeme, "5");
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("int @").tokenize().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter);
        assert_eq!(err.location, SourceLocation::new(1, 5));
    }
}
